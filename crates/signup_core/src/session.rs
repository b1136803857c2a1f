//! Shared form session.
//!
//! Clones of a session share one controller. The controller lock is held
//! only to start and to settle a submission, never across the handler
//! call, so the form stays responsive while a submission is in flight and a
//! second click sees `Submitting` and is turned away.
//!
//! A submission whose future is dropped before the handler settles (a
//! timeout, an aborted task, a panicking handler) is settled as failed so
//! the form can be retried.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::FormConfig;
use crate::controller::FormController;
use crate::error::FormResult;
use crate::events::{Applied, FormEvent};
use crate::fields::FieldValues;
use crate::handler::SubmitHandler;
use crate::view::FormSnapshot;

#[derive(Clone)]
pub struct FormSession {
    form: Arc<RwLock<FormController>>,
    handler: Arc<dyn SubmitHandler>,
}

impl FormSession {
    pub fn new(form: FormController, handler: Arc<dyn SubmitHandler>) -> Self {
        Self {
            form: Arc::new(RwLock::new(form)),
            handler,
        }
    }

    /// Session with configured rules and the simulated handler.
    pub fn from_config(config: &FormConfig) -> FormResult<Self> {
        Ok(Self::new(
            FormController::from_config(config)?,
            Arc::new(config.simulated_handler()),
        ))
    }

    /// Apply a view event. A `Submit` event runs the full submission and
    /// returns the submitted values.
    pub async fn apply(&self, event: FormEvent) -> FormResult<Option<FieldValues>> {
        let applied = self.form.write().await.apply(event)?;
        match applied {
            Applied::Updated => Ok(None),
            Applied::SubmitRequested => self.submit().await.map(Some),
        }
    }

    /// Submit the form through the session's handler.
    pub async fn submit(&self) -> FormResult<FieldValues> {
        let (values, id) = {
            let mut form = self.form.write().await;
            let values = form.begin_submit()?;
            (values, form.in_flight_id())
        };
        let mut guard = InFlightGuard::new(self.form.clone(), id);

        debug!("Dispatching submission to {}", self.handler.name());
        let result = self.handler.handle(values).await;

        let mut form = self.form.write().await;
        guard.disarm();
        form.finish_submit(result)
    }

    pub async fn snapshot(&self) -> FormSnapshot {
        self.form.read().await.snapshot()
    }

    /// Read from the controller under the session lock.
    pub async fn with_form<R>(&self, f: impl FnOnce(&FormController) -> R) -> R {
        let form = self.form.read().await;
        f(&form)
    }

    /// Mutate the controller under the session lock.
    pub async fn with_form_mut<R>(&self, f: impl FnOnce(&mut FormController) -> R) -> R {
        let mut form = self.form.write().await;
        f(&mut form)
    }
}

/// Abandons the in-flight submission unless disarmed first.
struct InFlightGuard {
    form: Arc<RwLock<FormController>>,
    submission: Option<Uuid>,
}

impl InFlightGuard {
    fn new(form: Arc<RwLock<FormController>>, submission: Option<Uuid>) -> Self {
        Self { form, submission }
    }

    fn disarm(&mut self) {
        self.submission = None;
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let Some(id) = self.submission.take() else {
            return;
        };
        if let Ok(mut form) = self.form.try_write() {
            form.abandon_submission(id);
            return;
        }
        // Lock is busy; settle once it frees up.
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let form = self.form.clone();
                handle.spawn(async move {
                    form.write().await.abandon_submission(id);
                });
            }
            Err(_) => warn!("Submission abandoned outside a runtime, form left in flight"),
        }
    }
}

//! Form controller: owns field state and sequences submissions.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::FormConfig;
use crate::error::{FormError, FormResult, SubmissionError};
use crate::events::{Applied, FormEvent};
use crate::fields::{FieldName, FieldStatus, FieldValues, UiFlags};
use crate::handler::SubmitHandler;
use crate::state::{SubmissionOutcome, SubmissionState};
use crate::validation::{ValidationEngine, ValidationErrors};

/// Character shown in place of each masked password character.
pub const MASK_CHAR: char = '•';

/// Notice recorded when a submission is dropped before it settles.
pub const INTERRUPTED_NOTICE: &str = "Submission was interrupted";

/// Single owner of the sign-up form's mutable state.
///
/// Errors are derived: every value change re-runs the validation engine,
/// and nothing sets an error directly.
#[derive(Debug, Clone)]
pub struct FormController {
    engine: ValidationEngine,
    values: FieldValues,
    touched: BTreeSet<FieldName>,
    errors: ValidationErrors,
    flags: UiFlags,
    state: SubmissionState,
    in_flight: Option<FieldValues>,
    edited_in_flight: bool,
    last_outcome: Option<SubmissionOutcome>,
}

impl FormController {
    /// Create a controller with the base ruleset.
    pub fn new() -> FormResult<Self> {
        Ok(Self::with_engine(ValidationEngine::new()?))
    }

    /// Create a controller with the rules from `config`.
    pub fn from_config(config: &FormConfig) -> FormResult<Self> {
        Ok(Self::with_engine(ValidationEngine::with_rules(
            config.validation.clone(),
        )?))
    }

    pub fn with_engine(engine: ValidationEngine) -> Self {
        let values = FieldValues::default();
        let errors = engine.validate(&values);
        Self {
            engine,
            values,
            touched: BTreeSet::new(),
            errors,
            flags: UiFlags::default(),
            state: SubmissionState::Idle,
            in_flight: None,
            edited_in_flight: false,
            last_outcome: None,
        }
    }

    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    pub fn value(&self, field: FieldName) -> &str {
        self.values.get(field)
    }

    /// Current errors for all fields, touched or not.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn flags(&self) -> UiFlags {
        self.flags
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn last_outcome(&self) -> Option<&SubmissionOutcome> {
        self.last_outcome.as_ref()
    }

    /// Form-level notice for a failed submission.
    pub fn notice(&self) -> Option<&str> {
        if self.state != SubmissionState::Failed {
            return None;
        }
        self.last_outcome
            .as_ref()
            .and_then(|outcome| outcome.message.as_deref())
    }

    pub fn is_touched(&self, field: FieldName) -> bool {
        self.touched.contains(&field)
    }

    pub fn field_status(&self, field: FieldName) -> FieldStatus {
        FieldStatus {
            touched: self.is_touched(field),
            error: self.errors.get(field).map(str::to_string),
        }
    }

    /// The error to render next to `field`; hidden until it is touched.
    pub fn visible_error(&self, field: FieldName) -> Option<&str> {
        if self.is_touched(field) {
            self.errors.get(field)
        } else {
            None
        }
    }

    /// The value as the input renders it, masking password fields.
    pub fn display_value(&self, field: FieldName) -> String {
        let value = self.values.get(field);
        if field.is_masked() && !self.flags.password_visible {
            value.chars().map(|_| MASK_CHAR).collect()
        } else {
            value.to_string()
        }
    }

    /// Whether the submit control should be enabled.
    pub fn can_submit(&self) -> bool {
        self.flags.agree && self.errors.is_empty() && !self.state.is_in_flight()
    }

    /// Update one field, mark it touched, and re-validate.
    pub fn set_field_value(&mut self, field: FieldName, value: impl Into<String>) {
        self.values.set(field, value);
        self.touched.insert(field);
        self.revalidate();

        if self.state.is_settled() {
            debug!("Edit after {} submission, returning to idle", self.state);
            self.state = SubmissionState::Idle;
        } else if self.state.is_in_flight() {
            self.edited_in_flight = true;
        }
    }

    /// Mark a field touched without changing it (blur).
    pub fn set_touched(&mut self, field: FieldName) {
        self.touched.insert(field);
    }

    pub fn toggle_agree(&mut self) -> bool {
        self.flags.agree = !self.flags.agree;
        self.flags.agree
    }

    pub fn set_agree(&mut self, agree: bool) {
        self.flags.agree = agree;
    }

    pub fn toggle_password_visibility(&mut self) -> bool {
        self.flags.password_visible = !self.flags.password_visible;
        self.flags.password_visible
    }

    /// Restore initial values and flags.
    ///
    /// Rejected while a submission is in flight.
    pub fn reset(&mut self) -> FormResult<()> {
        if self.state.is_in_flight() {
            return Err(FormError::SubmitInFlight);
        }
        let engine = self.engine.clone();
        *self = Self::with_engine(engine);
        debug!("Form reset");
        Ok(())
    }

    /// Apply a view event. `Submit` is reported back, since dispatching it
    /// needs a handler.
    pub fn apply(&mut self, event: FormEvent) -> FormResult<Applied> {
        match event {
            FormEvent::Change { field, value } => self.set_field_value(field, value),
            FormEvent::Blur { field } => self.set_touched(field),
            FormEvent::ToggleAgree => {
                self.toggle_agree();
            }
            FormEvent::SetAgree { checked } => self.set_agree(checked),
            FormEvent::TogglePasswordVisibility => {
                self.toggle_password_visibility();
            }
            FormEvent::Reset => self.reset()?,
            FormEvent::Submit => return Ok(Applied::SubmitRequested),
        }
        Ok(Applied::Updated)
    }

    /// First half of a submission: gate, validate, and enter `Submitting`.
    ///
    /// Returns the snapshot to hand to the submit handler. On any error the
    /// submission state is left unchanged.
    pub fn begin_submit(&mut self) -> FormResult<FieldValues> {
        if self.state.is_in_flight() {
            warn!("Submit ignored, a submission is already in flight");
            return Err(FormError::SubmitInFlight);
        }

        if !self.flags.agree {
            debug!("Submit rejected, agreement not given");
            return Err(FormError::AgreementRequired);
        }

        self.revalidate();
        if !self.errors.is_empty() {
            self.touched.extend(FieldName::ALL);
            debug!("Submit rejected: {}", self.errors);
            return Err(FormError::Validation(self.errors.clone()));
        }

        self.transition(SubmissionState::Submitting)?;
        let outcome = SubmissionOutcome::started();
        info!("Submitting form ({})", outcome.id);
        self.last_outcome = Some(outcome);
        self.in_flight = Some(self.values.clone());
        self.edited_in_flight = false;
        Ok(self.values.clone())
    }

    /// Second half of a submission: record the handler's completion signal.
    pub fn finish_submit(&mut self, result: Result<(), SubmissionError>) -> FormResult<FieldValues> {
        let next = if result.is_ok() {
            SubmissionState::Succeeded
        } else {
            SubmissionState::Failed
        };
        self.transition(next)?;
        let submitted = self.in_flight.take().unwrap_or_else(|| self.values.clone());
        let stale = std::mem::take(&mut self.edited_in_flight);

        match result {
            Ok(()) => {
                if let Some(outcome) = self.last_outcome.as_mut() {
                    outcome.succeed();
                    info!("Submission {} succeeded", outcome.id);
                }
                if stale {
                    // The handler never saw the edits made while it ran.
                    self.transition(SubmissionState::Idle)?;
                }
                Ok(submitted)
            }
            Err(e) => {
                if let Some(outcome) = self.last_outcome.as_mut() {
                    outcome.fail(e.message.clone());
                    warn!("Submission {} failed: {}", outcome.id, e.message);
                }
                Err(FormError::Submission(e))
            }
        }
    }

    /// Settle a submission that will never report back.
    ///
    /// Returns false when nothing was in flight.
    pub fn abandon_submit(&mut self) -> bool {
        if !self.state.is_in_flight() {
            return false;
        }
        warn!("Submission abandoned before completing");
        // Failed keeps the notice even if the form was edited meanwhile.
        let _ = self.finish_submit(Err(SubmissionError::new(INTERRUPTED_NOTICE)));
        true
    }

    /// Id of the submission currently in flight.
    pub fn in_flight_id(&self) -> Option<Uuid> {
        if !self.state.is_in_flight() {
            return None;
        }
        self.last_outcome.as_ref().map(|outcome| outcome.id)
    }

    /// Abandon submission `id` if it is still the one in flight.
    pub fn abandon_submission(&mut self, id: Uuid) -> bool {
        if self.in_flight_id() != Some(id) {
            return false;
        }
        self.abandon_submit()
    }

    /// Validate, dispatch to `handler` once, and settle the outcome.
    ///
    /// Dropping the returned future mid-flight settles the form as failed.
    pub async fn submit(&mut self, handler: &dyn SubmitHandler) -> FormResult<FieldValues> {
        let values = self.begin_submit()?;
        let pending = PendingSubmit::new(self);
        debug!("Dispatching submission to {}", handler.name());
        let result = handler.handle(values).await;
        pending.finish(result)
    }

    fn revalidate(&mut self) {
        self.errors = self.engine.validate(&self.values);
    }

    fn transition(&mut self, next: SubmissionState) -> FormResult<()> {
        if !self.state.can_transition_to(&next) {
            return Err(FormError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        debug!("Submission state {} -> {}", self.state, next);
        self.state = next;
        Ok(())
    }
}

/// Settles an in-flight submission if it is dropped unfinished.
struct PendingSubmit<'a> {
    form: &'a mut FormController,
    settled: bool,
}

impl<'a> PendingSubmit<'a> {
    fn new(form: &'a mut FormController) -> Self {
        Self {
            form,
            settled: false,
        }
    }

    fn finish(mut self, result: Result<(), SubmissionError>) -> FormResult<FieldValues> {
        self.settled = true;
        self.form.finish_submit(result)
    }
}

impl Drop for PendingSubmit<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.form.abandon_submit();
        }
    }
}

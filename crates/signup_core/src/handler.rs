//! Submit handler seam.
//!
//! The form never knows where its data goes. Callers plug in a
//! [`SubmitHandler`]; [`SimulatedSubmitHandler`] stands in for a backend by
//! succeeding after a fixed delay and logging what it received, with
//! passwords redacted.

use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use crate::error::SubmissionError;
use crate::fields::FieldValues;

/// Default delay of the simulated handler.
pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_millis(500);

/// Receives validated form values.
#[async_trait]
pub trait SubmitHandler: Send + Sync {
    /// Handle a submission. Resolving the future is the completion signal.
    async fn handle(&self, values: FieldValues) -> Result<(), SubmissionError>;

    /// Short name for logs.
    fn name(&self) -> &str {
        "submit-handler"
    }
}

/// Handler that always succeeds after a fixed delay.
#[derive(Debug, Clone)]
pub struct SimulatedSubmitHandler {
    delay: Duration,
}

impl Default for SimulatedSubmitHandler {
    fn default() -> Self {
        Self::new(DEFAULT_SUBMIT_DELAY)
    }
}

impl SimulatedSubmitHandler {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl SubmitHandler for SimulatedSubmitHandler {
    async fn handle(&self, values: FieldValues) -> Result<(), SubmissionError> {
        tokio::time::sleep(self.delay).await;

        let payload = serde_json::to_string_pretty(&values.redacted())
            .map_err(|e| SubmissionError::new(format!("could not encode values: {}", e)))?;
        info!("Simulated submission received:\n{}", payload);
        Ok(())
    }

    fn name(&self) -> &str {
        "simulated"
    }
}

//! Submission state machine and outcome records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a form submission.
///
/// No state is terminal: the form can be submitted again after either
/// outcome, and any field edit returns a settled form to `Idle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Failed,
    Succeeded,
}

impl SubmissionState {
    /// Check whether the state machine permits moving to `next`.
    pub fn can_transition_to(&self, next: &SubmissionState) -> bool {
        use SubmissionState::*;
        matches!(
            (self, next),
            (Idle | Failed | Succeeded, Submitting)
                | (Submitting, Succeeded)
                | (Submitting, Failed)
                | (Failed | Succeeded, Idle)
        )
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Submitting)
    }

    /// A submission finished, successfully or not.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Failed | Self::Succeeded)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Submitting => "submitting",
            Self::Failed => "failed",
            Self::Succeeded => "succeeded",
        }
    }
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Record of the most recent dispatched submission.
///
/// A failed outcome carries the handler's message, which the view shows as
/// a form-level notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionOutcome {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SubmissionOutcome {
    pub(crate) fn started() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            success: false,
            message: None,
        }
    }

    pub(crate) fn succeed(&mut self) {
        self.finished_at = Some(Utc::now());
        self.success = true;
        self.message = None;
    }

    pub(crate) fn fail(&mut self, message: impl Into<String>) {
        self.finished_at = Some(Utc::now());
        self.success = false;
        self.message = Some(message.into());
    }

    /// Duration of the handler call, once it has settled.
    pub fn duration_ms(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_milliseconds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_transitions() {
        use SubmissionState::*;

        assert!(Idle.can_transition_to(&Submitting));
        assert!(Submitting.can_transition_to(&Succeeded));
        assert!(Submitting.can_transition_to(&Failed));
        assert!(Failed.can_transition_to(&Idle));
        assert!(Succeeded.can_transition_to(&Idle));
        assert!(Failed.can_transition_to(&Submitting));

        assert!(!Submitting.can_transition_to(&Submitting));
        assert!(!Submitting.can_transition_to(&Idle));
        assert!(!Idle.can_transition_to(&Succeeded));
        assert!(!Idle.can_transition_to(&Failed));
    }

    #[test]
    fn test_outcome_lifecycle() {
        let mut outcome = SubmissionOutcome::started();
        assert!(outcome.finished_at.is_none());
        assert!(outcome.duration_ms().is_none());

        outcome.fail("backend unavailable");
        assert!(!outcome.success);
        assert_eq!(outcome.message.as_deref(), Some("backend unavailable"));
        assert!(outcome.duration_ms().unwrap() >= 0);
    }

    #[test]
    fn test_state_serializes_snake_case() {
        let json = serde_json::to_string(&SubmissionState::Submitting).unwrap();
        assert_eq!(json, "\"submitting\"");
    }
}

//! Error types for the form core.

use std::path::PathBuf;

use thiserror::Error;

use crate::state::SubmissionState;
use crate::validation::ValidationErrors;

/// Result type alias for form operations.
pub type FormResult<T> = Result<T, FormError>;

/// Errors that can occur while driving the form.
#[derive(Error, Debug)]
pub enum FormError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Submission requires agreeing to email notifications")]
    AgreementRequired,

    #[error("A submission is already in flight")]
    SubmitInFlight,

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition {
        from: SubmissionState,
        to: SubmissionState,
    },

    #[error("Invalid validation pattern {name}: {message}")]
    InvalidPattern { name: &'static str, message: String },

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Invalid config in file {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl FormError {
    /// True for errors the user can fix by editing the form.
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::AgreementRequired)
    }
}

/// Failure reported by an external submit handler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Submission failed: {message}")]
pub struct SubmissionError {
    pub message: String,
}

impl SubmissionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

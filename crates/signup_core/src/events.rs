//! User events produced by the view layer.

use serde::{Deserialize, Serialize};

use crate::fields::FieldName;

/// A discrete UI event fed into the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FormEvent {
    /// Input changed (`onChange`).
    Change { field: FieldName, value: String },
    /// Input lost focus (`onBlur`).
    Blur { field: FieldName },
    /// Agreement checkbox clicked.
    ToggleAgree,
    /// Agreement checkbox set to an explicit value.
    SetAgree { checked: bool },
    /// Show/hide button on either password field clicked.
    TogglePasswordVisibility,
    /// Submit button clicked (`onSubmit`).
    Submit,
    /// Form cleared back to its initial values.
    Reset,
}

impl FormEvent {
    pub fn change(field: FieldName, value: impl Into<String>) -> Self {
        Self::Change {
            field,
            value: value.into(),
        }
    }

    pub fn blur(field: FieldName) -> Self {
        Self::Blur { field }
    }

    pub fn is_submit(&self) -> bool {
        matches!(self, Self::Submit)
    }
}

/// What applying an event did to the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// State was updated in place.
    Updated,
    /// The event asks for a submission; the caller owns the handler.
    SubmitRequested,
}

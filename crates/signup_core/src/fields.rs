//! Field names, values, and per-field status.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FormError;

/// A named input on the sign-up form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    FirstName,
    LastName,
    Email,
    Password,
    ReenterPassword,
}

impl FieldName {
    /// All fields in render order.
    pub const ALL: [FieldName; 5] = [
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::Password,
        Self::ReenterPassword,
    ];

    /// Wire name used by the view layer and in serialized values.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Email => "email",
            Self::Password => "password",
            Self::ReenterPassword => "reenterPassword",
        }
    }

    /// Label rendered next to the input.
    pub fn label(&self) -> &'static str {
        match self {
            Self::FirstName => "First name",
            Self::LastName => "Last name",
            Self::Email => "Email address (ex. jeanine@bootcampr.io)",
            Self::Password => "Password",
            Self::ReenterPassword => "Re-enter password",
        }
    }

    /// Whether the input is masked unless password visibility is on.
    pub fn is_masked(&self) -> bool {
        matches!(self, Self::Password | Self::ReenterPassword)
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FieldName {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| FormError::UnknownField(s.to_string()))
    }
}

/// Placeholder for secret values in logs.
pub const REDACTED: &str = "********";

/// Current values of every form field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldValues {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub reenter_password: String,
}

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: FieldName) -> &str {
        match field {
            FieldName::FirstName => &self.first_name,
            FieldName::LastName => &self.last_name,
            FieldName::Email => &self.email,
            FieldName::Password => &self.password,
            FieldName::ReenterPassword => &self.reenter_password,
        }
    }

    pub fn set(&mut self, field: FieldName, value: impl Into<String>) {
        let slot = match field {
            FieldName::FirstName => &mut self.first_name,
            FieldName::LastName => &mut self.last_name,
            FieldName::Email => &mut self.email,
            FieldName::Password => &mut self.password,
            FieldName::ReenterPassword => &mut self.reenter_password,
        };
        *slot = value.into();
    }

    /// Copy safe to log: password fields replaced by a fixed mask.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        for field in FieldName::ALL.into_iter().filter(|f| f.is_masked()) {
            if !copy.get(field).is_empty() {
                copy.set(field, REDACTED);
            }
        }
        copy
    }

    /// Builder-style setter, handy for fixtures and CLI input.
    pub fn with(mut self, field: FieldName, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }
}

/// Touched flag and derived error for a single field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldStatus {
    pub touched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FieldStatus {
    /// Invalid as rendered: an error exists and the field was touched.
    pub fn is_invalid(&self) -> bool {
        self.touched && self.error.is_some()
    }
}

/// UI toggles that sit outside the validated field set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiFlags {
    pub agree: bool,
    pub password_visible: bool,
}

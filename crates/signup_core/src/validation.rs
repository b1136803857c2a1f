//! Field validation rules.
//!
//! The engine is a pure mapping from a [`FieldValues`] snapshot to the set of
//! per-field error messages. A field with no entry is valid. Each field is
//! checked independently and only its first failing rule is reported.

use std::collections::BTreeMap;
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{FormError, FormResult};
use crate::fields::{FieldName, FieldValues};

pub const FIRST_NAME_REQUIRED: &str = "First name is required";
pub const LAST_NAME_REQUIRED: &str = "Last name is required";
pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_INVALID: &str = "Invalid email";
pub const PASSWORDS_MUST_MATCH: &str = "Passwords must match";

/// General email shape: an RFC 5322-ish local part and dot-separated
/// host labels of up to 63 characters.
const EMAIL_SHAPE_PATTERN: &str = r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$";

/// Stricter `local@domain.tld` form with a 2-4 letter TLD.
const EMAIL_STRICT_PATTERN: &str = r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,4}$";

/// Per-field error messages, ordered by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<FieldName, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: FieldName, message: impl Into<String>) {
        // First failing rule wins.
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: FieldName) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FieldName) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = FieldName> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<_> = self
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl FromIterator<(FieldName, String)> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = (FieldName, String)>>(iter: I) -> Self {
        let mut errors = Self::new();
        for (field, message) in iter {
            errors.add(field, message);
        }
        errors
    }
}

/// Optional rules layered on top of the base ruleset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationRules {
    /// Reject a `reenterPassword` that differs from `password`. Off unless
    /// configured.
    pub require_password_match: bool,
}

/// Compiled validation ruleset.
#[derive(Debug, Clone)]
pub struct ValidationEngine {
    rules: ValidationRules,
    email_shape: Regex,
    email_strict: Regex,
}

impl ValidationEngine {
    /// Create an engine with the base ruleset.
    pub fn new() -> FormResult<Self> {
        Self::with_rules(ValidationRules::default())
    }

    /// Create an engine with additional optional rules.
    pub fn with_rules(rules: ValidationRules) -> FormResult<Self> {
        Ok(Self {
            rules,
            email_shape: compile("email_shape", EMAIL_SHAPE_PATTERN)?,
            email_strict: compile("email_strict", EMAIL_STRICT_PATTERN)?,
        })
    }

    pub fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    /// Validate every field.
    pub fn validate(&self, values: &FieldValues) -> ValidationErrors {
        let errors: ValidationErrors = FieldName::ALL
            .into_iter()
            .filter_map(|field| {
                self.validate_field(field, values)
                    .map(|message| (field, message.to_string()))
            })
            .collect();
        trace!("Validated form values: {} error(s)", errors.len());
        errors
    }

    /// Validate a single field, returning its error message if any.
    pub fn validate_field(&self, field: FieldName, values: &FieldValues) -> Option<&'static str> {
        let value = values.get(field);
        match field {
            FieldName::FirstName => required(value, FIRST_NAME_REQUIRED),
            FieldName::LastName => required(value, LAST_NAME_REQUIRED),
            FieldName::Email => required(value, EMAIL_REQUIRED).or_else(|| self.check_email(value)),
            FieldName::Password => None,
            FieldName::ReenterPassword => {
                if self.rules.require_password_match && value != values.password {
                    Some(PASSWORDS_MUST_MATCH)
                } else {
                    None
                }
            }
        }
    }

    /// True when `email` passes both email checks.
    pub fn is_valid_email(&self, email: &str) -> bool {
        !email.trim().is_empty() && self.check_email(email).is_none()
    }

    fn check_email(&self, email: &str) -> Option<&'static str> {
        if !self.email_shape.is_match(email) || !self.email_strict.is_match(email) {
            Some(EMAIL_INVALID)
        } else {
            None
        }
    }
}

fn required(value: &str, message: &'static str) -> Option<&'static str> {
    if value.trim().is_empty() {
        Some(message)
    } else {
        None
    }
}

fn compile(name: &'static str, pattern: &str) -> FormResult<Regex> {
    Regex::new(pattern).map_err(|e| FormError::InvalidPattern {
        name,
        message: e.to_string(),
    })
}

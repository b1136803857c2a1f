//! CLI command definitions.
//!
//! Each subcommand drives the form core the way a view would: set values,
//! toggle flags, submit, and report what the form says back.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use signup_core::{FieldName, FieldValues, FormConfig, FormController, ValidationErrors};

pub mod replay;
pub mod submit;
pub mod validate;

/// signup - sign-up form validation and submission driver
#[derive(Parser)]
#[command(name = "signup")]
#[command(version, about = "Sign-up form validation and submission driver")]
#[command(long_about = r#"
Drives the sign-up form core from the command line.

COMMANDS:
  validate  → Check field values and print per-field errors
  submit    → Validate and submit through the simulated handler
  replay    → Feed a recorded JSON event stream through a form session

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Validation failure
  4 - Submission failure
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate field values
    Validate(validate::ValidateArgs),

    /// Validate and submit field values
    Submit(submit::SubmitArgs),

    /// Replay a JSON array of form events
    Replay(replay::ReplayArgs),
}

/// Field values given as flags, optionally on top of a JSON file.
#[derive(Args, Debug, Default)]
pub struct FieldArgs {
    /// JSON file with field values (camelCase keys)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub password: Option<String>,

    #[arg(long)]
    pub reenter_password: Option<String>,
}

impl FieldArgs {
    /// Resolve the final values; flags override the input file.
    pub fn resolve(&self) -> Result<FieldValues> {
        let mut values = match &self.input {
            Some(path) => {
                let content = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read input file {}", path.display()))?;
                serde_json::from_str(&content)
                    .with_context(|| format!("Invalid field values in {}", path.display()))?
            }
            None => FieldValues::default(),
        };

        let overrides = [
            (FieldName::FirstName, &self.first_name),
            (FieldName::LastName, &self.last_name),
            (FieldName::Email, &self.email),
            (FieldName::Password, &self.password),
            (FieldName::ReenterPassword, &self.reenter_password),
        ];
        for (field, value) in overrides {
            if let Some(value) = value {
                values.set(field, value.as_str());
            }
        }

        Ok(values)
    }
}

/// Load the form config, or defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<FormConfig> {
    match path {
        Some(path) => FormConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => {
            debug!("No config given, using defaults");
            Ok(FormConfig::default())
        }
    }
}

/// Type every value into a fresh form, as a user would.
pub fn fill_form(form: &mut FormController, values: &FieldValues) {
    for field in FieldName::ALL {
        form.set_field_value(field, values.get(field));
    }
}

pub fn print_errors(errors: &ValidationErrors) {
    for (field, message) in errors.iter() {
        println!("   - {} ({}): {}", field.label(), field, message);
    }
}

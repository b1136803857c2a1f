//! Validate command - Check field values without submitting.

use anyhow::Result;
use clap::Args;
use tracing::info;

use signup_core::{FieldName, FormError, ValidationEngine, ValidationErrors, ValidationRules};

use super::{load_config, print_errors, FieldArgs};

#[derive(Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub fields: FieldArgs,

    /// Check a single field by wire name (e.g. firstName, reenterPassword)
    #[arg(long)]
    pub field: Option<String>,

    /// Path to a TOML config file
    #[arg(short, long)]
    pub config: Option<std::path::PathBuf>,

    /// Also require the re-entered password to match
    #[arg(long)]
    pub require_password_match: bool,
}

pub async fn execute(args: ValidateArgs) -> Result<()> {
    let only: Option<FieldName> = args.field.as_deref().map(str::parse).transpose()?;
    let values = args.fields.resolve()?;
    let config = load_config(args.config.as_deref())?;

    let rules = ValidationRules {
        require_password_match: args.require_password_match
            || config.validation.require_password_match,
    };
    let engine = ValidationEngine::with_rules(rules)?;

    let errors = match only {
        Some(field) => {
            info!("Validating {}", field);
            let mut errors = ValidationErrors::new();
            if let Some(message) = engine.validate_field(field, &values) {
                errors.add(field, message);
            }
            errors
        }
        None => {
            info!("Validating sign-up values");
            engine.validate(&values)
        }
    };

    if errors.is_empty() {
        match only {
            Some(field) => println!("✅ {} is valid", field.label()),
            None => println!("✅ All fields valid"),
        }
        return Ok(());
    }

    println!("❌ {} field(s) invalid:", errors.len());
    print_errors(&errors);
    Err(FormError::Validation(errors).into())
}

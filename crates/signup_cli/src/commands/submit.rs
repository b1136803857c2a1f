//! Submit command - Validate and submit through the simulated handler.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use signup_core::{FormController, FormError};

use super::{fill_form, load_config, print_errors, FieldArgs};

#[derive(Args)]
pub struct SubmitArgs {
    #[command(flatten)]
    pub fields: FieldArgs,

    /// Agree to receive email notifications (required to submit)
    #[arg(long)]
    pub agree: bool,

    /// Path to a TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the simulated handler delay in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,
}

pub async fn execute(args: SubmitArgs) -> Result<()> {
    let values = args.fields.resolve()?;
    let mut config = load_config(args.config.as_deref())?;
    if let Some(delay_ms) = args.delay_ms {
        config.submit.delay_ms = delay_ms;
    }

    let mut form = FormController::from_config(&config)?;
    fill_form(&mut form, &values);
    form.set_agree(args.agree);

    info!("Submitting sign-up form");
    let handler = config.simulated_handler();

    match form.submit(&handler).await {
        Ok(submitted) => {
            let json = serde_json::to_string_pretty(&submitted)
                .context("Failed to encode submitted values")?;
            println!("✅ Signed up");
            println!("{}", json);
            Ok(())
        }
        Err(FormError::AgreementRequired) => {
            println!("❌ Agreement required: pass --agree to accept email notifications");
            Err(FormError::AgreementRequired.into())
        }
        Err(FormError::Validation(errors)) => {
            println!("❌ {} field(s) invalid:", errors.len());
            print_errors(&errors);
            Err(FormError::Validation(errors).into())
        }
        Err(e) => Err(e.into()),
    }
}

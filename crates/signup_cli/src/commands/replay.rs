//! Replay command - Feed a recorded event stream through a form session.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::{info, warn};

use signup_core::{FormEvent, FormSession};

use super::load_config;

#[derive(Args)]
pub struct ReplayArgs {
    /// JSON file holding an array of events
    #[arg(short, long)]
    pub events: PathBuf,

    /// Path to a TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Stop at the first rejected event instead of continuing
    #[arg(long)]
    pub fail_fast: bool,
}

pub async fn execute(args: ReplayArgs) -> Result<()> {
    let content = fs::read_to_string(&args.events)
        .with_context(|| format!("Failed to read events file {}", args.events.display()))?;
    let events: Vec<FormEvent> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid events in {}", args.events.display()))?;

    let config = load_config(args.config.as_deref())?;
    let session = FormSession::from_config(&config)?;

    info!("Replaying {} event(s)", events.len());
    for (index, event) in events.into_iter().enumerate() {
        match session.apply(event).await {
            Ok(Some(submitted)) => info!("Event {}: submitted {}", index, submitted.email),
            Ok(None) => {}
            Err(e) if args.fail_fast => {
                return Err(e).with_context(|| format!("Event {} rejected", index));
            }
            Err(e) => warn!("Event {} rejected: {}", index, e),
        }
    }

    let snapshot = session.snapshot().await;
    println!(
        "{}",
        serde_json::to_string_pretty(&snapshot).context("Failed to encode form snapshot")?
    );
    Ok(())
}

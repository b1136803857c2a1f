//! Form configuration.
//!
//! ```toml
//! [submit]
//! delay_ms = 500
//!
//! [validation]
//! require_password_match = false
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FormError, FormResult};
use crate::handler::{SimulatedSubmitHandler, DEFAULT_SUBMIT_DELAY};
use crate::validation::ValidationRules;

/// Settings for the simulated submit handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmitConfig {
    /// Delay before the simulated handler reports success.
    pub delay_ms: u64,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_SUBMIT_DELAY.as_millis() as u64,
        }
    }
}

impl SubmitConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Top-level form configuration. Missing sections use defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    pub submit: SubmitConfig,
    pub validation: ValidationRules,
}

impl FormConfig {
    pub fn from_toml_str(content: &str) -> FormResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> FormResult<Self> {
        let path = path.as_ref();
        debug!("Reading form config from {:?}", path);

        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| FormError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Simulated handler honoring the configured delay.
    pub fn simulated_handler(&self) -> SimulatedSubmitHandler {
        SimulatedSubmitHandler::new(self.submit.delay())
    }
}

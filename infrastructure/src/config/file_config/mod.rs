//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod logging;
mod orchestration;
mod providers;

pub use logging::FileLoggingConfig;
pub use orchestration::FileOrchestrationConfig;
pub use providers::FileProviderConfig;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tandem_domain::{OutputFormat, ProviderRegistry, builtin_providers};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("provider id cannot be empty")]
    EmptyProviderId,

    #[error("duplicate provider id: {0}")]
    DuplicateProviderId(String),

    #[error("provider {0}: timeout_ms cannot be 0")]
    InvalidTimeout(String),

    #[error("unknown pipeline preset: {0}")]
    UnknownPipeline(String),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Provider catalogue; empty means the built-in presets
    pub providers: Vec<FileProviderConfig>,
    /// Mode, sequence and tunables
    pub orchestration: FileOrchestrationConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Event log and diagnostics file settings
    pub logging: FileLoggingConfig,
}

/// `[output]` section: rendering for single-question runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Unset falls back to `--output`, then `answer`
    pub format: Option<OutputFormat>,
    /// `false` disables ANSI colors even on a terminal
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

impl FileConfig {
    /// Validate the configuration, reporting the first problem found.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let mut seen = HashSet::new();
        for provider in &self.providers {
            if provider.id.trim().is_empty() {
                return Err(ConfigValidationError::EmptyProviderId);
            }
            if !seen.insert(provider.id.as_str()) {
                return Err(ConfigValidationError::DuplicateProviderId(
                    provider.id.clone(),
                ));
            }
            if provider.timeout_ms == Some(0) {
                return Err(ConfigValidationError::InvalidTimeout(provider.id.clone()));
            }
        }

        if let Some(Err(name)) = self.orchestration.parse_pipeline() {
            return Err(ConfigValidationError::UnknownPipeline(name));
        }

        Ok(())
    }

    /// Provider registry for runs: configured providers, or the built-in
    /// presets when none are configured.
    pub fn to_registry(&self) -> ProviderRegistry {
        if self.providers.is_empty() {
            ProviderRegistry::new(builtin_providers())
        } else {
            ProviderRegistry::new(self.providers.iter().map(FileProviderConfig::to_provider))
        }
    }
}

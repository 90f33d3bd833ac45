//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Append every stream event as JSON lines to this file
    pub event_log: Option<PathBuf>,
    /// Write diagnostics to a daily-rotated file in this directory
    pub log_dir: Option<PathBuf>,
}

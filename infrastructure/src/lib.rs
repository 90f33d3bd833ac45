//! Infrastructure layer for tandem
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: the HTTP completion invoker, the JSONL event log and
//! configuration file loading.

pub mod config;
pub mod logging;
pub mod providers;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileLoggingConfig, FileOrchestrationConfig,
    FileOutputConfig, FileProviderConfig,
};
pub use logging::JsonlEventLog;
pub use providers::{HttpCompletionInvoker, ProbeOutcome};

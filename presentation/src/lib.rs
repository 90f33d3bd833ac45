//! Presentation layer for tandem
//!
//! This crate contains CLI definitions, output formatters,
//! progress reporters, and the interactive chat interface.

pub mod chat;
pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::{ChatCommand, ChatRepl};
pub use cli::commands::{Cli, OutputFormat};
pub use output::console::ConsoleFormatter;
pub use output::formatter::{OutputFormatter, format_latency, format_tokens};
pub use output::markdown::MarkdownFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};

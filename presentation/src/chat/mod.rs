//! Interactive chat module
//!
//! Provides a readline-based interactive chat interface over a running
//! conversation history.

mod repl;

pub use repl::{ChatCommand, ChatRepl};

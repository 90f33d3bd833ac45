//! Orchestration domain
//!
//! Mode tags, the consolidated defaults table, run results, the progress
//! event protocol and the word-level diff estimator used for early stopping.

pub mod config;
pub mod diff;
pub mod event;
pub mod mode;
pub mod presets;
pub mod value_objects;

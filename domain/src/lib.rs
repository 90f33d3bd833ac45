//! Domain layer for tandem
//!
//! This crate contains the core entities, value objects and pure logic of
//! multi-provider answer orchestration. It has no dependencies on
//! infrastructure or presentation concerns and performs no I/O.
//!
//! # Core Concepts
//!
//! ## Providers
//!
//! A [`Provider`] is a configured completion backend. The [`ProviderRegistry`]
//! is the read-only lookup a run resolves its provider sequence against.
//!
//! ## Orchestration
//!
//! A run drives one [`OrchestrationMode`] over the resolved providers:
//!
//! - **Conversation**: up to three speakers answer in turn, each seeing the previous ones
//! - **Answer**: seed, refine and optionally polish, with diff-based early stopping
//! - **Argumentative**: two parallel proposals reconciled by an arbiter
//! - **Research**: outline, suggestions and rewrite, with an optional refinement loop
//!
//! Every run produces an append-only list of [`Step`]s, a live feed of
//! [`StreamEvent`]s and finally one [`OrchestrationResult`].

pub mod config;
pub mod core;
pub mod orchestration;
pub mod prompt;
pub mod provider;
pub mod session;

// Re-export commonly used types
pub use config::OutputFormat;
pub use core::error::DomainError;
pub use orchestration::{
    config::{ModeDefaults, ModeSettings, OrchestrationConfig},
    diff::Diff,
    event::StreamEvent,
    mode::OrchestrationMode,
    presets::PipelinePreset,
    value_objects::{Completion, OrchestrationResult, Step, Usage},
};
pub use prompt::PromptTemplate;
pub use provider::{
    entities::{Provider, ProviderKind, WireFormat},
    presets::builtin_providers,
    registry::{ProviderRegistry, ResolvedSequence},
};
pub use session::entities::{Message, Role, split_question};

//! Orchestration mode definitions.
//!
//! [`OrchestrationMode`] is the closed set of multi-round policies a run can
//! follow. Each mode declares the minimum number of resolved providers it
//! needs before any invocation happens.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Multi-round policy a run follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrchestrationMode {
    /// Up to three providers speak in turn, each seeing the earlier speakers
    Conversation,
    /// Seed → refine → (polish | judge), with early stopping
    Answer,
    /// Two parallel proposals, reconciled by an arbiter
    Argumentative,
    /// Outline → suggestions → rewrite, with an optional refinement loop
    Research,
}

impl OrchestrationMode {
    pub const ALL: [OrchestrationMode; 4] = [
        OrchestrationMode::Conversation,
        OrchestrationMode::Answer,
        OrchestrationMode::Argumentative,
        OrchestrationMode::Research,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrchestrationMode::Conversation => "conversation",
            OrchestrationMode::Answer => "answer",
            OrchestrationMode::Argumentative => "argumentative",
            OrchestrationMode::Research => "research",
        }
    }

    /// Minimum number of resolved providers this mode needs
    pub fn min_providers(&self) -> usize {
        match self {
            OrchestrationMode::Conversation => 1,
            OrchestrationMode::Answer => 2,
            OrchestrationMode::Argumentative | OrchestrationMode::Research => 3,
        }
    }

    /// Names of the provider positions, used in configuration errors
    pub fn roles(&self) -> &'static str {
        match self {
            OrchestrationMode::Conversation => "moderator, specialist, clarifier",
            OrchestrationMode::Answer => "seed + refine",
            OrchestrationMode::Argumentative => "A, B, C arbiter",
            OrchestrationMode::Research => "lead, suggest, rewrite",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            OrchestrationMode::Conversation => {
                "Conversation: providers answer in turn, building on each other"
            }
            OrchestrationMode::Answer => {
                "Answer: seed, refine and polish one answer, stopping early once it converges"
            }
            OrchestrationMode::Argumentative => {
                "Argumentative: two parallel proposals reconciled by an arbiter"
            }
            OrchestrationMode::Research => {
                "Research: outline, suggestions and rewrite into a structured answer"
            }
        }
    }
}

impl fmt::Display for OrchestrationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrchestrationMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "conversation" => Ok(OrchestrationMode::Conversation),
            "answer" => Ok(OrchestrationMode::Answer),
            "argumentative" => Ok(OrchestrationMode::Argumentative),
            "research" => Ok(OrchestrationMode::Research),
            _ => Err(DomainError::UnknownMode(s.to_string())),
        }
    }
}

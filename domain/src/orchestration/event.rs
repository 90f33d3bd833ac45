//! Progress event protocol.
//!
//! One run emits a strictly ordered sequence of [`StreamEvent`]s to one
//! sink: any number of `round_start` / `round_result` / `diff` events,
//! then exactly one terminal event, either a non-provisional `final` or an
//! `error`. Consumers close the stream on the terminal event.

use super::diff::Diff;
use super::value_objects::{Completion, OrchestrationResult};
use serde::{Deserialize, Serialize};

fn is_false(b: &bool) -> bool {
    !*b
}

/// One unit of a run's live progress feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// An invocation is about to be issued
    RoundStart { round: u32, provider_id: String },
    /// An invocation returned
    RoundResult {
        round: u32,
        provider_id: String,
        result: Completion,
    },
    /// Change between two drafts was measured
    Diff { round: u32, diff: Diff },
    /// The aggregated result.
    ///
    /// A provisional final announces the answer as it stands while the run
    /// continues (answer mode's judge path); it is not terminal.
    Final {
        final_result: OrchestrationResult,
        #[serde(default, skip_serializing_if = "is_false")]
        provisional: bool,
    },
    /// The run failed
    Error { error: String },
}

impl StreamEvent {
    /// The protocol name of this event (`round_start`, `final`, ...)
    pub fn kind(&self) -> &'static str {
        match self {
            StreamEvent::RoundStart { .. } => "round_start",
            StreamEvent::RoundResult { .. } => "round_result",
            StreamEvent::Diff { .. } => "diff",
            StreamEvent::Final { .. } => "final",
            StreamEvent::Error { .. } => "error",
        }
    }

    /// Returns true if this event ends the stream.
    pub fn is_terminal(&self) -> bool {
        match self {
            StreamEvent::Final { provisional, .. } => !provisional,
            StreamEvent::Error { .. } => true,
            _ => false,
        }
    }

    /// Round label carried by progress events
    pub fn round(&self) -> Option<u32> {
        match self {
            StreamEvent::RoundStart { round, .. }
            | StreamEvent::RoundResult { round, .. }
            | StreamEvent::Diff { round, .. } => Some(*round),
            _ => None,
        }
    }
}

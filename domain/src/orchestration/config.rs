//! Orchestration configuration and the consolidated defaults table.
//!
//! [`OrchestrationConfig`] is what a caller submits: a mode tag, a provider
//! sequence and optional tunables. Every tunable left unset falls back to
//! [`ModeDefaults::for_mode`]; the merged values are a [`ModeSettings`].
//!
//! | mode | seed temp | refine temp | min change | rounds | early stop |
//! |------|-----------|-------------|------------|--------|------------|
//! | conversation | 0.30 | 0.20 | 0.02 | 1 | no |
//! | answer | 0.35 | 0.15 | 0.02 | 2 | yes |
//! | argumentative | 0.30 | 0.20 | 0.02 | 1 | no |
//! | research | 0.30 | 0.20 | 0.05 | 1 | yes |

use super::mode::OrchestrationMode;
use serde::{Deserialize, Serialize};

/// Judge scores below this trigger one extra refine round in answer mode.
pub const JUDGE_ACCEPT_SCORE: f32 = 7.5;

/// Conversation mode never uses more than this many speakers.
pub const CONVERSATION_MAX_SPEAKERS: usize = 3;

/// Default tunables of one mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeDefaults {
    pub seed_temperature: f32,
    pub refine_temperature: f32,
    pub min_change_ratio: f64,
    pub rounds: u32,
    pub early_stop: bool,
}

impl ModeDefaults {
    pub const fn for_mode(mode: OrchestrationMode) -> Self {
        match mode {
            OrchestrationMode::Conversation => Self {
                seed_temperature: 0.3,
                refine_temperature: 0.2,
                min_change_ratio: 0.02,
                rounds: 1,
                early_stop: false,
            },
            OrchestrationMode::Answer => Self {
                seed_temperature: 0.35,
                refine_temperature: 0.15,
                min_change_ratio: 0.02,
                rounds: 2,
                early_stop: true,
            },
            OrchestrationMode::Argumentative => Self {
                seed_temperature: 0.3,
                refine_temperature: 0.2,
                min_change_ratio: 0.02,
                rounds: 1,
                early_stop: false,
            },
            OrchestrationMode::Research => Self {
                seed_temperature: 0.3,
                refine_temperature: 0.2,
                min_change_ratio: 0.05,
                rounds: 1,
                early_stop: true,
            },
        }
    }
}

/// Caller-supplied configuration of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestrationConfig {
    /// Mode tag; parsed when the run starts so unknown tags surface as errors
    pub mode: String,
    /// Ordered provider ids
    #[serde(default)]
    pub sequence: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rounds: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub early_stop: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_change_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed_temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refine_temperature: Option<f32>,
    #[serde(default)]
    pub use_verifier: bool,
    #[serde(default)]
    pub use_judge: bool,
    /// Completion token cap forwarded to every invocation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl Default for OrchestrationConfig {
    fn default() -> Self {
        Self::new(OrchestrationMode::Answer.as_str(), Vec::<String>::new())
    }
}

impl OrchestrationConfig {
    pub fn new<S: Into<String>>(mode: impl Into<String>, sequence: Vec<S>) -> Self {
        Self {
            mode: mode.into(),
            sequence: sequence.into_iter().map(Into::into).collect(),
            rounds: None,
            early_stop: None,
            min_change_ratio: None,
            seed_temperature: None,
            refine_temperature: None,
            use_verifier: false,
            use_judge: false,
            max_tokens: None,
        }
    }

    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = Some(rounds);
        self
    }

    pub fn with_early_stop(mut self, enabled: bool) -> Self {
        self.early_stop = Some(enabled);
        self
    }

    pub fn with_min_change_ratio(mut self, ratio: f64) -> Self {
        self.min_change_ratio = Some(ratio);
        self
    }

    pub fn with_seed_temperature(mut self, temperature: f32) -> Self {
        self.seed_temperature = Some(temperature);
        self
    }

    pub fn with_refine_temperature(mut self, temperature: f32) -> Self {
        self.refine_temperature = Some(temperature);
        self
    }

    pub fn with_judge(mut self, enabled: bool) -> Self {
        self.use_judge = enabled;
        self
    }

    pub fn with_verifier(mut self, enabled: bool) -> Self {
        self.use_verifier = enabled;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Change the mode tag.
    ///
    /// Moving to a different known mode clears the tunables so the new
    /// mode's defaults apply; the sequence, token cap and judge/verifier
    /// switches are kept. An unknown tag is stored as-is and rejected
    /// when the run starts.
    pub fn switch_mode(&mut self, mode: impl Into<String>) {
        let mode = mode.into();
        let current = self.mode.parse::<OrchestrationMode>().ok();
        if let Ok(next) = mode.parse::<OrchestrationMode>()
            && current != Some(next)
        {
            self.rounds = None;
            self.early_stop = None;
            self.min_change_ratio = None;
            self.seed_temperature = None;
            self.refine_temperature = None;
        }
        self.mode = mode;
    }

    /// Merge the explicit tunables over the defaults of `mode`.
    pub fn settings(&self, mode: OrchestrationMode) -> ModeSettings {
        let defaults = ModeDefaults::for_mode(mode);
        ModeSettings {
            mode,
            seed_temperature: self.seed_temperature.unwrap_or(defaults.seed_temperature),
            refine_temperature: self
                .refine_temperature
                .unwrap_or(defaults.refine_temperature),
            min_change_ratio: self.min_change_ratio.unwrap_or(defaults.min_change_ratio),
            rounds: self.rounds.unwrap_or(defaults.rounds),
            early_stop: self.early_stop.unwrap_or(defaults.early_stop),
            use_judge: self.use_judge,
            use_verifier: self.use_verifier,
            max_tokens: self.max_tokens,
        }
    }
}

/// Fully resolved tunables a mode procedure runs with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeSettings {
    pub mode: OrchestrationMode,
    pub seed_temperature: f32,
    pub refine_temperature: f32,
    pub min_change_ratio: f64,
    pub rounds: u32,
    pub early_stop: bool,
    pub use_judge: bool,
    pub use_verifier: bool,
    pub max_tokens: Option<u32>,
}

impl ModeSettings {
    /// Whether a change ratio is small enough to stop refining.
    pub fn converged(&self, ratio: f64) -> bool {
        self.early_stop && ratio < self.min_change_ratio
    }
}

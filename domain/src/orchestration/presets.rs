//! Named pipeline presets.
//!
//! Ready-made [`OrchestrationConfig`]s pairing a mode with a provider
//! sequence from the built-in provider catalogue.

use super::config::OrchestrationConfig;
use super::mode::OrchestrationMode;
use crate::core::error::DomainError;
use std::fmt;

/// A named, ready-to-run configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelinePreset {
    /// Answer mode over local models only
    LocalPrivacy,
    /// Answer mode mixing hosted and local models
    HybridQuality,
    /// Argumentative mode with a local arbiter
    DebateMode,
    /// Research mode with one extra refinement round
    ResearchComprehensive,
}

impl PipelinePreset {
    pub const ALL: [PipelinePreset; 4] = [
        PipelinePreset::LocalPrivacy,
        PipelinePreset::HybridQuality,
        PipelinePreset::DebateMode,
        PipelinePreset::ResearchComprehensive,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PipelinePreset::LocalPrivacy => "local_privacy",
            PipelinePreset::HybridQuality => "hybrid_quality",
            PipelinePreset::DebateMode => "debate_mode",
            PipelinePreset::ResearchComprehensive => "research_comprehensive",
        }
    }

    pub fn config(&self) -> OrchestrationConfig {
        match self {
            PipelinePreset::LocalPrivacy => {
                OrchestrationConfig::new("answer", vec!["ollama-qwen", "lmstudio-llama"])
                    .with_rounds(2)
                    .with_early_stop(true)
                    .with_min_change_ratio(0.02)
                    .with_seed_temperature(0.35)
                    .with_refine_temperature(0.15)
            }
            PipelinePreset::HybridQuality => OrchestrationConfig::new(
                "answer",
                vec!["openai-gpt35", "anthropic-claude", "ollama-qwen"],
            )
            .with_rounds(2)
            .with_early_stop(true)
            .with_min_change_ratio(0.02)
            .with_seed_temperature(0.35)
            .with_refine_temperature(0.15),
            PipelinePreset::DebateMode => OrchestrationConfig::new(
                "argumentative",
                vec!["openai-gpt4", "anthropic-claude", "ollama-qwen"],
            )
            .with_rounds(1)
            .with_early_stop(false)
            .with_min_change_ratio(0.02)
            .with_seed_temperature(0.3)
            .with_refine_temperature(0.2),
            PipelinePreset::ResearchComprehensive => OrchestrationConfig::new(
                "research",
                vec!["anthropic-claude", "openai-gpt4", "deepseek-coder"],
            )
            .with_rounds(2)
            .with_early_stop(true)
            .with_min_change_ratio(0.05)
            .with_seed_temperature(0.3)
            .with_refine_temperature(0.2),
        }
    }

    /// The starting configuration offered for a mode.
    pub fn default_for_mode(mode: OrchestrationMode) -> OrchestrationConfig {
        match mode {
            OrchestrationMode::Conversation => OrchestrationConfig::new(
                "conversation",
                vec!["ollama-qwen", "lmstudio-llama", "ollama-llama-small"],
            )
            .with_rounds(1)
            .with_early_stop(false)
            .with_min_change_ratio(0.02)
            .with_seed_temperature(0.3)
            .with_refine_temperature(0.2),
            OrchestrationMode::Answer => PipelinePreset::LocalPrivacy.config(),
            OrchestrationMode::Argumentative => PipelinePreset::DebateMode.config(),
            OrchestrationMode::Research => PipelinePreset::ResearchComprehensive.config(),
        }
    }
}

impl fmt::Display for PipelinePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for PipelinePreset {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PipelinePreset::ALL
            .into_iter()
            .find(|p| p.name() == s.trim())
            .ok_or_else(|| DomainError::UnknownPipeline(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_roundtrip() {
        for preset in PipelinePreset::ALL {
            assert_eq!(preset.name().parse::<PipelinePreset>().ok(), Some(preset));
        }
        assert!("speed_first".parse::<PipelinePreset>().is_err());
    }

    #[test]
    fn test_preset_modes_parse() {
        for preset in PipelinePreset::ALL {
            let config = preset.config();
            let mode: OrchestrationMode = config.mode.parse().unwrap();
            assert!(config.sequence.len() >= mode.min_providers());
        }
    }

    #[test]
    fn test_default_for_mode_matches_mode() {
        for mode in OrchestrationMode::ALL {
            let config = PipelinePreset::default_for_mode(mode);
            assert_eq!(config.mode, mode.as_str());
        }
    }
}

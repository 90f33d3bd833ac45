//! Orchestration configuration from TOML (`[orchestration]` section)

use serde::{Deserialize, Serialize};
use tandem_domain::{OrchestrationConfig, OrchestrationMode, PipelinePreset};

/// Raw orchestration configuration from TOML
///
/// Every field is optional. A `pipeline` preset (or the default preset of
/// `mode`) provides the base; the remaining fields override it one by one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOrchestrationConfig {
    /// Named preset, e.g. `"debate_mode"`
    pub pipeline: Option<String>,
    pub mode: Option<String>,
    /// Provider ids in role order
    pub sequence: Option<Vec<String>>,
    pub rounds: Option<u32>,
    pub early_stop: Option<bool>,
    pub min_change_ratio: Option<f64>,
    pub seed_temperature: Option<f32>,
    pub refine_temperature: Option<f32>,
    pub use_judge: Option<bool>,
    pub use_verifier: Option<bool>,
    /// Token cap forwarded to every invocation
    pub max_tokens: Option<u32>,
}

impl FileOrchestrationConfig {
    /// Parse the pipeline preset name, if one is set.
    pub fn parse_pipeline(&self) -> Option<Result<PipelinePreset, String>> {
        self.pipeline
            .as_deref()
            .map(|name| name.parse::<PipelinePreset>().map_err(|_| name.to_string()))
    }

    /// Build the run configuration.
    ///
    /// An unknown pipeline name falls back to the mode default; `validate`
    /// reports it beforehand. An unknown mode tag is passed through so the
    /// engine can reject it.
    pub fn to_orchestration_config(&self) -> OrchestrationConfig {
        let mut config = match self.parse_pipeline() {
            Some(Ok(preset)) => preset.config(),
            _ => match self.mode.as_deref().map(str::parse::<OrchestrationMode>) {
                Some(Ok(mode)) => PipelinePreset::default_for_mode(mode),
                _ => PipelinePreset::default_for_mode(OrchestrationMode::Answer),
            },
        };

        if let Some(mode) = &self.mode {
            config.switch_mode(mode.as_str());
        }
        if let Some(sequence) = &self.sequence {
            config.sequence = sequence.clone();
        }
        self.overlay(config)
    }

    fn overlay(&self, mut config: OrchestrationConfig) -> OrchestrationConfig {
        if let Some(rounds) = self.rounds {
            config.rounds = Some(rounds);
        }
        if let Some(early_stop) = self.early_stop {
            config.early_stop = Some(early_stop);
        }
        if let Some(ratio) = self.min_change_ratio {
            config.min_change_ratio = Some(ratio);
        }
        if let Some(t) = self.seed_temperature {
            config.seed_temperature = Some(t);
        }
        if let Some(t) = self.refine_temperature {
            config.refine_temperature = Some(t);
        }
        if let Some(enabled) = self.use_judge {
            config.use_judge = enabled;
        }
        if let Some(enabled) = self.use_verifier {
            config.use_verifier = enabled;
        }
        if let Some(max_tokens) = self.max_tokens {
            config.max_tokens = Some(max_tokens);
        }
        config
    }
}

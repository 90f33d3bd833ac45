//! Orchestration value objects - immutable records of one run.
//!
//! - [`Completion`] - one provider's response to one invocation
//! - [`Step`] - one logged round: who was asked what, and what came back
//! - [`OrchestrationResult`] - the final answer plus the full step log and totals

use super::diff::Diff;
use super::mode::OrchestrationMode;
use serde::{Deserialize, Serialize};

/// Token accounting reported by a provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl Usage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
        }
    }

    /// Usage with a total reported by the server, kept as-is.
    pub fn with_total(prompt_tokens: u32, completion_tokens: u32, total_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens,
        }
    }
}

/// One provider response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    pub latency_ms: u64,
    /// Echo of the provider that produced this completion
    pub provider_id: String,
    /// Echo of the model that produced this completion
    pub model: String,
}

impl Completion {
    pub fn new(
        provider_id: impl Into<String>,
        model: impl Into<String>,
        text: impl Into<String>,
        latency_ms: u64,
    ) -> Self {
        Self {
            text: text.into(),
            usage: None,
            latency_ms,
            provider_id: provider_id.into(),
            model: model.into(),
        }
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Total tokens, counting a missing usage report as zero.
    pub fn total_tokens(&self) -> u64 {
        self.usage.map(|u| u64::from(u.total_tokens)).unwrap_or(0)
    }
}

/// One append-only entry of a run's trace.
///
/// Round numbers need not be unique: parallel branches share one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub round: u32,
    pub provider_id: String,
    /// Snapshot of the prompt that produced the response
    pub prompt: String,
    pub response: Completion,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<Diff>,
}

impl Step {
    pub fn new(round: u32, prompt: impl Into<String>, response: Completion) -> Self {
        Self {
            round,
            provider_id: response.provider_id.clone(),
            prompt: prompt.into(),
            response,
            diff: None,
        }
    }

    /// A step attributed to the provider that was invoked, whatever id the
    /// completion itself reports.
    pub fn for_provider(
        round: u32,
        provider_id: impl Into<String>,
        prompt: impl Into<String>,
        response: Completion,
    ) -> Self {
        Self {
            provider_id: provider_id.into(),
            ..Self::new(round, prompt, response)
        }
    }

    pub fn with_diff(mut self, diff: Diff) -> Self {
        self.diff = Some(diff);
        self
    }

    pub fn text(&self) -> &str {
        &self.response.text
    }
}

/// Complete result of one orchestration run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestrationResult {
    pub final_answer: String,
    pub steps: Vec<Step>,
    pub total_tokens: u64,
    pub total_latency_ms: u64,
    pub early_stopped: bool,
    pub mode: OrchestrationMode,
}

impl OrchestrationResult {
    /// Sum of every step's token total, the value `total_tokens` must equal.
    pub fn step_token_sum(&self) -> u64 {
        self.steps.iter().map(|s| s.response.total_tokens()).sum()
    }

    /// Distinct provider ids in the order they first spoke.
    pub fn providers(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for step in &self.steps {
            if !seen.contains(&step.provider_id.as_str()) {
                seen.push(&step.provider_id);
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_total() {
        let usage = Usage::new(12, 30);
        assert_eq!(usage.total_tokens, 42);
    }

    #[test]
    fn test_usage_total_saturates() {
        let usage = Usage::new(u32::MAX, 10);
        assert_eq!(usage.total_tokens, u32::MAX);
        assert_eq!(Usage::with_total(3, 4, 9).total_tokens, 9);
    }

    #[test]
    fn test_step_for_provider_overrides_echoed_id() {
        let step = Step::for_provider(2, "p2", "prompt", Completion::new("echo", "m", "hi", 10));
        assert_eq!(step.provider_id, "p2");
        assert_eq!(step.round, 2);
        assert_eq!(step.response.provider_id, "echo");
    }

    #[test]
    fn test_missing_usage_counts_as_zero() {
        let completion = Completion::new("p1", "m", "hi", 10);
        assert_eq!(completion.total_tokens(), 0);
        let completion = completion.with_usage(Usage::new(1, 2));
        assert_eq!(completion.total_tokens(), 3);
    }

    #[test]
    fn test_step_copies_provider_id() {
        let step = Step::new(1, "prompt", Completion::new("p1", "m", "hi", 10));
        assert_eq!(step.provider_id, "p1");
        assert_eq!(step.text(), "hi");
        assert!(step.diff.is_none());
    }

    #[test]
    fn test_result_providers_deduplicated() {
        let result = OrchestrationResult {
            final_answer: "x".to_string(),
            steps: vec![
                Step::new(1, "", Completion::new("a", "m", "1", 1).with_usage(Usage::new(1, 1))),
                Step::new(2, "", Completion::new("b", "m", "2", 1)),
                Step::new(3, "", Completion::new("a", "m", "3", 1).with_usage(Usage::new(2, 2))),
            ],
            total_tokens: 6,
            total_latency_ms: 3,
            early_stopped: false,
            mode: OrchestrationMode::Answer,
        };
        assert_eq!(result.providers(), vec!["a", "b"]);
        assert_eq!(result.step_token_sum(), 6);
    }

    #[test]
    fn test_completion_json_skips_missing_usage() {
        let json = serde_json::to_value(Completion::new("p1", "m", "hi", 5)).unwrap();
        assert!(json.get("usage").is_none());
        assert_eq!(json["latency_ms"], 5);
    }
}

//! Append-only step log with running totals.

use tandem_domain::{OrchestrationMode, OrchestrationResult, Step};

/// Steps of one run plus the aggregate token and latency totals.
///
/// Missing usage counts as zero tokens. Sequential steps add their latency;
/// a parallel pair adds only the slower of the two.
#[derive(Debug, Default)]
pub(super) struct RunLedger {
    steps: Vec<Step>,
    total_tokens: u64,
    total_latency_ms: u64,
}

impl RunLedger {
    pub(super) fn record(&mut self, step: Step) {
        self.total_tokens += step.response.total_tokens();
        self.total_latency_ms += step.response.latency_ms;
        self.steps.push(step);
    }

    /// Record two steps that ran concurrently.
    pub(super) fn record_parallel(&mut self, left: Step, right: Step) {
        self.total_tokens += left.response.total_tokens() + right.response.total_tokens();
        self.total_latency_ms += left.response.latency_ms.max(right.response.latency_ms);
        self.steps.push(left);
        self.steps.push(right);
    }

    pub(super) fn len(&self) -> usize {
        self.steps.len()
    }

    pub(super) fn last(&self) -> Option<&Step> {
        self.steps.last()
    }

    /// Result as it stands, leaving the ledger usable.
    pub(super) fn snapshot(
        &self,
        final_answer: &str,
        early_stopped: bool,
        mode: OrchestrationMode,
    ) -> OrchestrationResult {
        OrchestrationResult {
            final_answer: final_answer.to_string(),
            steps: self.steps.clone(),
            total_tokens: self.total_tokens,
            total_latency_ms: self.total_latency_ms,
            early_stopped,
            mode,
        }
    }

    pub(super) fn finish(
        self,
        final_answer: String,
        early_stopped: bool,
        mode: OrchestrationMode,
    ) -> OrchestrationResult {
        OrchestrationResult {
            final_answer,
            steps: self.steps,
            total_tokens: self.total_tokens,
            total_latency_ms: self.total_latency_ms,
            early_stopped,
            mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tandem_domain::{Completion, Usage};

    fn step(provider: &str, tokens: Option<(u32, u32)>, latency: u64) -> Step {
        let mut completion = Completion::new(provider, "m", "text", latency);
        if let Some((prompt, output)) = tokens {
            completion = completion.with_usage(Usage::new(prompt, output));
        }
        Step::new(1, "prompt", completion)
    }

    #[test]
    fn test_sequential_totals() {
        let mut ledger = RunLedger::default();
        ledger.record(step("a", Some((10, 5)), 100));
        ledger.record(step("b", None, 50));
        let result = ledger.finish("done".to_string(), false, OrchestrationMode::Answer);
        assert_eq!(result.total_tokens, 15);
        assert_eq!(result.total_latency_ms, 150);
        assert_eq!(result.total_tokens, result.step_token_sum());
    }

    #[test]
    fn test_parallel_latency_is_max() {
        let mut ledger = RunLedger::default();
        ledger.record_parallel(step("a", Some((1, 1)), 300), step("b", Some((2, 2)), 120));
        assert_eq!(ledger.len(), 2);
        let result = ledger.snapshot("x", false, OrchestrationMode::Argumentative);
        assert_eq!(result.total_latency_ms, 300);
        assert_eq!(result.total_tokens, 6);
    }
}

//! Run Orchestration use case
//!
//! Drives one orchestration run: resolve the provider sequence, pick the
//! mode procedure, run it and report exactly one terminal event.
//!
//! Each run is independent. The use case holds only read-only collaborators,
//! so one instance can serve many runs concurrently.

mod answer;
mod argumentative;
mod conversation;
mod ledger;
mod pair;
mod research;
mod turn;

#[cfg(test)]
pub(crate) mod test_support;

use crate::ports::completion_invoker::{CompletionInvoker, InvokerError};
use crate::ports::event_sink::{EventSink, NoEvents};
use crate::ports::review::{AnswerJudge, AnswerVerifier, FixedScoreJudge, NoVerification};
use std::sync::Arc;
use tandem_domain::{
    Message, OrchestrationConfig, OrchestrationMode, OrchestrationResult, ProviderRegistry,
    StreamEvent, split_question,
};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use turn::RunContext;

/// Errors that can occur during an orchestration run
#[derive(Error, Debug)]
pub enum RunOrchestrationError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unsupported orchestration mode: {0}")]
    UnsupportedMode(String),

    #[error("Provider {provider_id} failed: {source}")]
    ProviderInvocation {
        provider_id: String,
        #[source]
        source: InvokerError,
    },

    #[error("Operation cancelled")]
    Cancelled,
}

impl RunOrchestrationError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Provider that caused the failure, if any
    pub fn provider_id(&self) -> Option<&str> {
        match self {
            Self::ProviderInvocation { provider_id, .. } => Some(provider_id),
            _ => None,
        }
    }
}

/// Input for the RunOrchestration use case
#[derive(Debug, Clone)]
pub struct RunOrchestrationInput {
    /// Conversation so far; the last message is the question
    pub messages: Vec<Message>,
    pub config: OrchestrationConfig,
}

impl RunOrchestrationInput {
    pub fn new(messages: Vec<Message>, config: OrchestrationConfig) -> Self {
        Self { messages, config }
    }

    /// Single-question input with no prior history
    pub fn question(question: impl Into<String>, config: OrchestrationConfig) -> Self {
        Self::new(vec![Message::user(question)], config)
    }
}

/// Use case for running one orchestration
pub struct RunOrchestrationUseCase<I: CompletionInvoker + 'static> {
    invoker: Arc<I>,
    registry: Arc<ProviderRegistry>,
    judge: Arc<dyn AnswerJudge>,
    verifier: Arc<dyn AnswerVerifier>,
    cancellation_token: Option<CancellationToken>,
}

impl<I: CompletionInvoker + 'static> RunOrchestrationUseCase<I> {
    pub fn new(invoker: Arc<I>, registry: Arc<ProviderRegistry>) -> Self {
        Self {
            invoker,
            registry,
            judge: Arc::new(FixedScoreJudge::default()),
            verifier: Arc::new(NoVerification),
            cancellation_token: None,
        }
    }

    pub fn with_judge(mut self, judge: Arc<dyn AnswerJudge>) -> Self {
        self.judge = judge;
        self
    }

    pub fn with_verifier(mut self, verifier: Arc<dyn AnswerVerifier>) -> Self {
        self.verifier = verifier;
        self
    }

    /// Set a cancellation token checked before every invocation
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Execute the use case without observing events
    pub async fn execute(
        &self,
        input: RunOrchestrationInput,
    ) -> Result<OrchestrationResult, RunOrchestrationError> {
        self.execute_with_events(input, &NoEvents).await
    }

    /// Execute the use case, streaming progress to `events`.
    ///
    /// The sink receives exactly one terminal event: a non-provisional
    /// `final` on success or `error` on failure.
    pub async fn execute_with_events(
        &self,
        input: RunOrchestrationInput,
        events: &dyn EventSink,
    ) -> Result<OrchestrationResult, RunOrchestrationError> {
        match self.run(&input, events).await {
            Ok(result) => {
                events.emit(&StreamEvent::Final {
                    final_result: result.clone(),
                    provisional: false,
                });
                Ok(result)
            }
            Err(e) => {
                warn!("Orchestration failed: {}", e);
                events.emit(&StreamEvent::Error {
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        input: &RunOrchestrationInput,
        events: &dyn EventSink,
    ) -> Result<OrchestrationResult, RunOrchestrationError> {
        let config = &input.config;

        let resolved = self.registry.resolve_sequence(config.sequence.as_slice());
        if !resolved.skipped.is_empty() {
            debug!("Skipping unknown or disabled providers: {:?}", resolved.skipped);
        }
        if resolved.is_empty() {
            return Err(RunOrchestrationError::Configuration(
                "No valid providers in sequence".to_string(),
            ));
        }

        let mode: OrchestrationMode = config
            .mode
            .parse()
            .map_err(|_| RunOrchestrationError::UnsupportedMode(config.mode.clone()))?;

        if resolved.len() < mode.min_providers() {
            return Err(RunOrchestrationError::Configuration(format!(
                "{} mode requires at least {} providers ({}), got {}",
                mode,
                mode.min_providers(),
                mode.roles(),
                resolved.len()
            )));
        }

        let settings = config.settings(mode);
        let (question, history) = split_question(&input.messages);

        info!(
            "Starting {} orchestration with {} providers",
            mode,
            resolved.len()
        );

        let ctx = RunContext {
            invoker: &self.invoker,
            events,
            judge: self.judge.as_ref(),
            verifier: self.verifier.as_ref(),
            cancellation_token: self.cancellation_token.as_ref(),
            question,
            history,
            providers: &resolved.providers,
            settings,
        };

        let result = match mode {
            OrchestrationMode::Conversation => conversation::run(&ctx).await,
            OrchestrationMode::Answer => answer::run(&ctx).await,
            OrchestrationMode::Argumentative => argumentative::run(&ctx).await,
            OrchestrationMode::Research => research::run(&ctx).await,
        }?;

        info!(
            "{} orchestration finished: {} steps, {} tokens, {} ms{}",
            mode,
            result.steps.len(),
            result.total_tokens,
            result.total_latency_ms,
            if result.early_stopped {
                " (early stop)"
            } else {
                ""
            }
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{RecordingSink, ScriptedInvoker, registry};
    use super::*;

    fn use_case(invoker: ScriptedInvoker, providers: usize) -> RunOrchestrationUseCase<ScriptedInvoker> {
        RunOrchestrationUseCase::new(Arc::new(invoker), Arc::new(registry(providers)))
    }

    #[tokio::test]
    async fn test_two_plus_two_stops_early() {
        let invoker = ScriptedInvoker::new().always("p1", "4").always("p2", "4");
        let uc = use_case(invoker, 2);
        let config = OrchestrationConfig::new("answer", vec!["p1", "p2"])
            .with_rounds(2)
            .with_early_stop(true)
            .with_min_change_ratio(0.02)
            .with_seed_temperature(0.35)
            .with_refine_temperature(0.15);

        let result = uc
            .execute(RunOrchestrationInput::question("What is 2+2?", config))
            .await
            .unwrap();

        assert!(result.early_stopped);
        assert_eq!(result.steps.len(), 2);
        assert_eq!(result.final_answer, "4");
        assert_eq!(result.steps[1].diff.as_ref().unwrap().ratio, 0.0);
    }

    #[tokio::test]
    async fn test_empty_sequence_fails_before_invocation() {
        let invoker = Arc::new(ScriptedInvoker::new().always("p1", "x"));
        let uc = RunOrchestrationUseCase::new(Arc::clone(&invoker), Arc::new(registry(3)));
        let sink = RecordingSink::default();

        let config = OrchestrationConfig::new("answer", vec!["missing", "also-missing"]);
        let err = uc
            .execute_with_events(RunOrchestrationInput::question("q", config), &sink)
            .await
            .unwrap_err();

        assert!(matches!(err, RunOrchestrationError::Configuration(_)));
        assert!(invoker.calls().is_empty());
        assert_eq!(sink.kinds(), vec!["error"]);
    }

    #[tokio::test]
    async fn test_disabled_providers_are_skipped() {
        let invoker = Arc::new(ScriptedInvoker::new().always("p1", "x"));
        let mut providers: Vec<_> = registry(2).iter().cloned().collect();
        providers[1].enabled = false;
        let uc = RunOrchestrationUseCase::new(
            Arc::clone(&invoker),
            Arc::new(ProviderRegistry::new(providers)),
        );

        let config = OrchestrationConfig::new("conversation", vec!["p1", "p2"]);
        let result = uc
            .execute(RunOrchestrationInput::question("q", config))
            .await
            .unwrap();

        assert_eq!(result.steps.len(), 1);
        assert_eq!(result.providers(), vec!["p1"]);
    }

    #[tokio::test]
    async fn test_unknown_mode_is_rejected() {
        let uc = use_case(ScriptedInvoker::new(), 3);
        let sink = RecordingSink::default();
        let config = OrchestrationConfig::new("freestyle", vec!["p1", "p2", "p3"]);

        let err = uc
            .execute_with_events(RunOrchestrationInput::question("q", config), &sink)
            .await
            .unwrap_err();

        match err {
            RunOrchestrationError::UnsupportedMode(mode) => assert_eq!(mode, "freestyle"),
            other => panic!("expected UnsupportedMode, got {other:?}"),
        }
        assert_eq!(sink.kinds(), vec!["error"]);
    }

    #[tokio::test]
    async fn test_mode_minimum_is_enforced() {
        for (mode, available) in [("answer", 1), ("argumentative", 2), ("research", 2)] {
            let uc = use_case(ScriptedInvoker::new(), available);
            let sequence: Vec<String> = (1..=available).map(|i| format!("p{i}")).collect();
            let err = uc
                .execute(RunOrchestrationInput::question(
                    "q",
                    OrchestrationConfig::new(mode, sequence),
                ))
                .await
                .unwrap_err();
            assert!(
                matches!(err, RunOrchestrationError::Configuration(_)),
                "{mode} with {available} providers"
            );
        }
    }

    #[tokio::test]
    async fn test_invocation_failure_emits_single_error() {
        let invoker = ScriptedInvoker::new()
            .always("p1", "seed answer")
            .failing("p2", "connection refused");
        let uc = use_case(invoker, 3);
        let sink = RecordingSink::default();

        let config = OrchestrationConfig::new("answer", vec!["p1", "p2", "p3"]);
        let err = uc
            .execute_with_events(RunOrchestrationInput::question("q", config), &sink)
            .await
            .unwrap_err();

        assert_eq!(err.provider_id(), Some("p2"));
        assert_eq!(
            sink.kinds(),
            vec!["round_start", "round_result", "round_start", "error"]
        );
        assert_eq!(sink.terminal_count(), 1);
    }

    #[tokio::test]
    async fn test_success_emits_single_final_last() {
        let invoker = ScriptedInvoker::new()
            .always("p1", "alpha beta")
            .always("p2", "alpha gamma")
            .always("p3", "alpha gamma delta");
        let uc = use_case(invoker, 3);
        let sink = RecordingSink::default();

        let config = OrchestrationConfig::new("answer", vec!["p1", "p2", "p3"]);
        uc.execute_with_events(RunOrchestrationInput::question("q", config), &sink)
            .await
            .unwrap();

        let kinds = sink.kinds();
        assert_eq!(kinds.last(), Some(&"final"));
        assert_eq!(kinds.iter().filter(|k| **k == "final").count(), 1);
        assert_eq!(sink.terminal_count(), 1);
    }

    #[tokio::test]
    async fn test_steps_keep_invoked_provider_ids() {
        let invoker = ScriptedInvoker::new()
            .always("p1", "alpha beta")
            .always("p2", "alpha gamma")
            .always("p3", "alpha gamma delta")
            .reporting_as("p9");
        let uc = use_case(invoker, 3);

        let config = OrchestrationConfig::new("answer", vec!["p1", "p2", "p3"]);
        let result = uc
            .execute(RunOrchestrationInput::question("q", config))
            .await
            .unwrap();

        assert_eq!(result.providers(), vec!["p1", "p2", "p3"]);
    }

    #[tokio::test]
    async fn test_history_precedes_question() {
        let invoker = Arc::new(ScriptedInvoker::new().always("p1", "ok"));
        let uc = RunOrchestrationUseCase::new(Arc::clone(&invoker), Arc::new(registry(1)));

        let messages = vec![
            Message::user("earlier question"),
            Message::assistant("earlier answer"),
            Message::user("follow-up question"),
        ];
        let config = OrchestrationConfig::new("conversation", vec!["p1"]);
        uc.execute(RunOrchestrationInput::new(messages, config))
            .await
            .unwrap();

        let calls = invoker.calls();
        let contents: Vec<&str> = calls[0].messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(
            &contents[1..],
            &["earlier question", "earlier answer", "follow-up question"]
        );
    }

    #[tokio::test]
    async fn test_cancelled_run_does_not_invoke() {
        let invoker = Arc::new(ScriptedInvoker::new().always("p1", "x").always("p2", "y"));
        let token = CancellationToken::new();
        token.cancel();
        let uc = RunOrchestrationUseCase::new(Arc::clone(&invoker), Arc::new(registry(2)))
            .with_cancellation(token);
        let sink = RecordingSink::default();

        let config = OrchestrationConfig::new("answer", vec!["p1", "p2"]);
        let err = uc
            .execute_with_events(RunOrchestrationInput::question("q", config), &sink)
            .await
            .unwrap_err();

        assert!(err.is_cancelled());
        assert!(invoker.calls().is_empty());
        assert_eq!(sink.kinds(), vec!["error"]);
    }

    #[tokio::test]
    async fn test_max_tokens_override_reaches_invoker() {
        let invoker = Arc::new(ScriptedInvoker::new().always("p1", "x"));
        let uc = RunOrchestrationUseCase::new(Arc::clone(&invoker), Arc::new(registry(1)));

        let config = OrchestrationConfig::new("conversation", vec!["p1"]).with_max_tokens(256);
        uc.execute(RunOrchestrationInput::question("q", config))
            .await
            .unwrap();

        assert_eq!(invoker.calls()[0].max_tokens, Some(256));
    }
}

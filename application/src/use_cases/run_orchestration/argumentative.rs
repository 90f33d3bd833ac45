//! Argumentative mode: two parallel proposals, then an arbiter.

use super::RunOrchestrationError;
use super::ledger::RunLedger;
use super::pair::{BranchFailure, JoinPair, Side};
use super::turn::RunContext;
use crate::ports::completion_invoker::{CompletionInvoker, InvokerError};
use std::sync::Arc;
use tandem_domain::{
    Completion, Message, OrchestrationResult, PromptTemplate, Provider, Step, StreamEvent,
};
use tracing::{debug, warn};

pub(super) async fn run<I: CompletionInvoker + 'static>(
    ctx: &RunContext<'_, I>,
) -> Result<OrchestrationResult, RunOrchestrationError> {
    let settings = &ctx.settings;
    let mut ledger = RunLedger::default();

    // Both proposers share round 1, so they must be different providers.
    let (id_a, id_b) = (&ctx.provider(0).id, &ctx.provider(1).id);
    if id_a == id_b {
        return Err(RunOrchestrationError::Configuration(format!(
            "argumentative mode needs two different proposers, got {} twice",
            id_a
        )));
    }

    let (response_a, response_b) = propose(ctx).await?;
    let text_a = response_a.text.clone();
    let text_b = response_b.text.clone();
    ledger.record_parallel(
        Step::for_provider(1, id_a, ctx.question, response_a),
        Step::for_provider(1, id_b, ctx.question, response_b),
    );

    let arbiter = ctx
        .turn(
            2,
            ctx.provider(2),
            ctx.messages(
                PromptTemplate::arbiter_system(),
                Some(PromptTemplate::arbiter_prompt(&text_a, &text_b)),
            ),
            settings.refine_temperature,
        )
        .await?;
    let diff = ctx.diff(2, &text_a, arbiter.text());
    let final_answer = arbiter.text().to_string();
    ledger.record(arbiter.with_diff(diff));

    Ok(ledger.finish(final_answer, false, settings.mode))
}

/// Round 1: both proposers start together and results are reported A then B.
async fn propose<I: CompletionInvoker + 'static>(
    ctx: &RunContext<'_, I>,
) -> Result<(Completion, Completion), RunOrchestrationError> {
    ctx.check_cancelled()?;

    let provider_a = ctx.provider(0).clone();
    let provider_b = ctx.provider(1).clone();
    for provider in [&provider_a, &provider_b] {
        ctx.events.emit(&StreamEvent::RoundStart {
            round: 1,
            provider_id: provider.id.clone(),
        });
    }

    let messages = ctx.messages(PromptTemplate::debate_propose_system(), None);
    debug!(
        "Round 1: {} and {} proposing in parallel",
        provider_a.id, provider_b.id
    );

    let pair = JoinPair::spawn(
        invoke_owned(
            Arc::clone(ctx.invoker),
            provider_a.clone(),
            messages.clone(),
            ctx.settings.seed_temperature,
            ctx.settings.max_tokens,
        ),
        invoke_owned(
            Arc::clone(ctx.invoker),
            provider_b.clone(),
            messages,
            ctx.settings.seed_temperature,
            ctx.settings.max_tokens,
        ),
    );

    let (response_a, response_b) = pair.try_join().await.map_err(|(side, failure)| {
        let provider = match side {
            Side::Left => &provider_a,
            Side::Right => &provider_b,
        };
        let source = match failure {
            BranchFailure::Failed(e) => e,
            BranchFailure::Aborted(reason) => {
                InvokerError::Other(format!("invocation task ended abnormally: {}", reason))
            }
        };
        warn!("Proposer {} failed: {}", provider.id, source);
        RunOrchestrationError::ProviderInvocation {
            provider_id: provider.id.clone(),
            source,
        }
    })?;

    for (provider, response) in [(&provider_a, &response_a), (&provider_b, &response_b)] {
        ctx.events.emit(&StreamEvent::RoundResult {
            round: 1,
            provider_id: provider.id.clone(),
            result: response.clone(),
        });
    }

    Ok((response_a, response_b))
}

async fn invoke_owned<I: CompletionInvoker + 'static>(
    invoker: Arc<I>,
    provider: Provider,
    messages: Vec<Message>,
    temperature: f32,
    max_tokens: Option<u32>,
) -> Result<Completion, InvokerError> {
    invoker
        .invoke(&provider, &messages, temperature, max_tokens)
        .await
}

#[cfg(test)]
mod tests {
    use super::super::RunOrchestrationError;
    use super::super::test_support::{ScriptedInvoker, run_recorded, sequence};
    use std::sync::Arc;
    use std::time::Duration;
    use tandem_domain::{OrchestrationConfig, StreamEvent};

    fn config() -> OrchestrationConfig {
        OrchestrationConfig::new("argumentative", sequence(3))
    }

    #[tokio::test]
    async fn test_three_steps_with_parallel_latency() {
        let invoker = Arc::new(
            ScriptedInvoker::new()
                .reply_with("p1", "yes because a", (5, 5), 400)
                .reply_with("p2", "no because b", (3, 3), 250)
                .reply_with("p3", "yes on balance", (7, 8), 100),
        );
        let (result, _) = run_recorded(&invoker, 3, config()).await;
        let result = result.unwrap();

        assert_eq!(result.steps.len(), 3);
        let rounds: Vec<u32> = result.steps.iter().map(|s| s.round).collect();
        assert_eq!(rounds, vec![1, 1, 2]);
        assert_eq!(result.total_latency_ms, 400 + 100);
        assert_eq!(result.total_tokens, 31);
        assert!(!result.early_stopped);
        assert_eq!(result.final_answer, "yes on balance");
        assert_eq!(result.steps[0].prompt, "question?");
        assert!(result.steps[2].diff.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_proposals_run_concurrently_and_report_in_order() {
        let invoker = Arc::new(
            ScriptedInvoker::new()
                .delayed("p1", "slow proposal", Duration::from_millis(300))
                .delayed("p2", "fast proposal", Duration::from_millis(100))
                .always("p3", "ruling"),
        );

        let started = tokio::time::Instant::now();
        let (result, sink) = run_recorded(&invoker, 3, config()).await;
        result.unwrap();
        assert!(started.elapsed() < Duration::from_millis(400));

        let trace: Vec<(&str, Option<String>)> = sink
            .events()
            .iter()
            .map(|e| {
                let provider = match e {
                    StreamEvent::RoundStart { provider_id, .. }
                    | StreamEvent::RoundResult { provider_id, .. } => Some(provider_id.clone()),
                    _ => None,
                };
                (e.kind(), provider)
            })
            .collect();
        let p = |id: &str| Some(id.to_string());
        assert_eq!(
            trace,
            vec![
                ("round_start", p("p1")),
                ("round_start", p("p2")),
                ("round_result", p("p1")),
                ("round_result", p("p2")),
                ("round_start", p("p3")),
                ("round_result", p("p3")),
                ("diff", None),
                ("final", None),
            ]
        );
    }

    #[tokio::test]
    async fn test_arbiter_sees_both_responses() {
        let invoker = Arc::new(
            ScriptedInvoker::new()
                .always("p1", "alpha")
                .always("p2", "beta")
                .always("p3", "gamma"),
        );
        run_recorded(&invoker, 3, config()).await.0.unwrap();

        let arbiter_call = invoker
            .calls()
            .into_iter()
            .find(|c| c.provider_id == "p3")
            .unwrap();
        let prompt = &arbiter_call.messages.last().unwrap().content;
        assert!(prompt.contains("Response A:\nalpha"));
        assert!(prompt.contains("Response B:\nbeta"));
        assert!((arbiter_call.temperature - 0.2).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_proposer_failure_aborts_before_arbiter() {
        let invoker = Arc::new(
            ScriptedInvoker::new()
                .always("p1", "alpha")
                .failing("p2", "connection reset")
                .always("p3", "gamma"),
        );
        let (result, sink) = run_recorded(&invoker, 3, config()).await;

        let err = result.unwrap_err();
        assert_eq!(err.provider_id(), Some("p2"));
        assert_eq!(invoker.calls_to("p3"), 0);
        assert_eq!(sink.kinds().last(), Some(&"error"));
        assert!(!sink.kinds().contains(&"final"));
        assert_eq!(sink.terminal_count(), 1);
    }

    #[tokio::test]
    async fn test_same_provider_cannot_propose_twice() {
        let invoker = Arc::new(ScriptedInvoker::new().always("p1", "alpha").always("p3", "gamma"));
        let config = OrchestrationConfig::new("argumentative", vec!["p1", "p1", "p3"]);
        let (result, sink) = run_recorded(&invoker, 3, config).await;

        assert!(matches!(
            result.unwrap_err(),
            RunOrchestrationError::Configuration(_)
        ));
        assert!(invoker.calls().is_empty());
        assert_eq!(sink.kinds(), vec!["error"]);
    }

    #[tokio::test]
    async fn test_steps_name_the_invoked_providers() {
        let invoker = Arc::new(
            ScriptedInvoker::new()
                .always("p1", "alpha")
                .always("p2", "beta")
                .always("p3", "gamma")
                .reporting_as("somebody-else"),
        );
        let (result, _) = run_recorded(&invoker, 3, config()).await;

        let ids: Vec<&str> = result
            .as_ref()
            .unwrap()
            .steps
            .iter()
            .map(|s| s.provider_id.as_str())
            .collect();
        assert_eq!(ids, vec!["p1", "p2", "p3"]);
    }
}

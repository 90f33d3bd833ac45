//! Conversation mode: up to three speakers answer in sequence.
//!
//! Each speaker after the first sees every earlier response as a follow-up
//! turn. The final answer is the lone response, or all responses joined by a
//! horizontal-rule separator.

use super::RunOrchestrationError;
use super::ledger::RunLedger;
use super::turn::RunContext;
use crate::ports::completion_invoker::CompletionInvoker;
use tandem_domain::orchestration::config::CONVERSATION_MAX_SPEAKERS;
use tandem_domain::{OrchestrationResult, PromptTemplate};

const SPEAKER_SEPARATOR: &str = "\n\n---\n\n";

pub(super) async fn run<I: CompletionInvoker + 'static>(
    ctx: &RunContext<'_, I>,
) -> Result<OrchestrationResult, RunOrchestrationError> {
    let mut ledger = RunLedger::default();
    let mut responses: Vec<String> = Vec::new();

    for (position, provider) in ctx
        .providers
        .iter()
        .take(CONVERSATION_MAX_SPEAKERS)
        .enumerate()
    {
        let follow_up =
            (!responses.is_empty()).then(|| PromptTemplate::previous_speakers(&responses));
        let messages = ctx.messages(PromptTemplate::conversation_system(position), follow_up);

        let step = ctx
            .turn(
                position as u32 + 1,
                provider,
                messages,
                ctx.settings.seed_temperature,
            )
            .await?;
        responses.push(step.text().to_string());
        ledger.record(step);
    }

    let final_answer = if responses.len() == 1 {
        responses.remove(0)
    } else {
        responses.join(SPEAKER_SEPARATOR)
    };

    Ok(ledger.finish(final_answer, false, ctx.settings.mode))
}

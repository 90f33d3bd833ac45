//! Research mode: outline, suggestions, rewrite, then optional revision
//! rounds of suggest + revise.

use super::RunOrchestrationError;
use super::ledger::RunLedger;
use super::turn::RunContext;
use crate::ports::completion_invoker::CompletionInvoker;
use tandem_domain::{OrchestrationResult, PromptTemplate};
use tracing::info;

pub(super) async fn run<I: CompletionInvoker + 'static>(
    ctx: &RunContext<'_, I>,
) -> Result<OrchestrationResult, RunOrchestrationError> {
    let settings = &ctx.settings;
    let (lead, suggester, writer) = (ctx.provider(0), ctx.provider(1), ctx.provider(2));
    let mut ledger = RunLedger::default();

    let outline = ctx
        .turn(
            1,
            lead,
            ctx.messages(PromptTemplate::research_lead_system(), None),
            settings.seed_temperature,
        )
        .await?;
    let outline_text = outline.text().to_string();
    ledger.record(outline);

    let suggestions = ctx
        .turn(
            2,
            suggester,
            ctx.messages(
                PromptTemplate::research_suggest_system(),
                Some(PromptTemplate::research_outline_prompt(&outline_text)),
            ),
            settings.refine_temperature,
        )
        .await?;
    let suggestions_text = suggestions.text().to_string();
    ledger.record(suggestions);

    let rewrite = ctx
        .turn(
            3,
            writer,
            ctx.messages(
                PromptTemplate::research_rewrite_system(),
                Some(PromptTemplate::research_rewrite_prompt(
                    &outline_text,
                    &suggestions_text,
                )),
            ),
            settings.refine_temperature,
        )
        .await?;
    let mut draft = rewrite.text().to_string();
    ledger.record(rewrite);

    // Convergence here ends the loop but is not reported in `early_stopped`.
    for iteration in 2..=settings.rounds {
        // The latest step is always the one that produced `draft`.
        let previous = ledger.last().map(|s| s.text().to_string()).unwrap_or_default();
        let diff = ctx.diff(ledger.len() as u32, &previous, &draft);
        if settings.converged(diff.ratio) {
            info!("Research draft converged before iteration {}", iteration);
            break;
        }

        let critique = ctx
            .turn(
                ledger.len() as u32 + 1,
                suggester,
                ctx.messages(
                    PromptTemplate::research_suggest_system(),
                    Some(PromptTemplate::research_draft_prompt(&draft)),
                ),
                settings.refine_temperature,
            )
            .await?;
        let critique_text = critique.text().to_string();
        ledger.record(critique);

        let revision = ctx
            .turn(
                ledger.len() as u32 + 1,
                writer,
                ctx.messages(
                    PromptTemplate::research_revise_system(),
                    Some(PromptTemplate::research_revise_prompt(&draft, &critique_text)),
                ),
                settings.refine_temperature,
            )
            .await?;
        draft = revision.text().to_string();
        ledger.record(revision);
    }

    Ok(ledger.finish(draft, false, settings.mode))
}

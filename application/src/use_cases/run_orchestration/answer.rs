//! Answer mode: seed, refine, then optionally polish or judge.

use super::RunOrchestrationError;
use super::ledger::RunLedger;
use super::turn::RunContext;
use crate::ports::completion_invoker::CompletionInvoker;
use tandem_domain::orchestration::config::JUDGE_ACCEPT_SCORE;
use tandem_domain::{OrchestrationResult, PromptTemplate, StreamEvent};
use tracing::{debug, info, warn};

pub(super) async fn run<I: CompletionInvoker + 'static>(
    ctx: &RunContext<'_, I>,
) -> Result<OrchestrationResult, RunOrchestrationError> {
    let settings = &ctx.settings;
    let mut ledger = RunLedger::default();

    let seed_provider = ctx.provider(0);
    let seed = ctx
        .turn(
            1,
            seed_provider,
            ctx.messages(PromptTemplate::answer_seed_system(), None),
            settings.seed_temperature,
        )
        .await?;
    let seed_text = seed.text().to_string();
    ledger.record(seed);

    let refine = ctx
        .turn(
            2,
            ctx.provider(1),
            ctx.messages(
                PromptTemplate::answer_refine_system(),
                Some(PromptTemplate::answer_refine_prompt(&seed_text)),
            ),
            settings.refine_temperature,
        )
        .await?;
    let diff = ctx.diff(2, &seed_text, refine.text());
    let early_stopped = settings.converged(diff.ratio);
    let mut current = refine.text().to_string();
    ledger.record(refine.with_diff(diff));

    if early_stopped {
        info!("Refinement converged after round 2, skipping further rounds");
    } else if let Some(polisher) = ctx.providers.get(2) {
        if settings.use_judge {
            let score = ctx.judge.score(ctx.question, &current).await;
            debug!("Judge scored refined answer {:.1}", score);

            ctx.events.emit(&StreamEvent::Final {
                final_result: ledger.snapshot(&current, early_stopped, settings.mode),
                provisional: true,
            });

            if score < JUDGE_ACCEPT_SCORE {
                let extra = ctx
                    .turn(
                        3,
                        seed_provider,
                        ctx.messages(
                            PromptTemplate::answer_refine_system(),
                            Some(PromptTemplate::answer_refine_further_prompt(&current)),
                        ),
                        settings.refine_temperature,
                    )
                    .await?;
                current = extra.text().to_string();
                ledger.record(extra);
            }
        } else {
            let polish = ctx
                .turn(
                    3,
                    polisher,
                    ctx.messages(
                        PromptTemplate::answer_polish_system(),
                        Some(PromptTemplate::answer_polish_prompt(&current)),
                    ),
                    settings.refine_temperature,
                )
                .await?;
            let diff = ctx.diff(3, &current, polish.text());
            current = polish.text().to_string();
            ledger.record(polish.with_diff(diff));
        }
    }

    if settings.use_verifier {
        let report = ctx.verifier.verify(&current).await;
        if report.has_contradictions() {
            warn!(
                "Verifier flagged {} contradicted claim(s)",
                report.contradicted.len()
            );
        }
    }

    Ok(ledger.finish(current, early_stopped, settings.mode))
}

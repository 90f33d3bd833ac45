//! Run context and the turn invocation primitive.
//!
//! Every mode procedure talks to providers exclusively through
//! [`RunContext::turn`]: emit `round_start`, invoke, emit `round_result`,
//! return the populated [`Step`]. Invocation failures propagate to the mode
//! unchanged in meaning; nothing is retried here.

use super::RunOrchestrationError;
use crate::ports::completion_invoker::CompletionInvoker;
use crate::ports::event_sink::EventSink;
use crate::ports::review::{AnswerJudge, AnswerVerifier};
use std::sync::Arc;
use tandem_domain::{Diff, Message, ModeSettings, Provider, Step, StreamEvent};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Everything a mode procedure needs for one run.
///
/// Holds only read-only inputs; modes keep their own mutable state.
pub(super) struct RunContext<'a, I: CompletionInvoker + 'static> {
    pub(super) invoker: &'a Arc<I>,
    pub(super) events: &'a dyn EventSink,
    pub(super) judge: &'a dyn AnswerJudge,
    pub(super) verifier: &'a dyn AnswerVerifier,
    pub(super) cancellation_token: Option<&'a CancellationToken>,
    pub(super) question: &'a str,
    pub(super) history: &'a [Message],
    pub(super) providers: &'a [Provider],
    pub(super) settings: ModeSettings,
}

impl<I: CompletionInvoker + 'static> RunContext<'_, I> {
    /// Provider at `index` of the resolved sequence.
    ///
    /// Callers only index below the mode's validated minimum.
    pub(super) fn provider(&self, index: usize) -> &Provider {
        &self.providers[index]
    }

    /// Build an invocation context: system preamble, prior history, the
    /// question, then an optional follow-up turn.
    pub(super) fn messages(&self, system: &str, follow_up: Option<String>) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.history.len() + 3);
        messages.push(Message::system(system));
        messages.extend(self.history.iter().cloned());
        messages.push(Message::user(self.question));
        if let Some(follow_up) = follow_up {
            messages.push(Message::user(follow_up));
        }
        messages
    }

    /// Fail with `Cancelled` if the host asked the run to stop.
    pub(super) fn check_cancelled(&self) -> Result<(), RunOrchestrationError> {
        if let Some(token) = self.cancellation_token
            && token.is_cancelled()
        {
            return Err(RunOrchestrationError::Cancelled);
        }
        Ok(())
    }

    /// Run one provider turn and emit its events.
    pub(super) async fn turn(
        &self,
        round: u32,
        provider: &Provider,
        messages: Vec<Message>,
        temperature: f32,
    ) -> Result<Step, RunOrchestrationError> {
        self.check_cancelled()?;

        self.events.emit(&StreamEvent::RoundStart {
            round,
            provider_id: provider.id.clone(),
        });
        debug!(
            "Round {}: invoking {} ({}) at temperature {}",
            round, provider.id, provider.model, temperature
        );

        let completion = self
            .invoker
            .invoke(provider, &messages, temperature, self.settings.max_tokens)
            .await
            .map_err(|source| {
                warn!("Provider {} failed in round {}: {}", provider.id, round, source);
                RunOrchestrationError::ProviderInvocation {
                    provider_id: provider.id.clone(),
                    source,
                }
            })?;

        let prompt = messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();

        self.events.emit(&StreamEvent::RoundResult {
            round,
            provider_id: provider.id.clone(),
            result: completion.clone(),
        });

        Ok(Step::for_provider(round, &provider.id, prompt, completion))
    }

    /// Measure the change between two drafts and emit it.
    pub(super) fn diff(&self, round: u32, old: &str, new: &str) -> Diff {
        let diff = Diff::between(old, new);
        debug!(
            "Round {}: change ratio {:.3} (+{} / -{})",
            round,
            diff.ratio,
            diff.added.len(),
            diff.removed.len()
        );
        self.events.emit(&StreamEvent::Diff {
            round,
            diff: diff.clone(),
        });
        diff
    }
}

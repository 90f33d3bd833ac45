//! Scripted invoker and recording sink shared by the engine tests.

use super::{RunOrchestrationError, RunOrchestrationInput, RunOrchestrationUseCase};
use crate::ports::completion_invoker::{CompletionInvoker, InvokerError};
use crate::ports::event_sink::EventSink;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tandem_domain::{
    Completion, Message, OrchestrationConfig, OrchestrationResult, Provider, ProviderKind,
    ProviderRegistry, StreamEvent, Usage,
};

/// Registry of `n` enabled providers named `p1..pn`.
pub(crate) fn registry(n: usize) -> ProviderRegistry {
    ProviderRegistry::new((1..=n).map(|i| {
        Provider::new(
            format!("p{i}"),
            ProviderKind::OpenAiCompat,
            "http://localhost:1",
            format!("model-{i}"),
        )
    }))
}

/// Run `question` against `p1..pn` and keep every emitted event.
pub(crate) async fn run_recorded(
    invoker: &Arc<ScriptedInvoker>,
    providers: usize,
    config: OrchestrationConfig,
) -> (Result<OrchestrationResult, RunOrchestrationError>, RecordingSink) {
    let use_case = RunOrchestrationUseCase::new(Arc::clone(invoker), Arc::new(registry(providers)));
    let sink = RecordingSink::default();
    let result = use_case
        .execute_with_events(RunOrchestrationInput::question("question?", config), &sink)
        .await;
    (result, sink)
}

/// Sequence `p1..pn`
pub(crate) fn sequence(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("p{i}")).collect()
}

#[derive(Clone)]
enum Reply {
    Text {
        text: String,
        usage: Option<Usage>,
        latency_ms: u64,
        delay: Option<Duration>,
    },
    Fail(String),
}

#[derive(Default)]
struct Script {
    queued: VecDeque<Reply>,
    fallback: Option<Reply>,
}

#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub provider_id: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

/// Invoker replaying per-provider scripts.
///
/// Queued replies are consumed first, then the provider's fallback reply.
#[derive(Default)]
pub(crate) struct ScriptedInvoker {
    scripts: Mutex<HashMap<String, Script>>,
    calls: Mutex<Vec<RecordedCall>>,
    reported_id: Option<String>,
}

impl ScriptedInvoker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn script(self, provider_id: &str, apply: impl FnOnce(&mut Script)) -> Self {
        {
            let mut scripts = self.scripts.lock().unwrap();
            apply(scripts.entry(provider_id.to_string()).or_default());
        }
        self
    }

    /// Report `provider_id` in every completion instead of the invoked provider.
    pub(crate) fn reporting_as(mut self, provider_id: &str) -> Self {
        self.reported_id = Some(provider_id.to_string());
        self
    }

    /// Reply with `text` whenever nothing is queued.
    pub(crate) fn always(self, provider_id: &str, text: &str) -> Self {
        let reply = text_reply(text, None, 0, None);
        self.script(provider_id, |s| s.fallback = Some(reply))
    }

    /// Queue one plain reply.
    pub(crate) fn reply(self, provider_id: &str, text: &str) -> Self {
        let reply = text_reply(text, None, 0, None);
        self.script(provider_id, |s| s.queued.push_back(reply))
    }

    /// Queue one reply with usage and reported latency.
    pub(crate) fn reply_with(
        self,
        provider_id: &str,
        text: &str,
        usage: (u32, u32),
        latency_ms: u64,
    ) -> Self {
        let reply = text_reply(text, Some(Usage::new(usage.0, usage.1)), latency_ms, None);
        self.script(provider_id, |s| s.queued.push_back(reply))
    }

    /// Queue one reply that takes `delay` of (tokio) time to arrive.
    pub(crate) fn delayed(self, provider_id: &str, text: &str, delay: Duration) -> Self {
        let reply = text_reply(text, None, delay.as_millis() as u64, Some(delay));
        self.script(provider_id, |s| s.queued.push_back(reply))
    }

    /// Fail every call to this provider.
    pub(crate) fn failing(self, provider_id: &str, message: &str) -> Self {
        let reply = Reply::Fail(message.to_string());
        self.script(provider_id, |s| s.fallback = Some(reply))
    }

    pub(crate) fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn calls_to(&self, provider_id: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.provider_id == provider_id)
            .count()
    }
}

fn text_reply(text: &str, usage: Option<Usage>, latency_ms: u64, delay: Option<Duration>) -> Reply {
    Reply::Text {
        text: text.to_string(),
        usage,
        latency_ms,
        delay,
    }
}

#[async_trait]
impl CompletionInvoker for ScriptedInvoker {
    async fn invoke(
        &self,
        provider: &Provider,
        messages: &[Message],
        temperature: f32,
        max_tokens: Option<u32>,
    ) -> Result<Completion, InvokerError> {
        self.calls.lock().unwrap().push(RecordedCall {
            provider_id: provider.id.clone(),
            messages: messages.to_vec(),
            temperature,
            max_tokens,
        });

        let reply = {
            let mut scripts = self.scripts.lock().unwrap();
            scripts
                .get_mut(&provider.id)
                .and_then(|s| s.queued.pop_front().or_else(|| s.fallback.clone()))
        };

        match reply {
            Some(Reply::Text {
                text,
                usage,
                latency_ms,
                delay,
            }) => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                let reported = self.reported_id.as_ref().unwrap_or(&provider.id);
                let mut completion = Completion::new(reported, &provider.model, text, latency_ms);
                if let Some(usage) = usage {
                    completion = completion.with_usage(usage);
                }
                Ok(completion)
            }
            Some(Reply::Fail(message)) => Err(InvokerError::Connection(message)),
            None => Err(InvokerError::Other(format!(
                "no scripted reply for {}",
                provider.id
            ))),
        }
    }
}

/// Sink that keeps every event in order.
#[derive(Default)]
pub(crate) struct RecordingSink {
    events: Mutex<Vec<StreamEvent>>,
}

impl RecordingSink {
    pub(crate) fn events(&self) -> Vec<StreamEvent> {
        self.events.lock().unwrap().clone()
    }

    pub(crate) fn kinds(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().iter().map(|e| e.kind()).collect()
    }

    pub(crate) fn terminal_count(&self) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.is_terminal())
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &StreamEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

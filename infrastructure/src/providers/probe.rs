//! Provider connectivity probe
//!
//! Sends a tiny "respond with OK" request to check that a provider is
//! reachable and answering, and reports the round-trip latency.

use super::http_invoker::HttpCompletionInvoker;
use futures::future::join_all;
use serde::Serialize;
use tandem_application::{CompletionInvoker, InvokerError};
use tandem_domain::{Message, PromptTemplate, Provider};
use tracing::debug;

const PROBE_MAX_TOKENS: u32 = 10;
const PROBE_TEMPERATURE: f32 = 0.1;

/// Result of probing one provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeOutcome {
    pub provider_id: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProbeOutcome {
    fn from_result(provider: &Provider, result: Result<u64, InvokerError>) -> Self {
        match result {
            Ok(latency_ms) => Self {
                provider_id: provider.id.clone(),
                success: true,
                latency_ms: Some(latency_ms),
                error: None,
            },
            Err(e) => Self {
                provider_id: provider.id.clone(),
                success: false,
                latency_ms: None,
                error: Some(match e {
                    InvokerError::Timeout(_) => "Connection timeout".to_string(),
                    other => other.to_string(),
                }),
            },
        }
    }
}

impl HttpCompletionInvoker {
    /// Check that `provider` answers a minimal request.
    pub async fn probe(&self, provider: &Provider) -> ProbeOutcome {
        let messages = [Message::user(PromptTemplate::probe())];
        let result = self
            .invoke(provider, &messages, PROBE_TEMPERATURE, Some(PROBE_MAX_TOKENS))
            .await
            .map(|completion| completion.latency_ms);
        debug!("Probe {}: {:?}", provider.id, result);
        ProbeOutcome::from_result(provider, result)
    }

    /// Probe several providers concurrently, keeping input order.
    pub async fn probe_all(&self, providers: &[Provider]) -> Vec<ProbeOutcome> {
        join_all(providers.iter().map(|p| self.probe(p))).await
    }
}

//! HTTP completion invoker
//!
//! Implements [`CompletionInvoker`] over reqwest for every provider kind.
//! Anthropic speaks the Messages API; all other kinds share the
//! OpenAI-compatible chat completions endpoint.

use super::wire::{ERROR_BODY_LIMIT, anthropic, openai};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tandem_application::{CompletionInvoker, InvokerError};
use tandem_domain::core::text::preview;
use tandem_domain::{Completion, Message, Provider, ProviderKind, WireFormat};
use tracing::{debug, trace};

const OPENROUTER_REFERER: &str = "https://tandemai.local";
const OPENROUTER_TITLE: &str = "TandemAI";

/// Completion invoker backed by one shared HTTP client
#[derive(Debug, Clone, Default)]
pub struct HttpCompletionInvoker {
    client: Client,
}

impl HttpCompletionInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn endpoint(provider: &Provider) -> String {
        let base = provider.base_url.trim_end_matches('/');
        match provider.kind.wire_format() {
            WireFormat::AnthropicMessages => format!("{}/v1/messages", base),
            WireFormat::OpenAiChat => format!("{}/chat/completions", base),
        }
    }

    fn authorize(provider: &Provider, request: RequestBuilder) -> RequestBuilder {
        let key = provider.api_key.as_deref();
        match provider.kind {
            ProviderKind::Anthropic => request
                .header("x-api-key", key.unwrap_or_default())
                .header("anthropic-version", anthropic::API_VERSION),
            ProviderKind::OpenRouter => request
                .bearer_auth(key.unwrap_or_default())
                .header("HTTP-Referer", OPENROUTER_REFERER)
                .header("X-Title", OPENROUTER_TITLE),
            _ => match key {
                Some(key) => request.bearer_auth(key),
                None => request,
            },
        }
    }

    async fn send(
        &self,
        provider: &Provider,
        body: &impl serde::Serialize,
    ) -> Result<Response, InvokerError> {
        let request = self
            .client
            .post(Self::endpoint(provider))
            .timeout(Duration::from_millis(provider.timeout_ms))
            .json(body);

        let response = Self::authorize(provider, request)
            .send()
            .await
            .map_err(|e| map_transport_error(e, provider.timeout_ms))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                preview(body.trim(), ERROR_BODY_LIMIT)
            };
            return Err(InvokerError::Http {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(
        response: Response,
        timeout_ms: u64,
    ) -> Result<T, InvokerError> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| map_transport_error(e, timeout_ms))?;
        serde_json::from_slice(&bytes).map_err(|e| InvokerError::MalformedResponse(e.to_string()))
    }
}

fn map_transport_error(error: reqwest::Error, timeout_ms: u64) -> InvokerError {
    if error.is_timeout() {
        InvokerError::Timeout(timeout_ms)
    } else if error.is_connect() {
        InvokerError::Connection(error.to_string())
    } else if error.is_decode() {
        InvokerError::MalformedResponse(error.to_string())
    } else {
        InvokerError::Other(error.to_string())
    }
}

#[async_trait]
impl CompletionInvoker for HttpCompletionInvoker {
    async fn invoke(
        &self,
        provider: &Provider,
        messages: &[Message],
        temperature: f32,
        max_tokens: Option<u32>,
    ) -> Result<Completion, InvokerError> {
        let max_tokens = max_tokens.unwrap_or(provider.max_tokens);
        debug!(
            "POST {} ({} messages, max_tokens {})",
            Self::endpoint(provider),
            messages.len(),
            max_tokens
        );

        let started = Instant::now();
        let completion = match provider.kind.wire_format() {
            WireFormat::AnthropicMessages => {
                let body = anthropic::build_request(provider, messages, temperature, max_tokens);
                let response = self.send(provider, &body).await?;
                let parsed: anthropic::MessagesResponse =
                    Self::decode(response, provider.timeout_ms).await?;
                anthropic::into_completion(parsed, provider, elapsed_ms(started))?
            }
            WireFormat::OpenAiChat => {
                let body = openai::build_request(provider, messages, temperature, max_tokens);
                let response = self.send(provider, &body).await?;
                let parsed: openai::ChatResponse =
                    Self::decode(response, provider.timeout_ms).await?;
                openai::into_completion(parsed, provider, elapsed_ms(started))?
            }
        };

        trace!(
            "{} answered in {} ms: {}",
            provider.id,
            completion.latency_ms,
            preview(&completion.text, 80)
        );
        Ok(completion)
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

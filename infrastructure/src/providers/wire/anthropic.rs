//! Anthropic `/v1/messages` bodies
//!
//! System messages are lifted out of the conversation into the top-level
//! `system` field; the rest are sent as single text blocks.

use serde::{Deserialize, Serialize};
use tandem_application::InvokerError;
use tandem_domain::{Completion, Message, Provider, Role, Usage};

pub const API_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
pub struct MessagesRequest<'a> {
    pub model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub messages: Vec<RequestMessage<'a>>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Serialize)]
pub struct RequestMessage<'a> {
    pub role: &'static str,
    pub content: Vec<TextBlock<'a>>,
}

#[derive(Debug, Serialize)]
pub struct TextBlock<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub content: Vec<ResponseBlock>,
    #[serde(default)]
    pub usage: Option<MessagesUsage>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseBlock {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MessagesUsage {
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
}

pub fn build_request<'a>(
    provider: &'a Provider,
    messages: &'a [Message],
    temperature: f32,
    max_tokens: u32,
) -> MessagesRequest<'a> {
    let system: Vec<&str> = messages
        .iter()
        .filter(|m| m.role == Role::System)
        .map(|m| m.content.as_str())
        .collect();

    MessagesRequest {
        model: &provider.model,
        system: (!system.is_empty()).then(|| system.join("\n\n")),
        messages: messages
            .iter()
            .filter(|m| m.role != Role::System)
            .map(|m| RequestMessage {
                role: m.role.as_str(),
                content: vec![TextBlock {
                    kind: "text",
                    text: &m.content,
                }],
            })
            .collect(),
        max_tokens,
        temperature,
    }
}

pub fn into_completion(
    response: MessagesResponse,
    provider: &Provider,
    latency_ms: u64,
) -> Result<Completion, InvokerError> {
    let text = response
        .content
        .into_iter()
        .next()
        .and_then(|b| b.text)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            InvokerError::MalformedResponse(format!(
                "no text block in response from {}",
                provider.id
            ))
        })?;

    let usage = response
        .usage
        .map(|u| Usage::new(u.input_tokens, u.output_tokens))
        .unwrap_or_default();
    Ok(Completion::new(&provider.id, &provider.model, text, latency_ms).with_usage(usage))
}

//! OpenAI-compatible `/chat/completions` bodies

use serde::{Deserialize, Serialize};
use tandem_application::InvokerError;
use tandem_domain::{Completion, Message, Provider, Usage};

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub stream: bool,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    /// Server-computed total; derived from the parts when absent
    #[serde(default)]
    pub total_tokens: Option<u32>,
}

pub fn build_request<'a>(
    provider: &'a Provider,
    messages: &'a [Message],
    temperature: f32,
    max_tokens: u32,
) -> ChatRequest<'a> {
    ChatRequest {
        model: &provider.model,
        messages: messages
            .iter()
            .map(|m| ChatMessage {
                role: m.role.as_str(),
                content: &m.content,
            })
            .collect(),
        temperature,
        max_tokens,
        stream: false,
    }
}

/// Take the first choice's text. An empty or missing text is malformed.
pub fn into_completion(
    response: ChatResponse,
    provider: &Provider,
    latency_ms: u64,
) -> Result<Completion, InvokerError> {
    let text = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            InvokerError::MalformedResponse(format!(
                "no message content in response from {}",
                provider.id
            ))
        })?;

    let mut completion = Completion::new(&provider.id, &provider.model, text, latency_ms);
    if let Some(usage) = response.usage {
        let usage = match usage.total_tokens {
            Some(total) => Usage::with_total(usage.prompt_tokens, usage.completion_tokens, total),
            None => Usage::new(usage.prompt_tokens, usage.completion_tokens),
        };
        completion = completion.with_usage(usage);
    }
    Ok(completion)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tandem_domain::ProviderKind;

    fn provider() -> Provider {
        Provider::new("local", ProviderKind::OpenAiCompat, "http://localhost:11434/v1", "qwen")
    }

    #[test]
    fn test_request_body_shape() {
        let provider = provider();
        let messages = vec![Message::system("be brief"), Message::user("hi")];
        let body = serde_json::to_value(build_request(&provider, &messages, 0.2, 512)).unwrap();

        assert_eq!(body["model"], "qwen");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hi");
        assert_eq!(body["max_tokens"], 512);
        assert_eq!(body["stream"], false);
    }

    #[test]
    fn test_parse_with_usage() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"4"}}],
                "usage":{"prompt_tokens":12,"completion_tokens":1,"total_tokens":13}}"#,
        )
        .unwrap();
        let completion = into_completion(response, &provider(), 42).unwrap();

        assert_eq!(completion.text, "4");
        assert_eq!(completion.latency_ms, 42);
        assert_eq!(completion.usage.unwrap().total_tokens, 13);
        assert_eq!(completion.provider_id, "local");
    }

    #[test]
    fn test_reported_total_is_kept() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"content":"4"}}],
                "usage":{"prompt_tokens":12,"completion_tokens":1,"total_tokens":20}}"#,
        )
        .unwrap();
        let usage = into_completion(response, &provider(), 1).unwrap().usage.unwrap();
        assert_eq!(usage.total_tokens, 20);

        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"content":"4"}}],
                "usage":{"prompt_tokens":4294967295,"completion_tokens":7}}"#,
        )
        .unwrap();
        let usage = into_completion(response, &provider(), 1).unwrap().usage.unwrap();
        assert_eq!(usage.total_tokens, u32::MAX);
    }

    #[test]
    fn test_parse_without_usage() {
        let response: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"ok"}}]}"#).unwrap();
        let completion = into_completion(response, &provider(), 1).unwrap();
        assert!(completion.usage.is_none());
    }

    #[test]
    fn test_empty_choices_is_malformed() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(
            into_completion(response, &provider(), 1),
            Err(InvokerError::MalformedResponse(_))
        ));
    }
}

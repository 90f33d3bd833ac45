//! Provider entities

use serde::{Deserialize, Serialize};
use std::fmt;

/// Capability tag of a provider, selecting its vendor and wire protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    /// Any OpenAI-compatible endpoint (Ollama, LM Studio, vLLM, ...)
    #[serde(rename = "openai_compat")]
    OpenAiCompat,
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "kimi")]
    Kimi,
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "grok")]
    Grok,
    #[serde(rename = "together")]
    Together,
    #[serde(rename = "fireworks")]
    Fireworks,
    #[serde(rename = "openrouter")]
    OpenRouter,
    #[serde(rename = "groq")]
    Groq,
}

/// Request/response protocol spoken by a provider's endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    /// `POST {base_url}/chat/completions`
    OpenAiChat,
    /// `POST {base_url}/v1/messages`
    AnthropicMessages,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAiCompat => "openai_compat",
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Kimi => "kimi",
            ProviderKind::DeepSeek => "deepseek",
            ProviderKind::Grok => "grok",
            ProviderKind::Together => "together",
            ProviderKind::Fireworks => "fireworks",
            ProviderKind::OpenRouter => "openrouter",
            ProviderKind::Groq => "groq",
        }
    }

    pub fn wire_format(&self) -> WireFormat {
        match self {
            ProviderKind::Anthropic => WireFormat::AnthropicMessages,
            _ => WireFormat::OpenAiChat,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_enabled() -> bool {
    true
}

fn default_max_tokens() -> u32 {
    Provider::DEFAULT_MAX_TOKENS
}

fn default_timeout_ms() -> u64 {
    Provider::DEFAULT_TIMEOUT_MS
}

/// A configured completion backend (Entity)
///
/// Immutable for the duration of a run.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    pub id: String,
    /// Display name
    pub name: String,
    pub kind: ProviderKind,
    /// Endpoint root, e.g. `http://localhost:11434/v1`
    pub base_url: String,
    /// Model identifier sent to the endpoint
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Completion token cap used when no per-call override is given
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Provider {
    pub const DEFAULT_MAX_TOKENS: u32 = 4096;
    pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;

    pub fn new(
        id: impl Into<String>,
        kind: ProviderKind,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            kind,
            base_url: base_url.into(),
            model: model.into(),
            api_key: None,
            enabled: true,
            max_tokens: Self::DEFAULT_MAX_TOKENS,
            timeout_ms: Self::DEFAULT_TIMEOUT_MS,
            description: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

// Credentials stay out of logs.
impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("enabled", &self.enabled)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serde_names() {
        let json = serde_json::to_string(&ProviderKind::OpenAiCompat).unwrap();
        assert_eq!(json, r#""openai_compat""#);
        let kind: ProviderKind = serde_json::from_str(r#""openrouter""#).unwrap();
        assert_eq!(kind, ProviderKind::OpenRouter);
        assert_eq!(kind.to_string(), "openrouter");
    }

    #[test]
    fn test_wire_format() {
        assert_eq!(
            ProviderKind::Anthropic.wire_format(),
            WireFormat::AnthropicMessages
        );
        assert_eq!(ProviderKind::Groq.wire_format(), WireFormat::OpenAiChat);
        assert_eq!(ProviderKind::OpenAiCompat.wire_format(), WireFormat::OpenAiChat);
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let provider: Provider = serde_json::from_str(
            r#"{"id":"p1","name":"P1","kind":"openai","base_url":"http://x","model":"m"}"#,
        )
        .unwrap();
        assert!(provider.enabled);
        assert_eq!(provider.max_tokens, Provider::DEFAULT_MAX_TOKENS);
        assert_eq!(provider.timeout_ms, Provider::DEFAULT_TIMEOUT_MS);
        assert!(provider.api_key.is_none());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let provider = Provider::new("p1", ProviderKind::OpenAi, "http://x", "m")
            .with_api_key("sk-secret");
        let debug = format!("{:?}", provider);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("***"));
    }
}

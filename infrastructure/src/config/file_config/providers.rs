//! Provider configuration from TOML (`[[providers]]` tables)

use serde::{Deserialize, Serialize};
use tandem_domain::{Provider, ProviderKind};

fn default_kind() -> ProviderKind {
    ProviderKind::OpenAiCompat
}

fn default_enabled() -> bool {
    true
}

/// One `[[providers]]` entry
///
/// ```toml
/// [[providers]]
/// id = "openai-gpt4"
/// kind = "openai"
/// base_url = "https://api.openai.com/v1"
/// model = "gpt-4o"
/// api_key_env = "OPENAI_API_KEY"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileProviderConfig {
    pub id: String,
    /// Display name (defaults to the id)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default = "default_kind")]
    pub kind: ProviderKind,
    pub base_url: String,
    pub model: String,
    /// Inline API key (prefer `api_key_env`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Environment variable holding the API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FileProviderConfig {
    /// Inline key first, then the named environment variable.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key.clone().or_else(|| {
            self.api_key_env
                .as_deref()
                .and_then(|var| std::env::var(var).ok())
                .filter(|key| !key.is_empty())
        })
    }

    pub fn to_provider(&self) -> Provider {
        let mut provider = Provider::new(&self.id, self.kind, &self.base_url, &self.model)
            .with_enabled(self.enabled);
        if let Some(name) = &self.name {
            provider = provider.with_name(name);
        }
        if let Some(key) = self.resolve_api_key() {
            provider = provider.with_api_key(key);
        }
        if let Some(max_tokens) = self.max_tokens {
            provider = provider.with_max_tokens(max_tokens);
        }
        if let Some(timeout_ms) = self.timeout_ms {
            provider = provider.with_timeout_ms(timeout_ms);
        }
        if let Some(description) = &self.description {
            provider = provider.with_description(description);
        }
        provider
    }
}

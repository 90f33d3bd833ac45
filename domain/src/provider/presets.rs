//! Built-in provider catalogue
//!
//! Local endpoints are enabled out of the box; hosted APIs start disabled
//! until a credential is configured.

use super::entities::{Provider, ProviderKind};

/// The built-in provider presets, used when no providers are configured.
pub fn builtin_providers() -> Vec<Provider> {
    vec![
        Provider::new(
            "ollama-qwen",
            ProviderKind::OpenAiCompat,
            "http://localhost:11434/v1",
            "qwen2.5:32b",
        )
        .with_name("Ollama - Qwen2.5:32b")
        .with_max_tokens(2048)
        .with_timeout_ms(120_000)
        .with_description("Local Ollama instance - Great for privacy"),
        Provider::new(
            "ollama-llama-small",
            ProviderKind::OpenAiCompat,
            "http://localhost:11434/v1",
            "llama3.1:8b",
        )
        .with_name("Ollama - Llama 3.1 8B (Lightweight)")
        .with_enabled(false)
        .with_max_tokens(2048)
        .with_description("Fast lightweight model for quick responses"),
        Provider::new(
            "lmstudio-llama",
            ProviderKind::OpenAiCompat,
            "http://localhost:1234/v1",
            "llama-3.1-70b-instruct",
        )
        .with_name("LM Studio - Llama 3.1 70B")
        .with_max_tokens(4096)
        .with_timeout_ms(180_000)
        .with_description("Local LM Studio server"),
        Provider::new(
            "openai-gpt4",
            ProviderKind::OpenAi,
            "https://api.openai.com/v1",
            "gpt-4-turbo-preview",
        )
        .with_name("OpenAI - GPT-4")
        .with_enabled(false)
        .with_description("OpenAI GPT-4 - Premium quality responses"),
        Provider::new(
            "openai-gpt35",
            ProviderKind::OpenAi,
            "https://api.openai.com/v1",
            "gpt-3.5-turbo",
        )
        .with_name("OpenAI - GPT-3.5 Turbo (Budget)")
        .with_enabled(false)
        .with_description("Budget-friendly OpenAI model"),
        Provider::new(
            "anthropic-claude",
            ProviderKind::Anthropic,
            "https://api.anthropic.com",
            "claude-3-5-sonnet-20241022",
        )
        .with_name("Anthropic - Claude 3.5 Sonnet")
        .with_enabled(false)
        .with_description("Anthropic Claude - Excellent reasoning capabilities"),
        Provider::new(
            "groq-llama",
            ProviderKind::Groq,
            "https://api.groq.com/openai/v1",
            "llama-3.1-70b-versatile",
        )
        .with_name("Groq - Llama 3.1 70B")
        .with_enabled(false)
        .with_max_tokens(8192)
        .with_timeout_ms(30_000)
        .with_description("Ultra-fast inference with Groq hardware"),
        Provider::new(
            "together-llama",
            ProviderKind::Together,
            "https://api.together.xyz/v1",
            "meta-llama/Meta-Llama-3.1-70B-Instruct-Turbo",
        )
        .with_name("Together AI - Llama 3.1 70B")
        .with_enabled(false)
        .with_description("Together AI - Fast and affordable"),
        Provider::new(
            "fireworks-llama",
            ProviderKind::Fireworks,
            "https://api.fireworks.ai/inference/v1",
            "accounts/fireworks/models/llama-v3p1-70b-instruct",
        )
        .with_name("Fireworks AI - Llama 3.1 70B")
        .with_enabled(false)
        .with_description("Fireworks AI - Optimized inference"),
        Provider::new(
            "openrouter-claude",
            ProviderKind::OpenRouter,
            "https://openrouter.ai/api/v1",
            "anthropic/claude-3.5-sonnet",
        )
        .with_name("OpenRouter - Claude 3.5 Sonnet")
        .with_enabled(false)
        .with_description("OpenRouter unified API access"),
        Provider::new(
            "deepseek-coder",
            ProviderKind::DeepSeek,
            "https://api.deepseek.com/v1",
            "deepseek-coder",
        )
        .with_name("DeepSeek - Coder V2")
        .with_enabled(false)
        .with_description("DeepSeek specialized coding model"),
        Provider::new(
            "kimi-moonshot",
            ProviderKind::Kimi,
            "https://api.moonshot.cn/v1",
            "moonshot-v1-8k",
        )
        .with_name("Kimi - Moonshot V1")
        .with_enabled(false)
        .with_max_tokens(8192)
        .with_description("Kimi by Moonshot - Long context support"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_preset_ids_unique() {
        let providers = builtin_providers();
        let ids: HashSet<_> = providers.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), providers.len());
    }

    #[test]
    fn test_only_local_presets_enabled() {
        for provider in builtin_providers().iter().filter(|p| p.enabled) {
            assert!(
                provider.base_url.starts_with("http://localhost"),
                "{} should not be enabled by default",
                provider.id
            );
        }
    }
}

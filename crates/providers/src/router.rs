//! Provider selection: builds the model service named in the configuration.

use crate::openai_compat::OpenAiCompatProvider;
use answersmith_core::error::ProviderError;
use answersmith_core::provider::Provider;
use std::sync::Arc;

/// Build the configured provider.
///
/// Every supported backend speaks the OpenAI chat-completions protocol;
/// `api_url` overrides the well-known base URL.
pub fn build_from_config(
    config: &answersmith_config::AppConfig,
) -> Result<Arc<dyn Provider>, ProviderError> {
    let api_key = config.api_key.clone().unwrap_or_default();
    let base_url = config
        .api_url
        .clone()
        .unwrap_or_else(|| default_base_url(&config.provider));

    let provider = OpenAiCompatProvider::new(&config.provider, &base_url, &api_key)?;
    Ok(Arc::new(provider))
}

/// Get the default base URL for well-known providers.
fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "openai" => "https://api.openai.com/v1".into(),
        "ollama" => "http://localhost:11434/v1".into(),
        "deepseek" => "https://api.deepseek.com/v1".into(),
        "groq" => "https://api.groq.com/openai/v1".into(),
        "together" => "https://api.together.xyz/v1".into(),
        "vllm" => "http://localhost:8000/v1".into(),
        _ => format!("https://{provider_name}.api.example.com/v1"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_base_urls() {
        assert!(default_base_url("openrouter").contains("openrouter.ai"));
        assert!(default_base_url("openai").contains("api.openai.com"));
        assert!(default_base_url("ollama").contains("localhost:11434"));
    }

    #[test]
    fn build_from_default_config() {
        let config = answersmith_config::AppConfig::default();
        let provider = build_from_config(&config).unwrap();
        assert_eq!(provider.name(), "openai");
    }

    #[test]
    fn api_url_override_is_used() {
        let config = answersmith_config::AppConfig {
            provider: "local".into(),
            api_url: Some("http://127.0.0.1:9999/v1".into()),
            ..Default::default()
        };
        assert_eq!(build_from_config(&config).unwrap().name(), "local");
    }
}

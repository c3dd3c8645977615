pub mod ask;
pub mod batch;
pub mod config_cmd;
pub mod doctor;
pub mod serve;

use answersmith_config::AppConfig;
use answersmith_core::error::StoreError;
use answersmith_core::store::AnswerStore;
use answersmith_resolver::{AnswerGenerator, AnswerResolver, ResolutionCache};
use answersmith_store::{HttpAnswerStore, NoopStore};
use std::sync::Arc;
use std::time::Duration;

/// Providers that run without an API key.
const KEYLESS_PROVIDERS: [&str; 1] = ["ollama"];

pub fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    Ok(AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?)
}

/// The external store selected by `[store]`.
pub fn build_store(config: &AppConfig) -> Result<Arc<dyn AnswerStore>, StoreError> {
    if config.store.enabled {
        let timeout = Duration::from_secs(config.store.timeout_secs);
        Ok(Arc::new(HttpAnswerStore::new(&config.store.base_url, timeout)?))
    } else {
        Ok(Arc::new(NoopStore))
    }
}

/// Wire provider, store, cache, and generator from configuration.
pub fn build_resolver(config: &AppConfig) -> Result<AnswerResolver, Box<dyn std::error::Error>> {
    if !config.has_api_key() && !KEYLESS_PROVIDERS.contains(&config.provider.as_str()) {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    ANSWERSMITH_API_KEY = 'sk-...'");
        eprintln!("    OPENAI_API_KEY      = 'sk-...'");
        eprintln!();
        eprintln!("  Or add api_key to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let provider = answersmith_providers::build_from_config(config)?;
    let store = build_store(config)?;

    let generator = AnswerGenerator::from_config(provider, &config.generation);
    Ok(AnswerResolver::new(store, generator)
        .with_cache(Arc::new(ResolutionCache::new(config.cache.capacity)))
        .with_generation_timeout(Duration::from_secs(config.generation.timeout_secs)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_store_is_noop() {
        let mut config = AppConfig::default();
        config.store.enabled = false;
        assert_eq!(build_store(&config).unwrap().name(), "none");

        config.store.enabled = true;
        assert_eq!(build_store(&config).unwrap().name(), "http");
    }

    #[test]
    fn missing_key_is_rejected() {
        let config = AppConfig::default();
        assert!(build_resolver(&config).is_err());
    }

    #[test]
    fn keyless_provider_builds() {
        let config = AppConfig {
            provider: "ollama".into(),
            ..AppConfig::default()
        };
        let resolver = build_resolver(&config).unwrap();
        assert_eq!(resolver.cache().capacity(), config.cache.capacity);
    }
}

//! Configuration loading, validation, and management for Answersmith.
//!
//! Loads configuration from `~/.answersmith/config.toml` with environment
//! variable overrides. Validates all settings at startup. The configuration
//! is read once and lives for the whole process.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.answersmith/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the model service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model service provider name
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Base URL override for the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Answer generation settings
    #[serde(default)]
    pub generation: GenerationConfig,

    /// External answer store settings
    #[serde(default)]
    pub store: StoreConfig,

    /// In-process resolution cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// HTTP server settings
    #[serde(default)]
    pub gateway: GatewayConfig,
}

fn default_provider() -> String {
    "openai".into()
}

/// Upper bound on `generation.retries`.
pub const MAX_RETRIES: u32 = 10;

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("provider", &self.provider)
            .field("api_url", &self.api_url)
            .field("generation", &self.generation)
            .field("store", &self.store)
            .field("cache", &self.cache)
            .field("gateway", &self.gateway)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum output tokens per model call
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Extra attempts after the first one fails
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Upper bound on one generation, all attempts included
    #[serde(default = "default_generation_timeout")]
    pub timeout_secs: u64,

    /// Replaces the built-in persona instruction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

fn default_model() -> String {
    "gpt-4".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    300
}
fn default_retries() -> u32 {
    2
}
fn default_generation_timeout() -> u64 {
    60
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            retries: default_retries(),
            timeout_secs: default_generation_timeout(),
            system_prompt: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_store_url")]
    pub base_url: String,

    #[serde(default = "default_store_timeout")]
    pub timeout_secs: u64,
}

fn default_true() -> bool {
    true
}
fn default_store_url() -> String {
    "http://localhost:3000".into()
}
fn default_store_timeout() -> u64 {
    3
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_store_url(),
            timeout_secs: default_store_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

fn default_capacity() -> usize {
    256
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    3000
}
fn default_host() -> String {
    "127.0.0.1".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.answersmith/config.toml)
    /// and apply environment overrides from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides using `lookup` to read variables.
    ///
    /// Overrides win over file values. Numeric values that fail to parse are
    /// ignored with a warning.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |keys: &[&str]| keys.iter().find_map(|&k| lookup(k));

        if let Some(key) = first(&["ANSWERSMITH_API_KEY", "OPENAI_API_KEY"]) {
            self.api_key = Some(key);
        }
        if let Some(provider) = lookup("ANSWERSMITH_PROVIDER") {
            self.provider = provider;
        }
        if let Some(model) = lookup("ANSWERSMITH_MODEL") {
            self.generation.model = model;
        }
        if let Some(url) = first(&["ANSWERSMITH_STORE_URL", "BACKEND_URL"]) {
            self.store.base_url = url;
        }

        override_parsed(
            &mut self.generation.temperature,
            "ANSWERSMITH_TEMPERATURE",
            lookup("ANSWERSMITH_TEMPERATURE"),
        );
        override_parsed(
            &mut self.generation.max_tokens,
            "ANSWERSMITH_MAX_TOKENS",
            lookup("ANSWERSMITH_MAX_TOKENS"),
        );
        override_parsed(
            &mut self.generation.retries,
            "ANSWERSMITH_RETRIES",
            lookup("ANSWERSMITH_RETRIES"),
        );
        override_parsed(
            &mut self.generation.timeout_secs,
            "ANSWERSMITH_GENERATION_TIMEOUT_SECS",
            lookup("ANSWERSMITH_GENERATION_TIMEOUT_SECS"),
        );
        override_parsed(
            &mut self.store.timeout_secs,
            "ANSWERSMITH_STORE_TIMEOUT_SECS",
            first(&["ANSWERSMITH_STORE_TIMEOUT_SECS", "REQUEST_TIMEOUT_S"]),
        );
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".answersmith")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.generation.temperature) {
            return Err(ConfigError::ValidationError(
                "generation.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.generation.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "generation.max_tokens must be > 0".into(),
            ));
        }

        if self.generation.retries > MAX_RETRIES {
            return Err(ConfigError::ValidationError(format!(
                "generation.retries must be at most {MAX_RETRIES}, got {}",
                self.generation.retries
            )));
        }

        if self.generation.timeout_secs == 0 || self.store.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "timeouts must be at least 1 second".into(),
            ));
        }

        if self.cache.capacity == 0 {
            return Err(ConfigError::ValidationError(
                "cache.capacity must be >= 1".into(),
            ));
        }

        if self.store.enabled && !self.store.base_url.starts_with("http") {
            return Err(ConfigError::ValidationError(format!(
                "store.base_url must be an http(s) URL, got '{}'",
                self.store.base_url
            )));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Render the effective configuration as TOML with secrets redacted.
    pub fn redacted_toml(&self) -> String {
        let mut shown = self.clone();
        if shown.api_key.is_some() {
            shown.api_key = Some("[REDACTED]".into());
        }
        toml::to_string_pretty(&shown).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: default_provider(),
            api_url: None,
            generation: GenerationConfig::default(),
            store: StoreConfig::default(),
            cache: CacheConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }
}

fn override_parsed<T: std::str::FromStr>(target: &mut T, key: &str, raw: Option<String>) {
    let Some(raw) = raw else { return };
    match raw.trim().parse::<T>() {
        Ok(value) => *target = value,
        Err(_) => tracing::warn!(key, value = %raw, "Ignoring unparseable environment override"),
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.generation.retries, 2);
        assert_eq!(config.store.timeout_secs, 3);
        assert_eq!(config.cache.capacity, 256);
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.generation.model, config.generation.model);
        assert_eq!(parsed.store.base_url, config.store.base_url);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let mut config = AppConfig::default();
        config.generation.temperature = 5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_capacity_rejected() {
        let mut config = AppConfig::default();
        config.cache.capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn excessive_retries_rejected() {
        let mut config = AppConfig::default();
        config.generation.retries = MAX_RETRIES;
        assert!(config.validate().is_ok());
        config.generation.retries = MAX_RETRIES + 1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn max_u32_retries_from_env_fails_validation() {
        let mut config = AppConfig::default();
        config.apply_env(env(&[("ANSWERSMITH_RETRIES", "4294967295")]));
        assert_eq!(config.generation.retries, u32::MAX);
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.provider, "openai");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[generation]
model = "gpt-4o-mini"
retries = 4

[store]
base_url = "https://answers.internal"
"#
        )
        .unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.generation.model, "gpt-4o-mini");
        assert_eq!(config.generation.retries, 4);
        assert_eq!(config.generation.max_tokens, 300);
        assert_eq!(config.store.base_url, "https://answers.internal");
        assert_eq!(config.store.timeout_secs, 3);
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "generation = [").unwrap();
        assert!(matches!(
            AppConfig::load_from(file.path()),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn env_overrides_win() {
        let mut config = AppConfig::default();
        config.apply_env(env(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("ANSWERSMITH_MODEL", "gpt-4o"),
            ("ANSWERSMITH_TEMPERATURE", "0.2"),
            ("ANSWERSMITH_RETRIES", "5"),
            ("BACKEND_URL", "http://store:8080"),
            ("REQUEST_TIMEOUT_S", "7"),
        ]));
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.generation.model, "gpt-4o");
        assert!((config.generation.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.generation.retries, 5);
        assert_eq!(config.store.base_url, "http://store:8080");
        assert_eq!(config.store.timeout_secs, 7);
    }

    #[test]
    fn primary_env_name_beats_alias() {
        let mut config = AppConfig::default();
        config.apply_env(env(&[
            ("ANSWERSMITH_STORE_URL", "http://primary"),
            ("BACKEND_URL", "http://alias"),
            ("ANSWERSMITH_API_KEY", "primary-key"),
            ("OPENAI_API_KEY", "alias-key"),
        ]));
        assert_eq!(config.store.base_url, "http://primary");
        assert_eq!(config.api_key.as_deref(), Some("primary-key"));
    }

    #[test]
    fn unparseable_env_value_is_ignored() {
        let mut config = AppConfig::default();
        config.apply_env(env(&[("ANSWERSMITH_MAX_TOKENS", "lots")]));
        assert_eq!(config.generation.max_tokens, 300);
    }

    #[test]
    fn debug_and_toml_redact_api_key() {
        let config = AppConfig {
            api_key: Some("sk-secret".into()),
            ..AppConfig::default()
        };
        assert!(!format!("{config:?}").contains("sk-secret"));
        let rendered = config.redacted_toml();
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }
}

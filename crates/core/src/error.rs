//! Error types for the Answersmith domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// No JSON object could be recovered from raw model output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no JSON object found in model output: {reason}")]
pub struct ExtractionError {
    pub reason: String,
}

impl ExtractionError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Why a single generation attempt failed. Every variant is retryable.
#[derive(Debug, Clone, Error)]
pub enum AttemptError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("response is missing required key `{key}`")]
    Schema { key: String },

    #[error("model service failed: {0}")]
    Provider(#[from] ProviderError),
}

/// Terminal generation failure, surfaced once retries are spent.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    #[error("generation exhausted after {attempts} attempt(s): {last}")]
    Exhausted { attempts: u32, last: AttemptError },

    #[error("generation timed out after {timeout_secs}s")]
    TimedOut { timeout_secs: u64 },

    /// The generating task went away before publishing a result.
    #[error("generation interrupted before completion")]
    Interrupted,
}

impl GenerationError {
    /// The last attempt-level cause, when one exists.
    pub fn last_cause(&self) -> Option<&AttemptError> {
        match self {
            GenerationError::Exhausted { last, .. } => Some(last),
            _ => None,
        }
    }
}

/// Failures talking to the external answer store. Never fatal to a resolution.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store returned status {0}")]
    Status(u16),

    #[error("store returned a malformed body: {0}")]
    Malformed(String),

    #[error("question is required")]
    InvalidQuestion,
}

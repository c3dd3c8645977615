//! HTTP answer store client.
//!
//! Talks to a key-value service exposing:
//! - `GET  /answers?question=<text>` → `{"answer": "<text>" | {answer, confidence, reasoning}}`
//! - `POST /answers` with `{"question", "answer", "confidence", "reasoning"}`
//!
//! Every request is bounded by the configured timeout.

use answersmith_core::answer::Answer;
use answersmith_core::error::StoreError;
use answersmith_core::store::{AnswerStore, StoredAnswer};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Body of a write-back `POST /answers`.
#[derive(Debug, Serialize)]
struct SaveRequest<'a> {
    question: &'a str,
    #[serde(flatten)]
    answer: &'a Answer,
}

/// Answer store backed by a remote HTTP service.
pub struct HttpAnswerStore {
    base_url: String,
    client: reqwest::Client,
}

impl HttpAnswerStore {
    /// Create a client for `base_url` with a per-request `timeout`.
    ///
    /// Fails if the HTTP client cannot be built with that timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Unavailable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/answers", self.base_url)
    }
}

fn transport_error(e: reqwest::Error) -> StoreError {
    if e.is_timeout() {
        StoreError::Unavailable(format!("timed out: {e}"))
    } else {
        StoreError::Unavailable(e.to_string())
    }
}

#[async_trait]
impl AnswerStore for HttpAnswerStore {
    fn name(&self) -> &str {
        "http"
    }

    async fn lookup(&self, question: &str) -> Result<Option<StoredAnswer>, StoreError> {
        let response = self
            .client
            .get(self.endpoint())
            .query(&[("question", question)])
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(StoreError::Status(status.as_u16()));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| StoreError::Malformed(e.to_string()))?;

        let stored = StoredAnswer::from_body(&body);
        if stored.is_none() {
            debug!("Store body carried no usable answer");
        }
        Ok(stored)
    }

    async fn save(&self, question: &str, answer: &Answer) -> Result<(), StoreError> {
        let response = self
            .client
            .post(self.endpoint())
            .json(&SaveRequest { question, answer })
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Status(status.as_u16()));
        }
        Ok(())
    }
}

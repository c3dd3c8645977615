//! AnswerStore trait: the external, persistent question → answer store.
//!
//! Lookup is by exact normalized question text. Stores may hold either the
//! legacy plain-text form or a structured [`Answer`].

use crate::answer::{Answer, normalize_confidence};
use crate::error::StoreError;
use async_trait::async_trait;
use serde_json::Value;

/// What a store returned for a question.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredAnswer {
    /// Legacy `{"answer": "<text>"}` entries.
    Text(String),
    /// `{"answer": {"answer", "confidence", "reasoning"}}` entries.
    Structured(Answer),
}

impl StoredAnswer {
    /// The caller-facing answer text.
    pub fn text(&self) -> &str {
        match self {
            StoredAnswer::Text(text) => text,
            StoredAnswer::Structured(answer) => &answer.text,
        }
    }

    /// Interpret the `answer` field of a store response body.
    ///
    /// Returns `None` for anything that is not a non-blank string or an
    /// object carrying a non-blank string `answer`.
    pub fn from_field(field: &Value) -> Option<Self> {
        match field {
            Value::String(text) if !text.trim().is_empty() => {
                Some(StoredAnswer::Text(text.trim().to_string()))
            }
            Value::Object(inner) => {
                let text = inner.get("answer")?.as_str()?;
                if text.trim().is_empty() {
                    return None;
                }
                let confidence =
                    normalize_confidence(inner.get("confidence").unwrap_or(&Value::Null));
                let reasoning = inner
                    .get("reasoning")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                Some(StoredAnswer::Structured(Answer::new(text, confidence, reasoning)))
            }
            _ => None,
        }
    }

    /// The JSON form served in a store response's `answer` field.
    pub fn to_field(&self) -> Value {
        match self {
            StoredAnswer::Text(text) => Value::String(text.clone()),
            StoredAnswer::Structured(answer) => serde_json::json!({
                "answer": answer.text,
                "confidence": answer.confidence,
                "reasoning": answer.reasoning,
            }),
        }
    }

    /// Interpret a whole response body (`{"answer": ...}`).
    pub fn from_body(body: &Value) -> Option<Self> {
        body.as_object()
            .and_then(|obj| obj.get("answer"))
            .and_then(Self::from_field)
    }
}

/// The external answer store.
///
/// Implementations: HTTP (`GET`/`POST /answers`), in-memory, none (no-op).
/// Callers treat every error as a miss; see the resolver.
#[async_trait]
pub trait AnswerStore: Send + Sync {
    /// The backend name (e.g., "http", "in_memory", "none").
    fn name(&self) -> &str;

    /// Look up a previously stored answer for an exact question.
    async fn lookup(&self, question: &str) -> std::result::Result<Option<StoredAnswer>, StoreError>;

    /// Persist a structured answer for a question.
    async fn save(&self, question: &str, answer: &Answer) -> std::result::Result<(), StoreError>;
}

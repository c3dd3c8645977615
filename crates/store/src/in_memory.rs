//! In-memory answer store: used by tests and by the bundled answer server.
//!
//! Entries are keyed by a stable document id derived from the normalized
//! question, so a `POST` and a later `GET` for the same question line up.

use answersmith_core::answer::Answer;
use answersmith_core::error::StoreError;
use answersmith_core::store::{AnswerStore, StoredAnswer};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Stable document id for a question: hex SHA-256 of the trimmed text.
pub fn question_id(question: &str) -> String {
    hex::encode(Sha256::digest(question.trim().as_bytes()))
}

#[derive(Debug, Clone)]
struct Record {
    question: String,
    answer: StoredAnswer,
}

/// A process-local answer store.
#[derive(Clone, Default)]
pub struct InMemoryAnswerStore {
    records: Arc<RwLock<HashMap<String, Record>>>,
}

impl InMemoryAnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the answer for a question. Returns the document id.
    pub async fn put(&self, question: &str, answer: StoredAnswer) -> Result<String, StoreError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(StoreError::InvalidQuestion);
        }
        let id = question_id(question);
        self.records.write().await.insert(
            id.clone(),
            Record {
                question: question.to_string(),
                answer,
            },
        );
        Ok(id)
    }

    /// Exact-match lookup.
    pub async fn get(&self, question: &str) -> Option<StoredAnswer> {
        let records = self.records.read().await;
        records
            .get(&question_id(question))
            .map(|record| record.answer.clone())
    }

    /// The stored question text for a document id.
    pub async fn question_for(&self, id: &str) -> Option<String> {
        self.records.read().await.get(id).map(|r| r.question.clone())
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl AnswerStore for InMemoryAnswerStore {
    fn name(&self) -> &str { "in_memory" }

    async fn lookup(&self, question: &str) -> Result<Option<StoredAnswer>, StoreError> {
        if question.trim().is_empty() {
            return Err(StoreError::InvalidQuestion);
        }
        Ok(self.get(question).await)
    }

    async fn save(&self, question: &str, answer: &Answer) -> Result<(), StoreError> {
        self.put(question, StoredAnswer::Structured(answer.clone()))
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_id_is_stable_and_trimmed() {
        assert_eq!(question_id("Why us?"), question_id("  Why us?\n"));
        assert_ne!(question_id("Why us?"), question_id("why us?"));
        assert_eq!(question_id("x").len(), 64);
    }

    #[tokio::test]
    async fn save_then_lookup() {
        let store = InMemoryAnswerStore::new();
        let answer = Answer::new("Because of the mission", 0.7, "profile");
        store.save("Why us?", &answer).await.unwrap();

        let hit = store.lookup("Why us?").await.unwrap();
        assert_eq!(hit, Some(StoredAnswer::Structured(answer)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn lookup_is_exact() {
        let store = InMemoryAnswerStore::new();
        store
            .put("Years of experience?", StoredAnswer::Text("Six".into()))
            .await
            .unwrap();
        assert!(store.lookup("Years of Rust experience?").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_replaces_existing() {
        let store = InMemoryAnswerStore::new();
        let id = store.put("Q", StoredAnswer::Text("old".into())).await.unwrap();
        store.put("Q", StoredAnswer::Text("new".into())).await.unwrap();
        assert_eq!(store.len().await, 1);
        assert_eq!(store.get("Q").await.unwrap().text(), "new");
        assert_eq!(store.question_for(&id).await.as_deref(), Some("Q"));
    }

    #[tokio::test]
    async fn blank_question_rejected() {
        let store = InMemoryAnswerStore::new();
        assert!(matches!(
            store.put("   ", StoredAnswer::Text("x".into())).await,
            Err(StoreError::InvalidQuestion)
        ));
        assert!(store.is_empty().await);
    }
}

//! No-op store: disables the external answer store entirely.

use answersmith_core::answer::Answer;
use answersmith_core::error::StoreError;
use answersmith_core::store::{AnswerStore, StoredAnswer};
use async_trait::async_trait;

/// A store that never hits and drops every write.
pub struct NoopStore;

#[async_trait]
impl AnswerStore for NoopStore {
    fn name(&self) -> &str { "none" }

    async fn lookup(&self, _question: &str) -> Result<Option<StoredAnswer>, StoreError> {
        Ok(None)
    }

    async fn save(&self, _question: &str, _answer: &Answer) -> Result<(), StoreError> {
        Ok(())
    }
}

//! The answer resolver: store → cache → generate → write back.
//!
//! Every path ends in a string. Store failures read as misses, generation
//! failures become [`FALLBACK_ANSWER`], and write-back failures are logged
//! and dropped.

use crate::cache::{Flight, ResolutionCache};
use crate::generator::AnswerGenerator;
use answersmith_core::answer::Answer;
use answersmith_core::error::GenerationError;
use answersmith_core::question::Question;
use answersmith_core::store::{AnswerStore, StoredAnswer};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Returned to callers whenever generation fails.
pub const FALLBACK_ANSWER: &str = "I couldn't generate an answer.";

/// Where a resolution's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionSource {
    /// The question was blank.
    Empty,
    /// The external answer store had it.
    Store,
    /// The in-process cache had it, or another caller was already generating it.
    Cache,
    /// Freshly generated by this call.
    Generated,
    /// Generation failed.
    Fallback,
}

/// A resolved question with provenance.
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    pub text: String,
    pub source: ResolutionSource,
    /// The structured answer, when one exists. Plain-text store hits have none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<Answer>,
}

impl Resolution {
    fn fallback() -> Self {
        Self {
            text: FALLBACK_ANSWER.to_string(),
            source: ResolutionSource::Fallback,
            answer: None,
        }
    }
}

pub struct AnswerResolver {
    store: Arc<dyn AnswerStore>,
    cache: Arc<ResolutionCache>,
    generator: Arc<AnswerGenerator>,
    generation_timeout: Option<Duration>,
}

impl AnswerResolver {
    pub fn new(store: Arc<dyn AnswerStore>, generator: AnswerGenerator) -> Self {
        Self {
            store,
            cache: Arc::new(ResolutionCache::default()),
            generator: Arc::new(generator),
            generation_timeout: None,
        }
    }

    /// Share an existing cache (e.g. across resolvers with different stores).
    pub fn with_cache(mut self, cache: Arc<ResolutionCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Bound each generation, retries included.
    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = Some(timeout);
        self
    }

    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    /// Resolve a question to answer text. Never fails.
    pub async fn resolve(&self, question: &str, context: Option<&str>) -> String {
        self.resolve_detailed(question, context).await.text
    }

    /// Resolve a question and report where the answer came from.
    pub async fn resolve_detailed(&self, question: &str, context: Option<&str>) -> Resolution {
        let question = Question::new(question, context);
        if question.is_empty() {
            return Resolution {
                text: String::new(),
                source: ResolutionSource::Empty,
                answer: None,
            };
        }

        if let Some(stored) = self.lookup(&question).await {
            info!(question = %question.text, "Answer store hit");
            let answer = match &stored {
                StoredAnswer::Structured(answer) => Some(answer.clone()),
                StoredAnswer::Text(_) => None,
            };
            return Resolution {
                text: stored.text().to_string(),
                source: ResolutionSource::Store,
                answer,
            };
        }

        let key = question.key();
        let (outcome, flight) = self
            .cache
            .get_or_generate(&key, || self.generate_and_store(&question))
            .await;

        match outcome {
            Ok(answer) => Resolution {
                text: answer.text.clone(),
                source: match flight {
                    Flight::Led => ResolutionSource::Generated,
                    Flight::Cached | Flight::Joined => ResolutionSource::Cache,
                },
                answer: Some(answer),
            },
            Err(e) => {
                warn!(
                    question = %question.text,
                    error = %e,
                    "Generation failed, returning fallback"
                );
                Resolution::fallback()
            }
        }
    }

    async fn lookup(&self, question: &Question) -> Option<StoredAnswer> {
        match self.store.lookup(&question.text).await {
            Ok(found) => found,
            Err(e) => {
                debug!(
                    store = %self.store.name(),
                    error = %e,
                    "Answer store lookup failed, treating as miss"
                );
                None
            }
        }
    }

    async fn generate_and_store(&self, question: &Question) -> Result<Answer, GenerationError> {
        let generation = self
            .generator
            .generate(&question.text, question.context.as_deref());

        let outcome = match self.generation_timeout {
            Some(limit) => tokio::time::timeout(limit, generation)
                .await
                .unwrap_or_else(|_| {
                    Err(GenerationError::TimedOut {
                        timeout_secs: limit.as_secs(),
                    })
                }),
            None => generation.await,
        };

        if let Ok(answer) = &outcome {
            self.write_back(&question.text, answer).await;
        }
        outcome
    }

    async fn write_back(&self, question: &str, answer: &Answer) {
        match self.store.save(question, answer).await {
            Ok(()) => debug!(store = %self.store.name(), "Saved generated answer"),
            Err(e) => warn!(
                store = %self.store.name(),
                question = %question,
                error = %e,
                "Answer write-back failed"
            ),
        }
    }
}

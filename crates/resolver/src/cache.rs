//! Bounded in-process resolution cache with single-flight per key.
//!
//! Successful answers live in an LRU keyed by [`QuestionKey`]. While an
//! answer is being generated, the key maps to a watch channel instead, so
//! concurrent callers for the same key wait on one generation rather than
//! starting their own. Failures are shared with the waiters but never
//! stored.

use answersmith_core::answer::Answer;
use answersmith_core::error::GenerationError;
use answersmith_core::question::QuestionKey;
use lru::LruCache;
use std::collections::HashMap;
use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::debug;

/// Capacity used when none (or zero) is configured.
pub const DEFAULT_CAPACITY: usize = 256;

/// What a generation produces, as seen by every caller sharing it.
pub type Outcome = Result<Answer, GenerationError>;

/// How a caller obtained its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flight {
    /// Served from the LRU.
    Cached,
    /// This caller ran the generation.
    Led,
    /// This caller waited on a generation another caller started.
    Joined,
}

struct CacheState {
    entries: LruCache<QuestionKey, Answer>,
    in_flight: HashMap<QuestionKey, watch::Receiver<Option<Outcome>>>,
}

enum Role {
    Hit(Answer),
    Follow(watch::Receiver<Option<Outcome>>),
    Lead(watch::Sender<Option<Outcome>>),
}

pub struct ResolutionCache {
    state: Mutex<CacheState>,
    capacity: NonZeroUsize,
}

impl ResolutionCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .or(NonZeroUsize::new(DEFAULT_CAPACITY))
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            state: Mutex::new(CacheState {
                entries: LruCache::new(capacity),
                in_flight: HashMap::new(),
            }),
            capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cached answer for `key`, marking it most recently used.
    pub fn get(&self, key: &QuestionKey) -> Option<Answer> {
        self.lock().entries.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Number of keys with a generation currently running.
    pub fn in_flight(&self) -> usize {
        self.lock().in_flight.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Return the cached answer for `key`, join a generation already
    /// running for it, or run `generate` and share its outcome.
    ///
    /// `generate` is called at most once per concurrent burst of callers.
    /// Only `Ok` outcomes are cached. If the leading caller is dropped
    /// before finishing, waiters receive [`GenerationError::Interrupted`].
    pub async fn get_or_generate<F, Fut>(&self, key: &QuestionKey, generate: F) -> (Outcome, Flight)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Outcome>,
    {
        let role = {
            let mut state = self.lock();
            if let Some(answer) = state.entries.get(key) {
                Role::Hit(answer.clone())
            } else if let Some(rx) = state.in_flight.get(key) {
                Role::Follow(rx.clone())
            } else {
                let (tx, rx) = watch::channel(None);
                state.in_flight.insert(key.clone(), rx);
                Role::Lead(tx)
            }
        };

        match role {
            Role::Hit(answer) => {
                debug!(question = %key.text, "Resolution cache hit");
                (Ok(answer), Flight::Cached)
            }
            Role::Follow(mut rx) => {
                debug!(question = %key.text, "Joining in-flight generation");
                let outcome = match rx.wait_for(Option::is_some).await {
                    Ok(published) => (*published)
                        .clone()
                        .unwrap_or(Err(GenerationError::Interrupted)),
                    Err(_) => Err(GenerationError::Interrupted),
                };
                (outcome, Flight::Joined)
            }
            Role::Lead(tx) => {
                let mut guard = FlightGuard {
                    cache: self,
                    key: Some(key.clone()),
                };
                let outcome = generate().await;
                {
                    let mut state = self.lock();
                    state.in_flight.remove(key);
                    if let Ok(answer) = &outcome {
                        state.entries.put(key.clone(), answer.clone());
                    }
                }
                guard.disarm();
                // No receivers left is fine: nobody joined.
                let _ = tx.send(Some(outcome.clone()));
                (outcome, Flight::Led)
            }
        }
    }
}

impl Default for ResolutionCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Clears the in-flight marker if the leading future is dropped mid-generation.
struct FlightGuard<'a> {
    cache: &'a ResolutionCache,
    key: Option<QuestionKey>,
}

impl FlightGuard<'_> {
    fn disarm(&mut self) {
        self.key = None;
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            debug!(question = %key.text, "Leader dropped before publishing; releasing key");
            self.cache.lock().in_flight.remove(&key);
        }
    }
}

//! Retry controller for generation attempts.
//!
//! Runs up to `max_retries + 1` attempts strictly in sequence, with no
//! delay between them. Each attempt reports an explicit [`Attempt`]; the
//! controller returns the first success or
//! [`GenerationError::Exhausted`] carrying the last failure.

use answersmith_core::error::{AttemptError, GenerationError};
use std::future::Future;
use tracing::{debug, error, warn};

/// Outcome of a single unit of work.
#[derive(Debug)]
pub enum Attempt<T> {
    /// The attempt produced a value; stop.
    Done(T),
    /// The attempt failed in a retryable way.
    Retry(AttemptError),
}

impl<T> From<Result<T, AttemptError>> for Attempt<T> {
    fn from(result: Result<T, AttemptError>) -> Self {
        match result {
            Ok(value) => Attempt::Done(value),
            Err(e) => Attempt::Retry(e),
        }
    }
}

/// The most recent failed attempt, kept for the duration of a `run`.
#[derive(Debug, Clone)]
pub struct GenerationAttempt {
    pub index: u32,
    pub error: Option<AttemptError>,
}

#[derive(Debug, Clone, Copy)]
pub struct RetryController {
    max_retries: u32,
}

impl RetryController {
    pub fn new(max_retries: u32) -> Self {
        Self { max_retries }
    }

    /// Total attempts this controller will make.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Run `work` until it succeeds or attempts run out.
    ///
    /// `work` receives the zero-based attempt index.
    pub async fn run<T, F, Fut>(&self, mut work: F) -> Result<T, GenerationError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Attempt<T>>,
    {
        let total = self.max_attempts();
        let mut last: Option<GenerationAttempt> = None;

        for index in 0..total {
            match work(index).await {
                Attempt::Done(value) => {
                    debug!(attempt = index + 1, total, "Generation attempt succeeded");
                    return Ok(value);
                }
                Attempt::Retry(e) => {
                    warn!(attempt = index + 1, total, error = %e, "Generation attempt failed");
                    last = Some(GenerationAttempt {
                        index,
                        error: Some(e),
                    });
                }
            }
        }

        match last {
            Some(GenerationAttempt {
                index,
                error: Some(last),
            }) => {
                let attempts = index + 1;
                error!(attempts, error = %last, "Generation retries exhausted");
                Err(GenerationError::Exhausted { attempts, last })
            }
            _ => Err(GenerationError::Interrupted),
        }
    }
}

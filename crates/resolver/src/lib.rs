//! The answer resolution pipeline.
//!
//! A question flows through four stages, cheapest first:
//!
//! 1. **Store**: exact lookup in the external answer store
//! 2. **Cache**: bounded in-process LRU with single-flight per key
//! 3. **Generate**: prompt the model service, extract and validate the
//!    `{answer, confidence, reasoning}` object, retrying on bad output
//! 4. **Write back**: best-effort save of the new answer to the store
//!
//! Callers only ever see a string: failures degrade to a fixed fallback.

pub mod cache;
pub mod extract;
pub mod generator;
pub mod prompt;
pub mod resolver;
pub mod retry;

#[cfg(test)]
mod test_support;

pub use cache::{Flight, ResolutionCache};
pub use extract::extract_object;
pub use generator::{AnswerGenerator, parse_answer};
pub use resolver::{AnswerResolver, FALLBACK_ANSWER, Resolution, ResolutionSource};
pub use retry::{Attempt, GenerationAttempt, RetryController};

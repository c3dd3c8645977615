//! # Answersmith Core
//!
//! Domain types, traits, and error definitions for the Answersmith answer
//! resolution pipeline. This crate has **no transport dependencies**: it
//! defines the model that the provider, store, and resolver crates build on.
//!
//! ## Layout
//!
//! - [`question`]: the inbound question and its cache identity
//! - [`answer`]: the validated structured answer and confidence normalization
//! - [`provider`]: the model service seam
//! - [`store`]: the external answer store seam
//! - [`error`]: one error enum per bounded context

pub mod answer;
pub mod error;
pub mod message;
pub mod provider;
pub mod question;
pub mod store;

// Re-export key types at crate root for ergonomics
pub use answer::{Answer, normalize_confidence};
pub use message::{Message, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse};
pub use question::{Question, QuestionKey};
pub use store::{AnswerStore, StoredAnswer};

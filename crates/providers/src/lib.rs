//! Model service implementations for Answersmith.
//!
//! All providers implement the `answersmith_core::Provider` trait.
//! [`router::build_from_config`] builds the configured provider at startup.

pub mod openai_compat;
pub mod router;

pub use openai_compat::OpenAiCompatProvider;
pub use router::build_from_config;

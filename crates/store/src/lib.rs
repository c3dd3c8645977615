//! Answer store backends for Answersmith.

pub mod http;
pub mod in_memory;
pub mod noop;

pub use http::HttpAnswerStore;
pub use in_memory::{InMemoryAnswerStore, question_id};
pub use noop::NoopStore;

//! Inbound questions and their cache identity.

use serde::{Deserialize, Serialize};

/// A question as received from a caller, already normalized.
///
/// `text` is trimmed; a blank or missing context collapses to `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Question {
    pub fn new(text: &str, context: Option<&str>) -> Self {
        let context = context
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(String::from);
        Self {
            text: text.trim().to_string(),
            context,
        }
    }

    /// Blank questions never reach the store or the model service.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The exact identity used by the in-process resolution cache.
    pub fn key(&self) -> QuestionKey {
        QuestionKey {
            text: self.text.clone(),
            context: self.context.clone(),
        }
    }
}

/// Cache identity: the normalized (question, context) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuestionKey {
    pub text: String,
    pub context: Option<String>,
}

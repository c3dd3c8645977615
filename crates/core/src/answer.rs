//! The validated, confidence-scored answer.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Longest answer text kept before truncation, in characters.
pub const MAX_ANSWER_CHARS: usize = 1200;

/// Appended to an answer that was cut at [`MAX_ANSWER_CHARS`].
pub const ELLIPSIS: char = '…';

/// A structured answer.
///
/// Serializes as `{"answer", "confidence", "reasoning"}`, the shape the
/// model is asked to produce and the store persists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    #[serde(rename = "answer")]
    pub text: String,
    pub confidence: f64,
    pub reasoning: String,
}

impl Answer {
    /// Build a normalized answer: trimmed text capped at
    /// [`MAX_ANSWER_CHARS`], trimmed reasoning, confidence in `[0.0, 1.0]`.
    pub fn new(text: &str, confidence: f64, reasoning: &str) -> Self {
        Self {
            text: truncate_answer(text.trim()),
            confidence: clamp_confidence(confidence),
            reasoning: reasoning.trim().to_string(),
        }
    }

    /// The answer returned for a blank question.
    pub fn empty_question() -> Self {
        Self {
            text: String::new(),
            confidence: 0.0,
            reasoning: "Empty question".into(),
        }
    }
}

fn truncate_answer(text: &str) -> String {
    match text.char_indices().nth(MAX_ANSWER_CHARS) {
        Some((cut, _)) => {
            let mut out = String::with_capacity(cut + ELLIPSIS.len_utf8());
            out.push_str(&text[..cut]);
            out.push(ELLIPSIS);
            out
        }
        None => text.to_string(),
    }
}

fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Coerce an arbitrary JSON value into a confidence score in `[0.0, 1.0]`.
///
/// Numbers and numeric strings are clamped; anything else (including a
/// missing field, passed as `Value::Null`) scores `0.0`. Never fails.
pub fn normalize_confidence(value: &Value) -> f64 {
    let raw = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    raw.map(clamp_confidence).unwrap_or(0.0)
}

//! Recover a JSON object from free-text model output.
//!
//! Models asked for "only JSON" still wrap it in code fences or prose.
//! Three strategies run in order and the first that yields an object wins:
//!
//! 1. the whole text parsed as JSON
//! 2. the text with a surrounding ```` ``` ```` / ```` ```json ```` fence removed
//! 3. the span from the first `{` to the last `}`, then the first balanced
//!    `{...}` if that span does not parse

use answersmith_core::error::ExtractionError;
use serde_json::{Map, Value};

/// Extract the first JSON object from raw model text.
pub fn extract_object(raw: &str) -> Result<Map<String, Value>, ExtractionError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(ExtractionError::new("empty response"));
    }

    if let Some(obj) = parse_object(text) {
        return Ok(obj);
    }

    if let Some(obj) = strip_fence(text).and_then(parse_object) {
        return Ok(obj);
    }

    if let Some(obj) = greedy_span(text).and_then(parse_object) {
        return Ok(obj);
    }

    if let Some(obj) = balanced_span(text).and_then(parse_object) {
        return Ok(obj);
    }

    if text.contains('{') {
        Err(ExtractionError::new("braces found but no parseable object"))
    } else {
        Err(ExtractionError::new("no `{...}` in response"))
    }
}

fn parse_object(candidate: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(candidate.trim()) {
        Ok(Value::Object(obj)) => Some(obj),
        _ => None,
    }
}

/// Remove a leading ```` ``` ```` (optionally tagged `json`) and a trailing fence.
fn strip_fence(text: &str) -> Option<&str> {
    let body = text.strip_prefix("```")?;
    let body = match body.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &body[4..],
        _ => body,
    };
    let body = body.trim_end();
    Some(body.strip_suffix("```").unwrap_or(body))
}

/// First `{` through last `}`.
fn greedy_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// First `{` through its matching `}`, skipping braces inside strings.
fn balanced_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const OBJECT: &str =
        r#"{"answer":"I value the mission.","confidence":0.8,"reasoning":"matches stated goals"}"#;

    fn answer_of(obj: &Map<String, Value>) -> &str {
        obj["answer"].as_str().unwrap()
    }

    #[test]
    fn bare_object() {
        let obj = extract_object(OBJECT).unwrap();
        assert_eq!(answer_of(&obj), "I value the mission.");
    }

    #[test]
    fn json_fenced_block() {
        let raw = format!("```json\n{OBJECT}\n```");
        assert_eq!(answer_of(&extract_object(&raw).unwrap()), "I value the mission.");
    }

    #[test]
    fn untagged_fence() {
        let raw = format!("```\n{OBJECT}\n```");
        assert!(extract_object(&raw).is_ok());
    }

    #[test]
    fn uppercase_tag_fence() {
        let raw = format!("```JSON\n{OBJECT}```");
        assert!(extract_object(&raw).is_ok());
    }

    #[test]
    fn object_wrapped_in_prose() {
        let raw = format!("Sure! Here is my answer:\n{OBJECT}\nLet me know if you need more.");
        assert_eq!(answer_of(&extract_object(&raw).unwrap()), "I value the mission.");
    }

    #[test]
    fn fenced_block_inside_prose() {
        let raw = format!("Here you go:\n```json\n{OBJECT}\n```\nGood luck!");
        assert!(extract_object(&raw).is_ok());
    }

    #[test]
    fn prose_with_trailing_brace_falls_back_to_balanced() {
        let raw = format!("Result: {OBJECT} (note: use {{name}} placeholders)");
        assert_eq!(answer_of(&extract_object(&raw).unwrap()), "I value the mission.");
    }

    #[test]
    fn braces_inside_strings_do_not_end_the_object() {
        let raw = r#"Answer: {"answer":"use } carefully","confidence":1,"reasoning":"x"} trailing }"#;
        assert_eq!(answer_of(&extract_object(raw).unwrap()), "use } carefully");
    }

    #[test]
    fn nested_objects_survive() {
        let raw = r#"text {"answer":"a","meta":{"k":1},"confidence":0.1,"reasoning":"r"} text"#;
        let obj = extract_object(raw).unwrap();
        assert_eq!(obj["meta"]["k"], 1);
    }

    #[test]
    fn no_braces_fails() {
        let err = extract_object("I would love to work here because of the culture.").unwrap_err();
        assert!(err.reason.contains("no `{...}`"));
    }

    #[test]
    fn empty_text_fails() {
        assert!(extract_object("   \n").is_err());
    }

    #[test]
    fn non_object_json_fails() {
        assert!(extract_object("[1, 2, 3]").is_err());
        assert!(extract_object("\"just a string\"").is_err());
    }

    #[test]
    fn broken_json_fails() {
        assert!(extract_object(r#"{"answer": "unterminated"#).is_err());
    }
}

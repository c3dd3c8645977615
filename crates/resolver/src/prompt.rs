//! Prompt construction for answer generation.

/// Persona sent as the system message on every attempt.
pub const DEFAULT_PERSONA: &str = "You are a professional job application assistant. \
Write specific, first-person answers grounded in the context you are given; avoid generic filler. \
If a question is ambiguous or you lack the facts to answer it, ask for clarification instead of guessing.";

/// Marker used in the prompt when no context was supplied.
pub const NO_CONTEXT: &str = "None";

/// Build the user turn for a question and optional context.
pub fn build_user_prompt(question: &str, context: Option<&str>) -> String {
    let context = context.unwrap_or(NO_CONTEXT);
    format!(
        "Answer this job application question.\n\n\
         Question: {question}\n\
         Context: {context}\n\n\
         Respond ONLY with a JSON object of the form:\n\
         {{\"answer\": \"<your answer>\", \"confidence\": <number between 0 and 1>, \"reasoning\": \"<one sentence>\"}}\n\
         Do not add any text outside the JSON object."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_contains_question_and_context() {
        let prompt = build_user_prompt("Why this role?", Some("Backend engineer at a fintech"));
        assert!(prompt.contains("Question: Why this role?"));
        assert!(prompt.contains("Context: Backend engineer at a fintech"));
        assert!(prompt.contains("\"confidence\""));
    }

    #[test]
    fn missing_context_uses_marker() {
        let prompt = build_user_prompt("Why this role?", None);
        assert!(prompt.contains("Context: None"));
    }
}

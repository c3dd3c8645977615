//! Answer generation: prompt the model service and coerce its free-text
//! reply into a validated [`Answer`].

use crate::extract::extract_object;
use crate::prompt::{DEFAULT_PERSONA, build_user_prompt};
use crate::retry::{Attempt, RetryController};
use answersmith_config::GenerationConfig;
use answersmith_core::answer::{Answer, normalize_confidence};
use answersmith_core::error::{AttemptError, GenerationError};
use answersmith_core::message::Message;
use answersmith_core::provider::{Provider, ProviderRequest};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info};

const REQUIRED_KEYS: [&str; 3] = ["answer", "confidence", "reasoning"];

/// Turns a question into a structured answer via an injected model service.
pub struct AnswerGenerator {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    retries: u32,
    persona: String,
}

impl AnswerGenerator {
    /// Create a generator with default parameters (temperature 0.7, 2 retries).
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.7,
            max_tokens: None,
            retries: 2,
            persona: DEFAULT_PERSONA.to_string(),
        }
    }

    /// Create a generator from the `[generation]` configuration section.
    pub fn from_config(provider: Arc<dyn Provider>, config: &GenerationConfig) -> Self {
        let mut generator = Self::new(provider, &config.model)
            .with_temperature(config.temperature)
            .with_max_tokens(config.max_tokens)
            .with_retries(config.retries);
        if let Some(persona) = &config.system_prompt {
            generator = generator.with_persona(persona);
        }
        generator
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Set how many extra attempts follow a failed one.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Replace the system persona.
    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = persona.into();
        self
    }

    /// Generate with the configured retry count.
    pub async fn generate(
        &self,
        question: &str,
        context: Option<&str>,
    ) -> Result<Answer, GenerationError> {
        self.generate_with_retries(question, context, self.retries)
            .await
    }

    /// Generate, making at most `retries + 1` model calls.
    ///
    /// A blank question returns [`Answer::empty_question`] without calling
    /// the model service.
    pub async fn generate_with_retries(
        &self,
        question: &str,
        context: Option<&str>,
        retries: u32,
    ) -> Result<Answer, GenerationError> {
        let question = question.trim();
        if question.is_empty() {
            return Ok(Answer::empty_question());
        }

        let user_prompt = build_user_prompt(question, context);
        let answer = RetryController::new(retries)
            .run(|index| self.attempt(index, &user_prompt))
            .await?;

        info!(
            provider = %self.provider.name(),
            confidence = answer.confidence,
            answer_len = answer.text.chars().count(),
            "Generated answer"
        );
        Ok(answer)
    }

    async fn attempt(&self, index: u32, user_prompt: &str) -> Attempt<Answer> {
        let request = ProviderRequest {
            model: self.model.clone(),
            messages: vec![Message::system(&self.persona), Message::user(user_prompt)],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!(attempt = index + 1, model = %self.model, "Requesting answer from model service");

        match self.provider.complete(request).await {
            Ok(response) => parse_answer(&response.message.content).into(),
            Err(e) => Attempt::Retry(AttemptError::Provider(e)),
        }
    }
}

/// Extract, validate, and normalize a model reply.
///
/// All of `answer`, `confidence`, and `reasoning` must be present; `answer`
/// and `reasoning` must also be non-null and `answer` non-blank. A
/// malformed `confidence` scores `0.0` rather than failing.
pub fn parse_answer(raw: &str) -> Result<Answer, AttemptError> {
    let obj = extract_object(raw)?;

    if let Some(missing) = REQUIRED_KEYS.iter().find(|k| !obj.contains_key(**k)) {
        return Err(AttemptError::Schema {
            key: (*missing).to_string(),
        });
    }

    let text = required_text(&obj, "answer")?;
    if text.trim().is_empty() {
        return Err(AttemptError::Schema {
            key: "answer".into(),
        });
    }
    let reasoning = required_text(&obj, "reasoning")?;
    let confidence = normalize_confidence(&obj["confidence"]);

    Ok(Answer::new(&text, confidence, &reasoning))
}

fn required_text(obj: &Map<String, Value>, key: &str) -> Result<String, AttemptError> {
    match obj.get(key) {
        None | Some(Value::Null) => Err(AttemptError::Schema { key: key.into() }),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Ok(other.to_string()),
    }
}

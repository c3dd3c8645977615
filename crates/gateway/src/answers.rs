//! `GET /answers` and `POST /answers`: the answer store API.

use crate::{ErrorResponse, SharedState};
use answersmith_core::answer::{Answer, normalize_confidence};
use answersmith_core::store::StoredAnswer;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
pub struct AnswerQuery {
    pub question: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerBody {
    pub answer: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SavedAnswer {
    pub id: String,
    pub question: String,
    pub answer: Value,
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

pub async fn get_answer_handler(
    State(state): State<SharedState>,
    Query(query): Query<AnswerQuery>,
) -> Result<Json<AnswerBody>, HandlerError> {
    let question = query
        .question
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or((
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("Missing question query param"),
        ))?;

    match state.store.get(question).await {
        Some(stored) => {
            debug!(question = %question, "Answer found");
            Ok(Json(AnswerBody {
                answer: stored.to_field(),
            }))
        }
        None => Err((StatusCode::NOT_FOUND, ErrorResponse::new("Answer not found"))),
    }
}

/// Accepts `{question, answer}` where `answer` is a string or a
/// `{answer, confidence, reasoning}` object. A string answer sent with
/// top-level `confidence` or `reasoning` is stored in structured form.
///
/// Objects without a non-blank `answer` key are rejected, so everything
/// stored here can be served back to a resolver.
pub async fn save_answer_handler(
    State(state): State<SharedState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<SavedAnswer>), HandlerError> {
    let question = body
        .get("question")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or((
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("Invalid or missing question"),
        ))?;

    let stored = parse_answer_field(&body).ok_or((
        StatusCode::BAD_REQUEST,
        ErrorResponse::new("Invalid or missing answer"),
    ))?;

    let id = state.store.put(question, stored.clone()).await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(e.to_string()),
        )
    })?;

    info!(id = %id, question = %question, "Answer saved");
    Ok((
        StatusCode::CREATED,
        Json(SavedAnswer {
            id,
            question: question.to_string(),
            answer: stored.to_field(),
        }),
    ))
}

fn parse_answer_field(body: &Value) -> Option<StoredAnswer> {
    let field = body.get("answer")?;
    let has_metadata = body.get("confidence").is_some() || body.get("reasoning").is_some();

    match field {
        Value::String(text) if has_metadata && !text.trim().is_empty() => {
            let confidence =
                normalize_confidence(body.get("confidence").unwrap_or(&Value::Null));
            let reasoning = body
                .get("reasoning")
                .and_then(Value::as_str)
                .unwrap_or_default();
            Some(StoredAnswer::Structured(Answer::new(text, confidence, reasoning)))
        }
        other => StoredAnswer::from_field(other),
    }
}

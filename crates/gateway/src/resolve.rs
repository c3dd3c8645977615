//! `POST /v1/resolve`: run the resolution pipeline for one question.

use crate::{ErrorResponse, SharedState};
use answersmith_resolver::ResolutionSource;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    pub question: String,
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub answer: String,
    pub source: ResolutionSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

/// Always answers `200` for a well-formed body; generation failures show up
/// as `source: "fallback"`.
pub async fn resolve_handler(
    State(state): State<SharedState>,
    Json(req): Json<ResolveRequest>,
) -> Result<Json<ResolveResponse>, (StatusCode, Json<ErrorResponse>)> {
    if req.question.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("Invalid or missing question"),
        ));
    }

    let resolution = state
        .resolver
        .resolve_detailed(&req.question, req.context.as_deref())
        .await;

    info!(source = ?resolution.source, "v1/resolve request");

    let (confidence, reasoning) = match resolution.answer {
        Some(answer) => (Some(answer.confidence), Some(answer.reasoning)),
        None => (None, None),
    };
    Ok(Json(ResolveResponse {
        answer: resolution.text,
        source: resolution.source,
        confidence,
        reasoning,
    }))
}

#[cfg(test)]
mod tests {
    use crate::build_router;
    use crate::test_support::state_with_reply;
    use answersmith_core::store::StoredAnswer;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use std::sync::atomic::Ordering;
    use tower::ServiceExt;

    const REPLY: &str =
        r#"Here you go: {"answer":"I value the mission.","confidence":0.8,"reasoning":"matches stated goals"}"#;

    fn resolve(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/v1/resolve")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn generates_then_serves_from_store() {
        let (state, provider) = state_with_reply(REPLY);

        let response = build_router(state.clone())
            .oneshot(resolve(json!({"question": "Why do you want this role?"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["answer"], "I value the mission.");
        assert_eq!(body["source"], "generated");
        assert_eq!(body["confidence"], 0.8);

        // Write-back landed in the served store, so the next call is a store hit.
        assert!(state.store.get("Why do you want this role?").await.is_some());
        let response = build_router(state)
            .oneshot(resolve(json!({"question": "Why do you want this role?"})))
            .await
            .unwrap();
        assert_eq!(json_body(response).await["source"], "store");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stored_answer_is_used_without_generation() {
        let (state, provider) = state_with_reply(REPLY);
        state
            .store
            .put("Salary expectations?", StoredAnswer::Text("Negotiable".into()))
            .await
            .unwrap();

        let response = build_router(state)
            .oneshot(resolve(json!({"question": "Salary expectations?", "context": "Berlin"})))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["answer"], "Negotiable");
        assert!(body.get("confidence").is_none());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unusable_model_output_reports_fallback() {
        let (state, _) = state_with_reply("I'm not able to answer in JSON.");
        let response = build_router(state.clone())
            .oneshot(resolve(json!({"question": "Why?"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["answer"], "I couldn't generate an answer.");
        assert_eq!(body["source"], "fallback");
        assert!(state.store.is_empty().await);
    }

    #[tokio::test]
    async fn blank_question_is_400() {
        let (state, provider) = state_with_reply(REPLY);
        let response = build_router(state)
            .oneshot(resolve(json!({"question": "  "})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }
}

//! HTTP server for Answersmith.
//!
//! Serves two things from one process:
//! - the answer store API (`GET`/`POST /answers`) that resolvers elsewhere
//!   point their `store.base_url` at, backed by an in-memory store
//! - `POST /v1/resolve`, which runs the full resolution pipeline against
//!   that same store
//!
//! Built on Axum.

pub mod answers;
pub mod resolve;

use answersmith_config::AppConfig;
use answersmith_resolver::{AnswerGenerator, AnswerResolver, ResolutionCache};
use answersmith_store::InMemoryAnswerStore;
use axum::extract::DefaultBodyLimit;
use axum::{Router, response::Json, routing::get, routing::post};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tracing::info;

/// Shared application state for the server.
pub struct GatewayState {
    pub store: InMemoryAnswerStore,
    pub resolver: Arc<AnswerResolver>,
}

pub type SharedState = Arc<GatewayState>;

impl GatewayState {
    /// `resolver` should be built over a clone of `store` so resolutions
    /// read and write the same answers the `/answers` endpoints serve.
    pub fn new(store: InMemoryAnswerStore, resolver: AnswerResolver) -> Self {
        Self {
            store,
            resolver: Arc::new(resolver),
        }
    }
}

/// Build the Axum router with all routes.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/answers",
            get(answers::get_answer_handler).post(answers::save_answer_handler),
        )
        .route("/v1/resolve", post(resolve::resolve_handler))
        .with_state(state)
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(CorsLayer::permissive())
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Start the HTTP server and run until it fails.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let provider = answersmith_providers::build_from_config(&config)?;

    let generator = AnswerGenerator::from_config(provider, &config.generation);
    let store = InMemoryAnswerStore::new();
    let resolver = AnswerResolver::new(Arc::new(store.clone()), generator)
        .with_cache(Arc::new(ResolutionCache::new(config.cache.capacity)))
        .with_generation_timeout(Duration::from_secs(config.generation.timeout_secs));

    let state = Arc::new(GatewayState::new(store, resolver));
    let app = build_router(state);

    info!(addr = %addr, provider = %config.provider, "Answer server starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Body of every non-2xx JSON response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub(crate) fn new(error: impl Into<String>) -> Json<Self> {
        Json(Self {
            error: error.into(),
        })
    }
}

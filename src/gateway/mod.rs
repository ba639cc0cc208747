//! HTTP gateway (Axum) for the `serve` subcommand.

pub mod error;
pub mod handler;
pub mod state;

#[cfg(test)]
mod tests;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::{ErrorResponse, GatewayError};
pub use handler::{QueryRequest, process_query_handler};
pub use state::AppState;

use crate::embedding::TextEmbedder;
use crate::scrape::PageScraper;
use crate::search::WebSearch;

pub fn create_router<S, P, E>(state: AppState<S, P, E>) -> Router
where
    S: WebSearch + 'static,
    P: PageScraper + 'static,
    E: TextEmbedder + 'static,
{
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler::<S, P, E>))
        .route("/process-query", post(process_query_handler::<S, P, E>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ReadyResponse {
    pub status: String,
    pub index: String,
    pub indexed_chunks: usize,
    pub embedder_mode: String,
    pub encoder_mode: String,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
        }),
    )
        .into_response()
}

/// Ready once the index directory exists.
#[tracing::instrument(skip(state))]
pub async fn ready_handler<S, P, E>(State(state): State<AppState<S, P, E>>) -> Response
where
    S: WebSearch + 'static,
    P: PageScraper + 'static,
    E: TextEmbedder + 'static,
{
    let index_ready = state.index_path.is_dir();
    let status_code = if index_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(ReadyResponse {
            status: if index_ready { "ok" } else { "pending" }.to_string(),
            index: if index_ready { "ready" } else { "missing" }.to_string(),
            indexed_chunks: state.checker.pipeline().index().len(),
            embedder_mode: state.embedder_mode.to_string(),
            encoder_mode: state.encoder_mode.to_string(),
        }),
    )
        .into_response()
}

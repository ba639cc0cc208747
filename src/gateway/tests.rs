use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use super::*;
use crate::embedding::{MockEmbedder, SentenceEncoder};
use crate::index::EmbeddingIndex;
use crate::pipeline::{
    FactCheckPipeline, FactCheckResult, FactChecker, NO_RESULTS_MESSAGE, PipelineConfig,
};
use crate::report::{MockReportGenerator, ReportGenerator};
use crate::scrape::MockPageScraper;
use crate::search::MockSearchBackend;

fn router(dir: &TempDir, generator: Arc<dyn ReportGenerator>) -> Router {
    let index = Arc::new(
        EmbeddingIndex::open(dir.path(), "test", MockEmbedder::with_dimension(16)).unwrap(),
    );
    let pipeline = FactCheckPipeline::new(
        MockSearchBackend::empty(),
        MockPageScraper::new(),
        index,
        Arc::new(SentenceEncoder::stub()),
        PipelineConfig::default(),
    )
    .unwrap();
    let checker = Arc::new(FactChecker::new(pipeline, generator));

    create_router(AppState::new(checker, dir.path().to_path_buf()).with_modes(true, true))
}

fn query_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/process-query")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_healthz() {
    let dir = TempDir::new().unwrap();
    let app = router(&dir, Arc::new(MockReportGenerator::with_verdict("True")));

    let response = app
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let health: HealthResponse = body_json(response).await;
    assert_eq!(health.status, "ok");
}

#[tokio::test]
async fn test_ready_reports_modes() {
    let dir = TempDir::new().unwrap();
    let app = router(&dir, Arc::new(MockReportGenerator::with_verdict("True")));

    let response = app
        .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let ready: ReadyResponse = body_json(response).await;
    assert_eq!(ready.index, "ready");
    assert_eq!(ready.indexed_chunks, 0);
    assert_eq!(ready.embedder_mode, "stub");
    assert_eq!(ready.encoder_mode, "stub");
}

#[tokio::test]
async fn test_process_query_returns_triple() {
    let dir = TempDir::new().unwrap();
    let app = router(&dir, Arc::new(MockReportGenerator::with_verdict("False")));

    let response = app
        .oneshot(query_request(r#"{"query": "The sky is green"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let result: serde_json::Value = body_json(response).await;
    assert_eq!(result["question"], "The sky is green");
    assert_eq!(result["context"], NO_RESULTS_MESSAGE);
    assert!(result["output"].as_str().unwrap().contains("**Verdict:**"));
}

#[tokio::test]
async fn test_empty_query_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let generator = Arc::new(MockReportGenerator::with_verdict("True"));
    let app = router(&dir, generator.clone());

    let response = app.oneshot(query_request(r#"{"query": "   "}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = body_json(response).await;
    assert_eq!(error.code, 400);
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn test_generator_failure_is_bad_gateway() {
    let dir = TempDir::new().unwrap();
    let app = router(&dir, Arc::new(MockReportGenerator::failing()));

    let response = app
        .oneshot(query_request(r#"{"query": "The sky is green"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let error: ErrorResponse = body_json(response).await;
    assert!(error.error.contains("report"));
}

#[test]
fn test_result_serializes_expected_fields() {
    let result = FactCheckResult {
        question: "q".to_string(),
        context: "c".to_string(),
        output: "o".to_string(),
    };
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value, serde_json::json!({"question": "q", "context": "c", "output": "o"}));
}

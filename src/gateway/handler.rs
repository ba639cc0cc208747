use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::{info, instrument};

use super::error::GatewayError;
use super::state::AppState;
use crate::embedding::TextEmbedder;
use crate::pipeline::FactCheckResult;
use crate::scrape::PageScraper;
use crate::search::WebSearch;

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

/// `POST /process-query`: runs a full check and returns `{question, context, output}`.
#[instrument(skip(state, request))]
pub async fn process_query_handler<S, P, E>(
    State(state): State<AppState<S, P, E>>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<FactCheckResult>, GatewayError>
where
    S: WebSearch + 'static,
    P: PageScraper + 'static,
    E: TextEmbedder + 'static,
{
    let claim = request.query.trim();
    if claim.is_empty() {
        return Err(GatewayError::InvalidRequest(
            "query must not be empty".to_string(),
        ));
    }

    let result = state.checker.check(claim).await?;
    info!(claim, output_len = result.output.len(), "Query processed");
    Ok(Json(result))
}

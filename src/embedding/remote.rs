use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info};

use super::{EmbeddingError, TextEmbedder};
use crate::constants::DEFAULT_EMBEDDING_DIM;

/// Inputs per request; the OpenAI endpoint caps a single call at 2048.
const MAX_INPUTS_PER_REQUEST: usize = 256;

/// Client for an OpenAI-compatible `/embeddings` endpoint.
#[derive(Clone)]
pub struct RemoteEmbedder {
    client: reqwest::Client,
    api_base: String,
    model: String,
    api_key: String,
    timeout: Duration,
    dim: usize,
}

impl std::fmt::Debug for RemoteEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteEmbedder")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl RemoteEmbedder {
    pub fn new(
        api_base: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, EmbeddingError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EmbeddingError::InvalidConfig {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        let api_base = api_base.into().trim_end_matches('/').to_string();
        let model = model.into();
        info!(api_base = %api_base, model = %model, "Remote embedder configured");

        Ok(Self {
            client,
            api_base,
            model,
            api_key: api_key.into(),
            timeout,
            dim: DEFAULT_EMBEDDING_DIM,
        })
    }

    /// Overrides the expected output width for models other than `text-embedding-3-small`.
    pub fn with_dimension(mut self, dim: usize) -> Self {
        self.dim = dim;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn request(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let url = format!("{}/embeddings", self.api_base);
        let body = serde_json::json!({
            "model": self.model,
            "input": texts,
        });

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::BadStatus {
                status: status.as_u16(),
                body: body.chars().take(512).collect(),
            });
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        let vectors = parse_embedding_response(json)?;
        if vectors.len() != texts.len() {
            return Err(EmbeddingError::InvalidResponse {
                reason: format!("expected {} embeddings, got {}", texts.len(), vectors.len()),
            });
        }
        Ok(vectors)
    }

    fn map_reqwest_error(&self, err: reqwest::Error) -> EmbeddingError {
        if err.is_timeout() {
            EmbeddingError::Timeout {
                secs: self.timeout.as_secs(),
            }
        } else {
            EmbeddingError::RequestFailed {
                reason: err.to_string(),
            }
        }
    }
}

impl TextEmbedder for RemoteEmbedder {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(MAX_INPUTS_PER_REQUEST) {
            vectors.extend(self.request(batch).await?);
        }

        debug!(count = vectors.len(), model = %self.model, "Embedded documents");
        Ok(vectors)
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vectors = self.request(&[text.to_string()]).await?;
        vectors.pop().ok_or_else(|| EmbeddingError::InvalidResponse {
            reason: "empty embedding response".to_string(),
        })
    }

    fn dimension(&self) -> usize {
        self.dim
    }
}

/// Reads `data[*].embedding`, ordered by each item's `index`.
pub fn parse_embedding_response(json: Value) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    let data = json
        .get("data")
        .and_then(|v| v.as_array())
        .ok_or_else(|| EmbeddingError::InvalidResponse {
            reason: "missing data array".to_string(),
        })?;

    let mut indexed: Vec<(usize, Vec<f32>)> = Vec::with_capacity(data.len());
    for (fallback_index, item) in data.iter().enumerate() {
        let index = item
            .get("index")
            .and_then(|v| v.as_u64())
            .map(|v| v as usize)
            .unwrap_or(fallback_index);
        let embedding = item
            .get("embedding")
            .and_then(|v| v.as_array())
            .ok_or_else(|| EmbeddingError::InvalidResponse {
                reason: "item missing embedding array".to_string(),
            })?;

        let vector = embedding
            .iter()
            .map(|value| {
                value
                    .as_f64()
                    .map(|n| n as f32)
                    .ok_or_else(|| EmbeddingError::InvalidResponse {
                        reason: "embedding value must be numeric".to_string(),
                    })
            })
            .collect::<Result<Vec<f32>, _>>()?;
        indexed.push((index, vector));
    }

    indexed.sort_by_key(|(index, _)| *index);

    Ok(indexed.into_iter().map(|(_, vector)| vector).collect())
}

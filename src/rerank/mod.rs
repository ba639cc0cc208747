//! Sliding-window reranking against the claim.
//!
//! Each surviving chunk is cut into word windows; every window and the query are encoded
//! with the same [`SentenceEncoder`], and the chunk scores the best window cosine. A
//! chunk's windows are always encoded together and apart from other chunks, so batch
//! boundaries never change a score.
//!
//! When the stage deadline fires, scoring tasks that already left the semaphore stop at
//! the next chunk boundary; a chunk whose windows are mid-encode finishes first.

pub mod config;
pub mod error;
pub mod window;


pub use config::RerankConfig;
pub use error::RerankError;
pub use window::sliding_windows;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::chunking::Chunk;
use crate::embedding::{EmbeddingError, SentenceEncoder};
use crate::retrieval::ScoredChunk;
use crate::similarity::cosine_similarity;

pub struct Reranker {
    encoder: Arc<SentenceEncoder>,
    config: RerankConfig,
}

impl std::fmt::Debug for Reranker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reranker")
            .field("encoder", &self.encoder)
            .field("config", &self.config)
            .finish()
    }
}

impl Reranker {
    pub fn new(encoder: Arc<SentenceEncoder>, config: RerankConfig) -> Result<Self, RerankError> {
        config
            .validate()
            .map_err(|reason| RerankError::InvalidConfig { reason })?;
        Ok(Self { encoder, config })
    }

    /// Reranker over the deterministic stub encoder.
    pub fn stub() -> Self {
        Self {
            encoder: Arc::new(SentenceEncoder::stub()),
            config: RerankConfig::default(),
        }
    }

    pub fn config(&self) -> &RerankConfig {
        &self.config
    }

    pub fn encoder(&self) -> &Arc<SentenceEncoder> {
        &self.encoder
    }

    /// Scores the chunks whose `mask` entry is `true` and returns them sorted by score,
    /// highest first. Equal scores keep input order.
    pub async fn rerank(
        &self,
        query: &str,
        chunks: &[ScoredChunk],
        mask: &[bool],
        batch_size: usize,
    ) -> Result<Vec<ScoredChunk>, RerankError> {
        if mask.len() != chunks.len() {
            return Err(RerankError::MaskLengthMismatch {
                expected: chunks.len(),
                actual: mask.len(),
            });
        }

        let survivors: Vec<Chunk> = chunks
            .iter()
            .zip(mask)
            .filter(|(_, keep)| **keep)
            .map(|(scored, _)| scored.chunk.clone())
            .collect();
        if survivors.is_empty() {
            return Ok(Vec::new());
        }

        let secs = self.config.timeout.as_secs();
        let scores = tokio::time::timeout(
            self.config.timeout,
            self.score_all(query, &survivors, batch_size.max(1)),
        )
        .await
        .map_err(|_| RerankError::Timeout { secs })??;

        let mut ranked: Vec<ScoredChunk> = survivors
            .into_iter()
            .zip(scores)
            .map(|(chunk, score)| ScoredChunk::new(chunk, score))
            .collect();
        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        info!(
            scored = ranked.len(),
            skipped = chunks.len() - ranked.len(),
            top_score = ranked.first().map(|s| s.score),
            "Rerank complete"
        );
        Ok(ranked)
    }

    async fn score_all(
        &self,
        query: &str,
        chunks: &[Chunk],
        batch_size: usize,
    ) -> Result<Vec<f32>, RerankError> {
        let query_vector = {
            let encoder = Arc::clone(&self.encoder);
            let query = query.to_string();
            tokio::task::spawn_blocking(move || encoder.encode(&query))
                .await
                .map_err(|e| RerankError::TaskFailed {
                    reason: e.to_string(),
                })??
        };
        let query_vector = Arc::new(query_vector);

        let cancel = CancelOnDrop::default();
        let permits = Arc::new(Semaphore::new(self.config.workers));
        let mut tasks = JoinSet::new();

        for (batch_idx, batch) in chunks.chunks(batch_size).enumerate() {
            let encoder = Arc::clone(&self.encoder);
            let query_vector = Arc::clone(&query_vector);
            let permits = Arc::clone(&permits);
            let texts: Vec<String> = batch.iter().map(|c| c.content.clone()).collect();
            let (window, stride) = (self.config.window_words, self.config.window_stride);
            let cancelled = cancel.flag();

            tasks.spawn(async move {
                let _permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|e| RerankError::TaskFailed {
                        reason: e.to_string(),
                    })?;
                let scores = tokio::task::spawn_blocking(move || {
                    score_batch(&encoder, &query_vector, &texts, window, stride, &cancelled)
                })
                .await
                .map_err(|e| RerankError::TaskFailed {
                    reason: e.to_string(),
                })??;
                Ok::<_, RerankError>((batch_idx, scores))
            });
        }

        let mut scores = vec![0.0f32; chunks.len()];
        while let Some(joined) = tasks.join_next().await {
            let (batch_idx, batch_scores) = joined.map_err(|e| RerankError::TaskFailed {
                reason: e.to_string(),
            })??;
            debug!(batch = batch_idx, chunks = batch_scores.len(), "Scored rerank batch");

            let start = batch_idx * batch_size;
            scores[start..start + batch_scores.len()].copy_from_slice(&batch_scores);
        }

        Ok(scores)
    }
}

/// Raises its flag when dropped, which happens when the rerank deadline drops the
/// scoring future.
#[derive(Debug, Default)]
pub(crate) struct CancelOnDrop(Arc<AtomicBool>);

impl CancelOnDrop {
    pub(crate) fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.0)
    }
}

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

/// Scores one batch, checking `cancelled` before each chunk.
pub(crate) fn score_batch(
    encoder: &SentenceEncoder,
    query_vector: &[f32],
    texts: &[String],
    window: usize,
    stride: usize,
    cancelled: &AtomicBool,
) -> Result<Vec<f32>, RerankError> {
    let mut scores = Vec::with_capacity(texts.len());
    for text in texts {
        if cancelled.load(Ordering::Relaxed) {
            return Err(RerankError::Cancelled);
        }
        scores.push(score_chunk(encoder, query_vector, text, window, stride)?);
    }
    Ok(scores)
}

/// Best window cosine for one chunk, floored at `0.0`; `0.0` when the chunk has no words.
pub fn score_chunk(
    encoder: &SentenceEncoder,
    query_vector: &[f32],
    text: &str,
    window: usize,
    stride: usize,
) -> Result<f32, EmbeddingError> {
    let windows = sliding_windows(text, window, stride);
    if windows.is_empty() {
        return Ok(0.0);
    }

    let refs: Vec<&str> = windows.iter().map(String::as_str).collect();
    let vectors = encoder.encode_batch(&refs)?;

    Ok(vectors
        .iter()
        .map(|v| cosine_similarity(query_vector, v))
        .fold(0.0, f32::max))
}

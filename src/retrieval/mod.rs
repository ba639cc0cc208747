//! Hybrid retrieval: MMR over the persistent index fused with BM25 over the current
//! query's chunks.
//!
//! Lists are combined with weighted reciprocal rank fusion. A chunk returned by both
//! retrievers appears once, carrying the sum of its contributions.

pub mod config;

#[cfg(test)]
mod tests;

pub use config::RetrievalConfig;

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::chunking::Chunk;
use crate::embedding::TextEmbedder;
use crate::index::{EmbeddingIndex, IndexResult, sparse_retrieve};

/// A chunk with the score assigned by the latest stage that ranked it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

impl ScoredChunk {
    pub fn new(chunk: Chunk, score: f32) -> Self {
        Self { chunk, score }
    }
}

/// Fuses ranked lists with `weight / (rank + rrf_constant)`, ranks starting at 1.
///
/// Entries are deduplicated by [`Chunk::fingerprint`]. Output is sorted by fused score,
/// highest first; equal scores keep first-seen order, so earlier lists win ties.
pub fn reciprocal_rank_fusion(lists: &[(&[Chunk], f32)], rrf_constant: f32) -> Vec<ScoredChunk> {
    let mut fused: Vec<ScoredChunk> = Vec::new();
    let mut positions: HashMap<u64, usize> = HashMap::new();

    for (list, weight) in lists {
        for (rank, chunk) in list.iter().enumerate() {
            let contribution = weight / (rank as f32 + 1.0 + rrf_constant);
            match positions.get(&chunk.fingerprint()) {
                Some(&pos) => fused[pos].score += contribution,
                None => {
                    positions.insert(chunk.fingerprint(), fused.len());
                    fused.push(ScoredChunk::new(chunk.clone(), contribution));
                }
            }
        }
    }

    fused.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    fused
}

/// Dense + sparse retriever over a shared index.
pub struct EnsembleRetriever<E> {
    index: Arc<EmbeddingIndex<E>>,
    config: RetrievalConfig,
}

impl<E> std::fmt::Debug for EnsembleRetriever<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnsembleRetriever")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<E: TextEmbedder> EnsembleRetriever<E> {
    pub fn new(index: Arc<EmbeddingIndex<E>>, config: RetrievalConfig) -> Self {
        Self { index, config }
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Ranks candidates for `query`; `chunks` is the corpus for the sparse side.
    pub async fn retrieve(&self, query: &str, chunks: &[Chunk]) -> IndexResult<Vec<ScoredChunk>> {
        let dense = self
            .index
            .dense_retrieve(
                query,
                self.config.dense_k,
                self.config.fetch_k,
                self.config.mmr_lambda,
            )
            .await?;
        let sparse = sparse_retrieve(chunks, query, self.config.sparse_k);

        let fused = reciprocal_rank_fusion(
            &[
                (dense.as_slice(), self.config.dense_weight),
                (sparse.as_slice(), self.config.sparse_weight),
            ],
            self.config.rrf_constant,
        );

        debug!(
            dense = dense.len(),
            sparse = sparse.len(),
            fused = fused.len(),
            "Ensemble retrieval complete"
        );
        Ok(fused)
    }
}

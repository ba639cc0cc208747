//! Embedding-similarity filter over fused candidates.
//!
//! Produces a keep-mask aligned with its input. Two modes:
//!
//! - [`FilterMode::Deduplicate`] (default) walks candidates in ranked order and drops any
//!   chunk whose cosine similarity to an already kept chunk reaches the threshold.
//! - [`FilterMode::Cluster`] keeps chunks whose best similarity to some *other* chunk
//!   reaches the threshold. A lone chunk has no neighbour and is dropped.
//!
//! A chunk is never compared with itself.


use tracing::debug;

use crate::constants::DEFAULT_FILTER_THRESHOLD;
use crate::embedding::{EmbeddingError, TextEmbedder};
use crate::retrieval::ScoredChunk;
use crate::similarity::pairwise_cosine;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterMode {
    #[default]
    Deduplicate,
    Cluster,
}

impl std::str::FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deduplicate" | "dedup" => Ok(Self::Deduplicate),
            "cluster" => Ok(Self::Cluster),
            other => Err(format!("unknown filter mode '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterConfig {
    /// Cosine similarity at which two chunks count as related.
    pub threshold: f32,
    pub mode: FilterMode,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_FILTER_THRESHOLD,
            mode: FilterMode::default(),
        }
    }
}

impl FilterConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(-1.0..=1.0).contains(&self.threshold) {
            return Err(format!(
                "filter threshold must be between -1.0 and 1.0, got {}",
                self.threshold
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct SimilarityFilter {
    config: FilterConfig,
}

impl SimilarityFilter {
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Embeds `chunks` and returns one keep flag per input, in input order.
    ///
    /// Empty input returns an empty mask without calling the embedder.
    pub async fn filter<E: TextEmbedder>(
        &self,
        embedder: &E,
        chunks: &[ScoredChunk],
    ) -> Result<Vec<bool>, EmbeddingError> {
        if chunks.is_empty() {
            return Ok(Vec::new());
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.chunk.content.clone()).collect();
        let vectors = embedder.embed_documents(&texts).await?;
        if vectors.len() != chunks.len() {
            return Err(EmbeddingError::InvalidResponse {
                reason: format!(
                    "expected {} vectors, got {}",
                    chunks.len(),
                    vectors.len()
                ),
            });
        }

        let mask = similarity_mask(&vectors, self.config.threshold, self.config.mode);
        debug!(
            candidates = mask.len(),
            kept = mask.iter().filter(|keep| **keep).count(),
            mode = ?self.config.mode,
            "Similarity filter applied"
        );
        Ok(mask)
    }
}

/// Keep-mask for `vectors` under `mode`.
pub fn similarity_mask(vectors: &[Vec<f32>], threshold: f32, mode: FilterMode) -> Vec<bool> {
    let sims = pairwise_cosine(vectors);
    let n = vectors.len();

    match mode {
        FilterMode::Deduplicate => {
            let mut kept: Vec<usize> = Vec::with_capacity(n);
            let mut mask = vec![false; n];
            for i in 0..n {
                if kept.iter().all(|&j| sims[i][j] < threshold) {
                    kept.push(i);
                    mask[i] = true;
                }
            }
            mask
        }
        FilterMode::Cluster => (0..n)
            .map(|i| {
                (0..n)
                    .filter(|&j| j != i)
                    .map(|j| sims[i][j])
                    .fold(f32::NEG_INFINITY, f32::max)
                    >= threshold
            })
            .collect(),
    }
}

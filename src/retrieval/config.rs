use crate::constants::{
    DEFAULT_DENSE_K, DEFAULT_DENSE_WEIGHT, DEFAULT_FETCH_K, DEFAULT_MMR_LAMBDA,
    DEFAULT_RRF_CONSTANT, DEFAULT_SPARSE_K, DEFAULT_SPARSE_WEIGHT,
};

/// Hybrid retrieval settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetrievalConfig {
    /// Chunks selected by MMR from the persistent index.
    pub dense_k: usize,
    /// Nearest neighbours fetched before MMR selection.
    pub fetch_k: usize,
    /// MMR relevance/diversity balance (1.0 = relevance only).
    pub mmr_lambda: f32,
    /// Chunks taken from the per-query BM25 ranking.
    pub sparse_k: usize,
    pub dense_weight: f32,
    pub sparse_weight: f32,
    /// Rank offset in `weight / (rank + c)`.
    pub rrf_constant: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            dense_k: DEFAULT_DENSE_K,
            fetch_k: DEFAULT_FETCH_K,
            mmr_lambda: DEFAULT_MMR_LAMBDA,
            sparse_k: DEFAULT_SPARSE_K,
            dense_weight: DEFAULT_DENSE_WEIGHT,
            sparse_weight: DEFAULT_SPARSE_WEIGHT,
            rrf_constant: DEFAULT_RRF_CONSTANT,
        }
    }
}

impl RetrievalConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.dense_k == 0 && self.sparse_k == 0 {
            return Err("at least one of dense_k and sparse_k must be greater than 0".to_string());
        }
        if self.fetch_k < self.dense_k {
            return Err(format!(
                "fetch_k ({}) must be at least dense_k ({})",
                self.fetch_k, self.dense_k
            ));
        }
        if !(0.0..=1.0).contains(&self.mmr_lambda) {
            return Err(format!(
                "mmr_lambda must be between 0.0 and 1.0, got {}",
                self.mmr_lambda
            ));
        }
        if self.dense_weight < 0.0 || self.sparse_weight < 0.0 {
            return Err("fusion weights must not be negative".to_string());
        }
        if self.rrf_constant < 0.0 {
            return Err("rrf_constant must not be negative".to_string());
        }
        Ok(())
    }
}

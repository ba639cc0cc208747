//! Deterministic, model-free vectors.
//!
//! Each token seeds a pseudo-random direction; a text's vector is the normalised sum of its
//! token directions. Texts sharing vocabulary therefore have high cosine similarity, which
//! keeps retrieval and reranking meaningful without network or model files.

use tracing::debug;

use super::{EmbeddingError, TextEmbedder};
use crate::chunking::tokenize;
use crate::constants::DEFAULT_EMBEDDING_DIM;
use crate::hashing::hash_token;
use crate::similarity::normalize;

/// Hashed bag-of-words vector of width `dim`. Text without tokens maps to the zero vector.
pub fn hashed_bag_of_words(text: &str, dim: usize) -> Vec<f32> {
    let mut embedding = vec![0.0f32; dim];

    for token in tokenize(text) {
        let mut state = hash_token(&token);
        for value in embedding.iter_mut() {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            *value += ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0;
        }
    }

    normalize(&mut embedding);
    embedding
}

/// Embedder used when no API key is configured.
#[derive(Debug, Clone)]
pub struct StubEmbedder {
    dim: usize,
}

impl Default for StubEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_EMBEDDING_DIM)
    }
}

impl StubEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1) }
    }

    pub fn embed(&self, text: &str) -> Vec<f32> {
        hashed_bag_of_words(text, self.dim)
    }
}

impl TextEmbedder for StubEmbedder {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        debug!(count = texts.len(), "Generating stub embeddings");
        Ok(texts.iter().map(|t| self.embed(t)).collect())
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self.embed(text))
    }

    fn dimension(&self) -> usize {
        self.dim
    }
}

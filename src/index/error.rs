use std::path::PathBuf;
use thiserror::Error;

use crate::embedding::EmbeddingError;

#[derive(Debug, Error)]
pub enum IndexError {
    /// Embedding failures propagate; retrieval cannot proceed without vectors.
    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {reason}")]
    Serialization { reason: String },

    #[error("vector dimension mismatch: index holds {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("embedder returned {actual} vectors for {expected} texts")]
    VectorCountMismatch { expected: usize, actual: usize },

    #[error("index path unavailable: {path}")]
    StorageUnavailable { path: PathBuf },

    #[error("index write task failed: {reason}")]
    WriteTaskFailed { reason: String },
}

pub type IndexResult<T> = Result<T, IndexError>;

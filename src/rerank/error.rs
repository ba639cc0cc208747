use thiserror::Error;

use crate::embedding::EmbeddingError;

#[derive(Debug, Error)]
pub enum RerankError {
    #[error("encoder failed: {0}")]
    Encoder(#[from] EmbeddingError),

    #[error("rerank timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("filter mask has {actual} entries for {expected} chunks")]
    MaskLengthMismatch { expected: usize, actual: usize },

    #[error("scoring cancelled after the rerank deadline")]
    Cancelled,

    #[error("scoring task failed: {reason}")]
    TaskFailed { reason: String },

    #[error("invalid rerank configuration: {reason}")]
    InvalidConfig { reason: String },
}

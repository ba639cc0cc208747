use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("failed to load encoder model: {reason}")]
    ModelLoadFailed { reason: String },

    #[error("embedding inference failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("tokenization failed: {reason}")]
    TokenizationFailed { reason: String },

    #[error("invalid embedding configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("embedding request failed: {reason}")]
    RequestFailed { reason: String },

    #[error("embedding service returned HTTP {status}: {body}")]
    BadStatus { status: u16, body: String },

    #[error("embedding service timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("malformed embedding response: {reason}")]
    InvalidResponse { reason: String },
}

impl From<candle_core::Error> for EmbeddingError {
    fn from(err: candle_core::Error) -> Self {
        EmbeddingError::InferenceFailed {
            reason: err.to_string(),
        }
    }
}

impl From<std::io::Error> for EmbeddingError {
    fn from(err: std::io::Error) -> Self {
        EmbeddingError::ModelLoadFailed {
            reason: err.to_string(),
        }
    }
}

//! Cross-cutting, shared constants.
//!
//! Stage defaults live here so that the config layer, the pipeline and the tests agree on the
//! same numbers. Prefer [`PipelineConfig`](crate::pipeline::PipelineConfig) for runtime tuning.
//!
//! # Dimension Invariants
//!
//! The on-disk index stores vectors of one dimension only. Switching embedding models produces
//! vectors of a different width; use [`validate_embedding_dim`] at module boundaries to catch
//! the mismatch before it reaches the store.

/// Output width of `text-embedding-3-small`.
pub const DEFAULT_EMBEDDING_DIM: usize = 1536;

/// Hidden size of `bert-base-uncased`, also used by the stub encoder.
pub const DEFAULT_ENCODER_DIM: usize = 768;

/// Token limit of the BERT encoder; longer windows are truncated.
pub const ENCODER_MAX_SEQ_LEN: usize = 512;

pub const DEFAULT_NUM_RESULTS: usize = 3;

pub const DEFAULT_CHUNK_SIZE: usize = 512;
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

pub const DEFAULT_DENSE_K: usize = 3;
pub const DEFAULT_FETCH_K: usize = 20;
pub const DEFAULT_MMR_LAMBDA: f32 = 0.7;

pub const DEFAULT_SPARSE_K: usize = 3;

pub const DEFAULT_DENSE_WEIGHT: f32 = 0.7;
pub const DEFAULT_SPARSE_WEIGHT: f32 = 0.3;
pub const DEFAULT_RRF_CONSTANT: f32 = 60.0;

pub const DEFAULT_FILTER_THRESHOLD: f32 = 0.75;

pub const DEFAULT_WINDOW_WORDS: usize = 1024;
pub const DEFAULT_WINDOW_STRIDE: usize = 512;
pub const DEFAULT_RERANK_BATCH_SIZE: usize = 16;

pub const SCRAPE_WORKERS: usize = 10;
pub const RERANK_WORKERS: usize = 5;

pub const DEFAULT_TOP_K: usize = 5;

pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_RERANK_TIMEOUT_SECS: u64 = 300;

/// Metadata source tag attached to every scraped chunk.
pub const WEB_SCRAPE_SOURCE: &str = "Web scrape";

/// Title used when a search hit carries none.
pub const NO_TITLE: &str = "No title";

/// Error returned when a runtime dimension does not match the expected one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimValidationError {
    /// Embedding dimension cannot be zero.
    ZeroDimension,
    /// Runtime dimension does not match expected dimension.
    DimensionMismatch { expected: usize, actual: usize },
}

impl std::fmt::Display for DimValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroDimension => write!(f, "embedding dimension cannot be zero"),
            Self::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "dimension mismatch: expected {}, got {}",
                    expected, actual
                )
            }
        }
    }
}

impl std::error::Error for DimValidationError {}

/// Validates that a runtime embedding dimension matches the expected dimension.
///
/// # Example
///
/// ```
/// use newscheck::constants::{validate_embedding_dim, DEFAULT_EMBEDDING_DIM};
///
/// validate_embedding_dim(1536, DEFAULT_EMBEDDING_DIM).unwrap();
/// assert!(validate_embedding_dim(768, DEFAULT_EMBEDDING_DIM).is_err());
/// ```
pub fn validate_embedding_dim(actual: usize, expected: usize) -> Result<(), DimValidationError> {
    if actual == 0 {
        return Err(DimValidationError::ZeroDimension);
    }
    if actual != expected {
        return Err(DimValidationError::DimensionMismatch { expected, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_embedding_dim_match() {
        assert!(validate_embedding_dim(1536, 1536).is_ok());
    }

    #[test]
    fn test_validate_embedding_dim_zero() {
        assert_eq!(
            validate_embedding_dim(0, 1536),
            Err(DimValidationError::ZeroDimension)
        );
    }

    #[test]
    fn test_validate_embedding_dim_mismatch() {
        assert_eq!(
            validate_embedding_dim(768, 1536),
            Err(DimValidationError::DimensionMismatch {
                expected: 1536,
                actual: 768
            })
        );
    }

    #[test]
    fn test_overlap_smaller_than_chunk() {
        assert!(DEFAULT_CHUNK_OVERLAP < DEFAULT_CHUNK_SIZE);
        assert!(DEFAULT_WINDOW_STRIDE <= DEFAULT_WINDOW_WORDS);
    }

    #[test]
    fn test_error_display() {
        let err = DimValidationError::DimensionMismatch {
            expected: 1536,
            actual: 768,
        };
        assert!(err.to_string().contains("1536"));
        assert!(err.to_string().contains("768"));
    }
}

use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::index::IndexError;
use crate::report::ReportError;
use crate::rerank::RerankError;
use crate::search::SearchError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("search failed: {0}")]
    Search(#[from] SearchError),

    #[error("index error: {0}")]
    Index(#[from] IndexError),

    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("rerank failed: {0}")]
    Rerank(#[from] RerankError),

    #[error("report failed: {0}")]
    Report(#[from] ReportError),

    #[error("invalid pipeline configuration: {reason}")]
    InvalidConfig { reason: String },
}

//! Newscheck library crate (used by the binary and integration tests).
//!
//! Fact-checks a claim against fresh web news: search, scrape, chunk, index, hybrid
//! retrieval, similarity filtering and sliding-window reranking, then an LLM report.
//!
//! # Public API Surface
//!
//! ## Composition
//! - [`FactCheckPipeline`], [`PipelineConfig`], [`PipelineOutcome`] - claim to ranked context
//! - [`FactChecker`], [`FactCheckResult`] - context plus generated report
//! - [`Config`], [`ConfigError`] - environment configuration
//!
//! ## Stages
//! - [`WebSearch`], [`DuckDuckGoSearch`] - search backends
//! - [`PageScraper`], [`ArticleScraper`], [`ScrapeCoordinator`] - article extraction
//! - [`Chunker`], [`Chunk`] - overlapping character chunks
//! - [`EmbeddingIndex`] - persistent vectors with MMR and BM25 retrieval
//! - [`EnsembleRetriever`], [`ScoredChunk`] - weighted rank fusion
//! - [`SimilarityFilter`] - embedding-based candidate filter
//! - [`Reranker`] - window-max cosine scoring with a local encoder
//! - [`ReportGenerator`], [`parse_report`] - report capability and parser
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod chunking;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod filter;
pub mod gateway;
pub mod hashing;
pub mod http;
pub mod index;
pub mod pipeline;
pub mod report;
pub mod rerank;
pub mod retrieval;
pub mod scrape;
pub mod search;
pub mod similarity;

pub use chunking::{Chunk, ChunkMetadata, Chunker, ChunkerConfig};
pub use config::{Config, ConfigError};
pub use constants::{DimValidationError, validate_embedding_dim};
pub use embedding::{
    Embedder, EmbeddingError, EncoderConfig, RemoteEmbedder, SentenceEncoder, StubEmbedder,
    TextEmbedder,
};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbedder;
pub use filter::{FilterConfig, FilterMode, SimilarityFilter};
pub use hashing::{chunk_fingerprint, hash_to_u64};
pub use index::{
    Bm25Index, DEFAULT_COLLECTION, DiskStore, EmbeddingIndex, IndexError, IndexRecord,
    IndexResult, maximal_marginal_relevance, sparse_retrieve,
};
pub use pipeline::{
    FactCheckPipeline, FactCheckResult, FactChecker, PipelineConfig, PipelineError,
    PipelineOutcome, format_passages,
};
pub use report::{
    FactCheckReport, GenaiReportGenerator, ReportError, ReportGenerator, Verdict, parse_report,
};
#[cfg(any(test, feature = "mock"))]
pub use report::MockReportGenerator;
pub use rerank::{RerankConfig, RerankError, Reranker, sliding_windows};
pub use retrieval::{EnsembleRetriever, RetrievalConfig, ScoredChunk, reciprocal_rank_fusion};
pub use scrape::{ArticleScraper, PageScraper, ScrapeCoordinator, ScrapeError, ScrapedArticle};
#[cfg(any(test, feature = "mock"))]
pub use scrape::MockPageScraper;
pub use search::{DuckDuckGoSearch, SearchError, SearchResult, WebSearch};
#[cfg(any(test, feature = "mock"))]
pub use search::MockSearchBackend;
pub use similarity::{cosine_similarity, pairwise_cosine};

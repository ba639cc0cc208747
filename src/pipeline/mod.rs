//! Claim-to-context composition root.
//!
//! [`FactCheckPipeline::run`] walks the stages in order:
//!
//! ```text
//! search -> scrape -> chunk -> index.add -> ensemble retrieve -> filter -> rerank -> top-k
//! ```
//!
//! Empty intermediate results end the run early with a [`PipelineOutcome`] rather than an
//! error. [`FactCheckPipeline::gather_context`] is the outer boundary: it always returns a
//! string, turning errors into `"Error retrieving news: ..."`. [`FactChecker`] adds the
//! report step on top.

pub mod config;
pub mod error;


pub use config::PipelineConfig;
pub use error::PipelineError;

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::chunking::Chunker;
use crate::constants::validate_embedding_dim;
use crate::embedding::{SentenceEncoder, TextEmbedder};
use crate::filter::SimilarityFilter;
use crate::index::EmbeddingIndex;
use crate::report::{FactCheckReport, ReportGenerator, parse_report};
use crate::rerank::Reranker;
use crate::retrieval::{EnsembleRetriever, ScoredChunk};
use crate::scrape::{PageScraper, ScrapeCoordinator};
use crate::search::WebSearch;

pub const NO_RESULTS_MESSAGE: &str = "No results found";
pub const NO_CONTENT_MESSAGE: &str = "No content could be scraped from the articles";
pub const NO_DOCUMENTS_MESSAGE: &str = "No documents could be processed";

const PASSAGE_DELIMITER: &str = "-------------------";

/// How a run ended when it did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    /// The search backend returned nothing.
    NoResults,
    /// Every scrape failed or came back empty.
    NoContent,
    /// Scraped text produced no chunks.
    NoDocuments,
    /// Ranked passages, best first, at most `top_k`.
    Passages(Vec<ScoredChunk>),
}

impl PipelineOutcome {
    /// Caller-facing text for this outcome.
    pub fn render(&self) -> String {
        match self {
            Self::NoResults => NO_RESULTS_MESSAGE.to_string(),
            Self::NoContent => NO_CONTENT_MESSAGE.to_string(),
            Self::NoDocuments => NO_DOCUMENTS_MESSAGE.to_string(),
            Self::Passages(passages) if passages.is_empty() => NO_DOCUMENTS_MESSAGE.to_string(),
            Self::Passages(passages) => format_passages(passages),
        }
    }
}

/// Renders passages as `Score/Title/URL/Content` blocks, each closed by a delimiter line.
pub fn format_passages(passages: &[ScoredChunk]) -> String {
    passages
        .iter()
        .map(|p| {
            format!(
                "Score: {:.4}\nTitle: {}\nURL: {}\nContent: {}\n{}\n",
                p.score,
                p.chunk.metadata.title,
                p.chunk.metadata.url,
                p.chunk.content,
                PASSAGE_DELIMITER
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub struct FactCheckPipeline<S, P, E> {
    search: S,
    coordinator: ScrapeCoordinator<P>,
    chunker: Chunker,
    index: Arc<EmbeddingIndex<E>>,
    retriever: EnsembleRetriever<E>,
    filter: SimilarityFilter,
    reranker: Reranker,
    config: PipelineConfig,
}

impl<S, P, E> std::fmt::Debug for FactCheckPipeline<S, P, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactCheckPipeline")
            .field("config", &self.config)
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl<S, P, E> FactCheckPipeline<S, P, E>
where
    S: WebSearch,
    P: PageScraper + 'static,
    E: TextEmbedder,
{
    pub fn new(
        search: S,
        scraper: P,
        index: Arc<EmbeddingIndex<E>>,
        encoder: Arc<SentenceEncoder>,
        config: PipelineConfig,
    ) -> Result<Self, PipelineError> {
        config
            .validate()
            .map_err(|reason| PipelineError::InvalidConfig { reason })?;

        if let Some(stored) = index.dimension()
            && let Err(e) = validate_embedding_dim(index.embedder().dimension(), stored)
        {
            warn!(error = %e, "Embedder does not match the stored index; appends will fail");
        }

        Ok(Self {
            search,
            coordinator: ScrapeCoordinator::with_workers(scraper, config.scrape_workers),
            chunker: Chunker::new(config.chunker),
            retriever: EnsembleRetriever::new(Arc::clone(&index), config.retrieval),
            index,
            filter: SimilarityFilter::new(config.filter),
            reranker: Reranker::new(encoder, config.rerank)?,
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn index(&self) -> &Arc<EmbeddingIndex<E>> {
        &self.index
    }

    pub fn search_backend(&self) -> &S {
        &self.search
    }

    pub fn scraper(&self) -> &P {
        self.coordinator.scraper()
    }

    /// Runs every stage for `claim`.
    pub async fn run(&self, claim: &str) -> Result<PipelineOutcome, PipelineError> {
        let links = self.search.search(claim, self.config.num_results).await?;
        if links.is_empty() {
            info!(claim, "Search returned no results");
            return Ok(PipelineOutcome::NoResults);
        }

        let articles = self.coordinator.scrape_all(&links).await;
        if articles.is_empty() {
            warn!(claim, links = links.len(), "No article could be scraped");
            return Ok(PipelineOutcome::NoContent);
        }

        let chunks = self.chunker.chunk_articles(&articles);
        if chunks.is_empty() {
            warn!(claim, articles = articles.len(), "Scraped articles produced no chunks");
            return Ok(PipelineOutcome::NoDocuments);
        }

        self.index.add(&chunks).await?;

        let fused = self.retriever.retrieve(claim, &chunks).await?;
        let mask = self.filter.filter(self.index.embedder(), &fused).await?;
        let mut ranked = self
            .reranker
            .rerank(claim, &fused, &mask, self.config.rerank.batch_size)
            .await?;
        ranked.truncate(self.config.top_k);

        info!(
            claim,
            links = links.len(),
            articles = articles.len(),
            chunks = chunks.len(),
            candidates = fused.len(),
            passages = ranked.len(),
            "Pipeline complete"
        );
        Ok(PipelineOutcome::Passages(ranked))
    }

    /// Ranked context for `claim`; never fails.
    pub async fn gather_context(&self, claim: &str) -> String {
        match self.run(claim).await {
            Ok(outcome) => outcome.render(),
            Err(e) => {
                error!(claim, error = %e, "Pipeline failed");
                format!("Error retrieving news: {e}")
            }
        }
    }
}

/// Result of a full check: the claim, the context it was judged on and the report text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactCheckResult {
    pub question: String,
    pub context: String,
    pub output: String,
}

impl FactCheckResult {
    pub fn report(&self) -> FactCheckReport {
        parse_report(&self.output)
    }
}

/// Pipeline plus report generation.
pub struct FactChecker<S, P, E> {
    pipeline: FactCheckPipeline<S, P, E>,
    generator: Arc<dyn ReportGenerator>,
}

impl<S, P, E> std::fmt::Debug for FactChecker<S, P, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactChecker")
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}

impl<S, P, E> FactChecker<S, P, E>
where
    S: WebSearch,
    P: PageScraper + 'static,
    E: TextEmbedder,
{
    pub fn new(pipeline: FactCheckPipeline<S, P, E>, generator: Arc<dyn ReportGenerator>) -> Self {
        Self {
            pipeline,
            generator,
        }
    }

    pub fn pipeline(&self) -> &FactCheckPipeline<S, P, E> {
        &self.pipeline
    }

    /// Gathers context and asks the generator for a report on it.
    pub async fn check(&self, claim: &str) -> Result<FactCheckResult, PipelineError> {
        let context = self.pipeline.gather_context(claim).await;
        let output = self.generator.generate_report(claim, &context).await?;

        Ok(FactCheckResult {
            question: claim.to_string(),
            context,
            output,
        })
    }
}

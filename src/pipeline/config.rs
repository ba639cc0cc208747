use crate::chunking::ChunkerConfig;
use crate::config::Config;
use crate::constants::{DEFAULT_NUM_RESULTS, DEFAULT_TOP_K, SCRAPE_WORKERS};
use crate::filter::FilterConfig;
use crate::rerank::RerankConfig;
use crate::retrieval::RetrievalConfig;

/// Stage tuning for one [`FactCheckPipeline`](super::FactCheckPipeline).
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Search hits requested per claim.
    pub num_results: usize,
    pub scrape_workers: usize,
    pub chunker: ChunkerConfig,
    pub retrieval: RetrievalConfig,
    pub filter: FilterConfig,
    pub rerank: RerankConfig,
    /// Passages handed to the report step.
    pub top_k: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            num_results: DEFAULT_NUM_RESULTS,
            scrape_workers: SCRAPE_WORKERS,
            chunker: ChunkerConfig::default(),
            retrieval: RetrievalConfig::default(),
            filter: FilterConfig::default(),
            rerank: RerankConfig::default(),
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl PipelineConfig {
    /// Defaults overridden by the environment-level settings.
    pub fn from_config(config: &Config) -> Self {
        let mut pipeline = Self {
            num_results: config.num_results,
            top_k: config.top_k,
            ..Default::default()
        };
        pipeline.filter.threshold = config.filter_threshold;
        pipeline
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.num_results == 0 {
            return Err("num_results must be greater than 0".to_string());
        }
        if self.scrape_workers == 0 {
            return Err("scrape_workers must be greater than 0".to_string());
        }
        if self.top_k == 0 {
            return Err("top_k must be greater than 0".to_string());
        }
        self.chunker.validate()?;
        self.retrieval.validate()?;
        self.filter.validate()?;
        self.rerank.validate()?;
        Ok(())
    }
}

//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use tempfile::TempDir;

use newscheck::{
    EmbeddingIndex, FactCheckPipeline, MockEmbedder, MockPageScraper, MockSearchBackend,
    PipelineConfig, SearchResult, SentenceEncoder,
};

pub type MockPipeline = FactCheckPipeline<MockSearchBackend, MockPageScraper, MockEmbedder>;

pub const CLAIM: &str = "The sky is green";

/// Three short articles, each well under one chunk.
pub fn articles() -> Vec<(SearchResult, &'static str)> {
    vec![
        (
            SearchResult::new("https://weather.example/green-sky", "Green skies before storms"),
            "Storm chasers say the sky can turn green when sunlight passes through a tall hail-bearing cloud.",
        ),
        (
            SearchResult::new("https://science.example/blue-sky", "Why is the sky blue"),
            "Rayleigh scattering makes the daytime sky appear blue to human observers.",
        ),
        (
            SearchResult::new("https://news.example/aurora", "Aurora paints sky green"),
            "A strong solar storm produced green aurora visible far south of the usual latitudes.",
        ),
    ]
}

pub fn search_backend() -> MockSearchBackend {
    MockSearchBackend::new(articles().into_iter().map(|(hit, _)| hit).collect())
}

pub fn scraper() -> MockPageScraper {
    articles()
        .into_iter()
        .fold(MockPageScraper::new(), |scraper, (hit, text)| {
            scraper.with_page(hit.url, text)
        })
}

pub fn open_index(dir: &TempDir) -> Arc<EmbeddingIndex<MockEmbedder>> {
    Arc::new(
        EmbeddingIndex::open(dir.path(), "integration", MockEmbedder::with_dimension(96))
            .expect("index should open"),
    )
}

pub fn pipeline(
    index: Arc<EmbeddingIndex<MockEmbedder>>,
    search: MockSearchBackend,
    scraper: MockPageScraper,
) -> MockPipeline {
    FactCheckPipeline::new(
        search,
        scraper,
        index,
        Arc::new(SentenceEncoder::stub()),
        PipelineConfig::default(),
    )
    .expect("default pipeline config is valid")
}

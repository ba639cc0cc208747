//! Fixed-size, overlapping character chunking of article text.
//!
//! Windows are measured in Unicode scalar values, so a chunk never splits a code point.
//! Consecutive chunks share exactly `chunk_overlap` characters.

pub mod config;

#[cfg(test)]
mod tests;

pub use config::ChunkerConfig;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::WEB_SCRAPE_SOURCE;
use crate::hashing::chunk_fingerprint;
use crate::scrape::ScrapedArticle;

/// Provenance attached to every chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub title: String,
    pub url: String,
    pub source: String,
}

impl ChunkMetadata {
    pub fn web_scrape(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            source: WEB_SCRAPE_SOURCE.to_string(),
        }
    }
}

/// A bounded slice of article text plus its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub content: String,
    pub metadata: ChunkMetadata,
}

impl Chunk {
    pub fn new(content: impl Into<String>, metadata: ChunkMetadata) -> Self {
        Self {
            content: content.into(),
            metadata,
        }
    }

    /// Identity used to merge the same chunk across retrievers.
    pub fn fingerprint(&self) -> u64 {
        chunk_fingerprint(&self.metadata.url, &self.content)
    }
}

/// Lowercased alphanumeric word tokens, in order. Shared by keyword scoring and the stub
/// vectorisers.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Splits text into overlapping windows.
#[derive(Debug, Clone, Default)]
pub struct Chunker {
    config: ChunkerConfig,
}

impl Chunker {
    pub fn new(config: ChunkerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Splits `text` into chunks of at most `chunk_size` characters.
    ///
    /// The input is trimmed first. Empty input yields no chunks; input no longer than one
    /// chunk yields exactly one chunk equal to the trimmed input.
    pub fn split(&self, text: &str) -> Vec<String> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }

        let chars: Vec<char> = text.chars().collect();
        let size = self.config.chunk_size;
        if chars.len() <= size {
            return vec![text.to_string()];
        }

        let step = self.config.step();
        let mut chunks = Vec::with_capacity(chars.len() / step + 1);
        let mut start = 0;

        loop {
            let end = (start + size).min(chars.len());
            chunks.push(chars[start..end].iter().collect());
            if end == chars.len() {
                break;
            }
            start += step;
        }

        chunks
    }

    /// Splits one scraped article into chunks carrying its title and url.
    pub fn chunk_article(&self, article: &ScrapedArticle) -> Vec<Chunk> {
        let metadata = ChunkMetadata::web_scrape(&article.title, &article.url);
        let chunks: Vec<Chunk> = self
            .split(&article.content)
            .into_iter()
            .map(|content| Chunk::new(content, metadata.clone()))
            .collect();

        debug!(url = %article.url, chunks = chunks.len(), "Chunked article");
        chunks
    }

    /// Chunks every article, preserving article order.
    pub fn chunk_articles(&self, articles: &[ScrapedArticle]) -> Vec<Chunk> {
        articles
            .iter()
            .flat_map(|article| self.chunk_article(article))
            .collect()
    }
}

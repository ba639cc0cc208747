//! Web search for candidate news articles.
//!
//! [`WebSearch`] is the seam the pipeline depends on. [`DuckDuckGoSearch`] scrapes the HTML
//! results page; tests use `MockSearchBackend` (behind the `mock` feature).

pub mod duckduckgo;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(test)]
mod tests;

pub use duckduckgo::{DuckDuckGoSearch, parse_results};
pub use error::SearchError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockSearchBackend;

use serde::{Deserialize, Serialize};

/// One search hit, in backend order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub url: String,
    pub title: String,
}

impl SearchResult {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }
}

/// Minimal async interface over a search backend.
pub trait WebSearch: Send + Sync {
    /// Returns at most `num_results` hits in backend order. Zero matches is `Ok(vec![])`.
    fn search(
        &self,
        query: &str,
        num_results: usize,
    ) -> impl std::future::Future<Output = Result<Vec<SearchResult>, SearchError>> + Send;
}

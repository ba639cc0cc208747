//! Article fetching and concurrent scraping.
//!
//! [`ArticleScraper`] turns one URL into readable text; [`ScrapeCoordinator`] fans a list of
//! search hits out over a bounded worker pool and keeps only the successes.

pub mod article;
pub mod coordinator;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use article::{ArticleScraper, extract_article_text, is_paywalled};
pub use coordinator::ScrapeCoordinator;
pub use error::ScrapeError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockPageScraper;

use serde::{Deserialize, Serialize};

/// Text extracted from one search hit. `content` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedArticle {
    pub url: String,
    pub title: String,
    pub content: String,
}

/// Fetches a page and returns its main-body text.
///
/// Failures are recovered here: implementations log them and return `None` so that one bad
/// URL never aborts a batch.
pub trait PageScraper: Send + Sync {
    fn scrape(&self, url: &str) -> impl std::future::Future<Output = Option<String>> + Send;
}

use std::sync::Arc;

use futures_util::StreamExt;
use futures_util::stream;
use tracing::{debug, info};

use super::{PageScraper, ScrapedArticle};
use crate::constants::SCRAPE_WORKERS;
use crate::search::SearchResult;

/// Scrapes many links with bounded concurrency.
///
/// Results arrive in completion order, not input order.
#[derive(Debug)]
pub struct ScrapeCoordinator<P> {
    scraper: Arc<P>,
    workers: usize,
}

impl<P> Clone for ScrapeCoordinator<P> {
    fn clone(&self) -> Self {
        Self {
            scraper: Arc::clone(&self.scraper),
            workers: self.workers,
        }
    }
}

impl<P: PageScraper + 'static> ScrapeCoordinator<P> {
    pub fn new(scraper: P) -> Self {
        Self::with_workers(scraper, SCRAPE_WORKERS)
    }

    pub fn with_workers(scraper: P, workers: usize) -> Self {
        Self {
            scraper: Arc::new(scraper),
            workers: workers.max(1),
        }
    }

    pub fn scraper(&self) -> &P {
        &self.scraper
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Scrapes every link; failed or empty pages are dropped without retry.
    pub async fn scrape_all(&self, links: &[SearchResult]) -> Vec<ScrapedArticle> {
        let articles: Vec<ScrapedArticle> = stream::iter(links.iter().cloned())
            .map(|link| {
                let scraper = Arc::clone(&self.scraper);
                async move {
                    let content = scraper.scrape(&link.url).await?;
                    let content = content.trim();
                    if content.is_empty() {
                        debug!(url = %link.url, "Dropping empty scrape");
                        return None;
                    }
                    Some(ScrapedArticle {
                        url: link.url,
                        title: link.title,
                        content: content.to_string(),
                    })
                }
            })
            .buffer_unordered(self.workers)
            .filter_map(|article| async move { article })
            .collect()
            .await;

        info!(
            requested = links.len(),
            scraped = articles.len(),
            "Scraping complete"
        );
        articles
    }
}

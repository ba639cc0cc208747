use std::time::Duration;

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::{PageScraper, ScrapeError};
use crate::http::build_client;

/// Containers tried in order; the first match wins.
const CONTAINER_PRIORITY: [&str; 3] = ["main", "article", "body"];

/// HTTP article scraper with paywall detection.
#[derive(Debug, Clone)]
pub struct ArticleScraper {
    client: reqwest::Client,
    timeout: Duration,
}

impl ArticleScraper {
    pub fn new(timeout: Duration) -> Result<Self, ScrapeError> {
        let client = build_client(timeout).map_err(|e| ScrapeError::RequestFailed {
            url: String::new(),
            reason: format!("failed to build HTTP client: {e}"),
        })?;
        Ok(Self { client, timeout })
    }

    /// Fetches `url` and extracts its paragraph text.
    pub async fn fetch_article(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::BadStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.map_reqwest_error(url, e))?;
        let body = String::from_utf8_lossy(&bytes);

        if is_paywalled(&body) {
            return Err(ScrapeError::Paywalled {
                url: url.to_string(),
            });
        }

        let text = extract_article_text(&body);
        if text.is_empty() {
            return Err(ScrapeError::EmptyContent {
                url: url.to_string(),
            });
        }

        debug!(url = %url, chars = text.len(), "Extracted article text");
        Ok(text)
    }

    fn map_reqwest_error(&self, url: &str, err: reqwest::Error) -> ScrapeError {
        if err.is_timeout() {
            ScrapeError::Timeout {
                url: url.to_string(),
                secs: self.timeout.as_secs(),
            }
        } else {
            ScrapeError::RequestFailed {
                url: url.to_string(),
                reason: err.to_string(),
            }
        }
    }
}

impl PageScraper for ArticleScraper {
    async fn scrape(&self, url: &str) -> Option<String> {
        match self.fetch_article(url).await {
            Ok(text) => Some(text),
            Err(ScrapeError::Paywalled { .. }) => {
                warn!(url = %url, "Paywall detected, skipping");
                None
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Scrape failed");
                None
            }
        }
    }
}

/// Case-insensitive check for the literal `paywall` anywhere in the raw body.
pub fn is_paywalled(body: &str) -> bool {
    body.to_lowercase().contains("paywall")
}

/// Extracts paragraph text from the first `main`, else `article`, else `body` element,
/// falling back to the whole document.
///
/// Paragraphs are trimmed, empty ones dropped, and the rest joined with single spaces.
pub fn extract_article_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let Ok(paragraphs) = Selector::parse("p") else {
        return String::new();
    };

    let container = CONTAINER_PRIORITY.iter().find_map(|tag| {
        Selector::parse(tag)
            .ok()
            .and_then(|selector| document.select(&selector).next())
    });

    let texts: Vec<String> = match container {
        Some(element) => collect_paragraphs(element, &paragraphs),
        None => collect_paragraphs(document.root_element(), &paragraphs),
    };

    texts.join(" ")
}

fn collect_paragraphs(container: ElementRef<'_>, paragraphs: &Selector) -> Vec<String> {
    container
        .select(paragraphs)
        .map(|p| p.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

use std::time::Duration;

use scraper::{Html, Selector};
use tracing::{debug, info};
use url::Url;

use super::{SearchError, SearchResult, WebSearch};
use crate::constants::NO_TITLE;
use crate::http::build_client;

const DUCKDUCKGO_BASE: &str = "https://duckduckgo.com";

/// Search backend over DuckDuckGo's JavaScript-free results page.
#[derive(Debug, Clone)]
pub struct DuckDuckGoSearch {
    client: reqwest::Client,
    endpoint: Url,
    timeout: Duration,
}

impl DuckDuckGoSearch {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, SearchError> {
        let endpoint = Url::parse(endpoint).map_err(|e| SearchError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;
        let client = build_client(timeout).map_err(|e| SearchError::RequestFailed {
            reason: format!("failed to build HTTP client: {e}"),
        })?;

        Ok(Self {
            client,
            endpoint,
            timeout,
        })
    }

    fn map_reqwest_error(&self, err: reqwest::Error) -> SearchError {
        if err.is_timeout() {
            SearchError::Timeout {
                secs: self.timeout.as_secs(),
            }
        } else {
            SearchError::RequestFailed {
                reason: err.to_string(),
            }
        }
    }
}

impl WebSearch for DuckDuckGoSearch {
    async fn search(
        &self,
        query: &str,
        num_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        if num_results == 0 || query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("q", query.trim());

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::BadStatus {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        let results = parse_results(&body, num_results);
        info!(query = %query, results = results.len(), "Search complete");
        Ok(results)
    }
}

/// Extracts organic result links from a DuckDuckGo HTML results page.
///
/// Redirect links (`/l/?uddg=...`) are unwrapped to their target, ads and non-http links are
/// skipped, duplicate targets are collapsed and missing titles become `"No title"`.
pub fn parse_results(html: &str, limit: usize) -> Vec<SearchResult> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a.result__a") else {
        return Vec::new();
    };

    let mut results: Vec<SearchResult> = Vec::new();
    for anchor in document.select(&selector) {
        if results.len() >= limit {
            break;
        }

        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(target) = resolve_result_url(href) else {
            debug!(href = %href, "Skipping unusable result link");
            continue;
        };
        if results.iter().any(|r| r.url == target) {
            continue;
        }

        let title = anchor
            .text()
            .collect::<Vec<_>>()
            .join(" ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        let title = if title.is_empty() {
            NO_TITLE.to_string()
        } else {
            title
        };

        results.push(SearchResult { url: target, title });
    }

    results
}

fn resolve_result_url(href: &str) -> Option<String> {
    let base = Url::parse(DUCKDUCKGO_BASE).ok()?;
    let url = base.join(href).ok()?;

    let is_ddg = url
        .host_str()
        .is_some_and(|h| h == "duckduckgo.com" || h.ends_with(".duckduckgo.com"));

    let target = if is_ddg {
        if url.path() != "/l/" {
            return None;
        }
        let (_, uddg) = url.query_pairs().find(|(k, _)| k == "uddg")?;
        Url::parse(&uddg).ok()?
    } else {
        url
    };

    matches!(target.scheme(), "http" | "https").then(|| target.to_string())
}

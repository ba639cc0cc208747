use thiserror::Error;

/// Per-URL scrape failure. Logged and dropped by the coordinator, never propagated.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("request to {url} failed: {reason}")]
    RequestFailed { url: String, reason: String },

    #[error("{url} returned HTTP {status}")]
    BadStatus { url: String, status: u16 },

    #[error("request to {url} timed out after {secs}s")]
    Timeout { url: String, secs: u64 },

    #[error("{url} is behind a paywall")]
    Paywalled { url: String },

    #[error("no paragraph text found at {url}")]
    EmptyContent { url: String },
}

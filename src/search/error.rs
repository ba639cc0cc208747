use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request failed: {reason}")]
    RequestFailed { reason: String },

    #[error("search backend returned HTTP {status}")]
    BadStatus { status: u16 },

    #[error("search timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("invalid search endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}

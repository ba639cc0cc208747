//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `NEWSCHECK_*` environment variables; the
//! embedding key is read from the conventional `OPENAI_API_KEY`.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_FILTER_THRESHOLD, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_NUM_RESULTS, DEFAULT_TOP_K,
};

/// Default DuckDuckGo HTML endpoint used when `NEWSCHECK_SEARCH_ENDPOINT` is not set.
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://html.duckduckgo.com/html/";

/// Default OpenAI-compatible API base for the embedding service.
pub const DEFAULT_EMBEDDING_API_BASE: &str = "https://api.openai.com/v1";

pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

pub const DEFAULT_REPORT_MODEL: &str = "gpt-4o-mini";

/// Application configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `NEWSCHECK_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Directory of the persistent embedding index. Default: `./.index`.
    pub index_path: PathBuf,

    /// BERT encoder directory (`config.json`, `model.safetensors`, `tokenizer.json`).
    /// Unset runs the reranker on the deterministic stub encoder.
    pub encoder_path: Option<PathBuf>,

    /// OpenAI-compatible embeddings API base URL.
    pub embedding_api_base: String,

    /// Embedding model name sent to the embeddings API.
    pub embedding_model: String,

    /// API key for the embedding service. Unset selects the stub embedder.
    pub api_key: Option<String>,

    /// Search backend endpoint.
    pub search_endpoint: String,

    /// Number of search results requested per claim. Default: `3`.
    pub num_results: usize,

    /// Timeout applied to every outbound HTTP call. Default: `30`.
    pub http_timeout_secs: u64,

    /// Model used for report generation. Default: `gpt-4o-mini`.
    pub report_model: String,

    /// Passages handed to report generation. Default: `5`.
    pub top_k: usize,

    /// Similarity filter threshold. Default: `0.75`.
    pub filter_threshold: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            index_path: PathBuf::from("./.index"),
            encoder_path: None,
            embedding_api_base: DEFAULT_EMBEDDING_API_BASE.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            api_key: None,
            search_endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            num_results: DEFAULT_NUM_RESULTS,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            report_model: DEFAULT_REPORT_MODEL.to_string(),
            top_k: DEFAULT_TOP_K,
            filter_threshold: DEFAULT_FILTER_THRESHOLD,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "NEWSCHECK_PORT";
    const ENV_BIND_ADDR: &'static str = "NEWSCHECK_BIND_ADDR";
    const ENV_INDEX_PATH: &'static str = "NEWSCHECK_INDEX_PATH";
    const ENV_ENCODER_PATH: &'static str = "NEWSCHECK_ENCODER_PATH";
    const ENV_EMBEDDING_API_BASE: &'static str = "NEWSCHECK_EMBEDDING_API_BASE";
    const ENV_EMBEDDING_MODEL: &'static str = "NEWSCHECK_EMBEDDING_MODEL";
    const ENV_API_KEY: &'static str = "OPENAI_API_KEY";
    const ENV_SEARCH_ENDPOINT: &'static str = "NEWSCHECK_SEARCH_ENDPOINT";
    const ENV_NUM_RESULTS: &'static str = "NEWSCHECK_NUM_RESULTS";
    const ENV_HTTP_TIMEOUT_SECS: &'static str = "NEWSCHECK_HTTP_TIMEOUT_SECS";
    const ENV_REPORT_MODEL: &'static str = "NEWSCHECK_REPORT_MODEL";
    const ENV_TOP_K: &'static str = "NEWSCHECK_TOP_K";
    const ENV_FILTER_THRESHOLD: &'static str = "NEWSCHECK_FILTER_THRESHOLD";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let index_path = Self::parse_path_from_env(Self::ENV_INDEX_PATH, defaults.index_path);
        let encoder_path = Self::parse_optional_path_from_env(Self::ENV_ENCODER_PATH);
        let embedding_api_base =
            Self::parse_string_from_env(Self::ENV_EMBEDDING_API_BASE, defaults.embedding_api_base);
        let embedding_model =
            Self::parse_string_from_env(Self::ENV_EMBEDDING_MODEL, defaults.embedding_model);
        let api_key = Self::parse_optional_string_from_env(Self::ENV_API_KEY);
        let search_endpoint =
            Self::parse_string_from_env(Self::ENV_SEARCH_ENDPOINT, defaults.search_endpoint);
        let num_results = Self::parse_usize_from_env(Self::ENV_NUM_RESULTS, defaults.num_results);
        let http_timeout_secs =
            Self::parse_u64_from_env(Self::ENV_HTTP_TIMEOUT_SECS, defaults.http_timeout_secs);
        let report_model =
            Self::parse_string_from_env(Self::ENV_REPORT_MODEL, defaults.report_model);
        let top_k = Self::parse_usize_from_env(Self::ENV_TOP_K, defaults.top_k);
        let filter_threshold = Self::parse_threshold_from_env(defaults.filter_threshold)?;

        Ok(Self {
            port,
            bind_addr,
            index_path,
            encoder_path,
            embedding_api_base,
            embedding_model,
            api_key,
            search_endpoint,
            num_results,
            http_timeout_secs,
            report_model,
            top_k,
            filter_threshold,
        })
    }

    /// Validates paths and basic invariants (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.index_path.exists() && !self.index_path.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.index_path.clone(),
            });
        }

        if let Some(ref path) = self.encoder_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        if self.num_results == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_NUM_RESULTS,
                reason: "must be at least 1".to_string(),
            });
        }

        if self.top_k == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_TOP_K,
                reason: "must be at least 1".to_string(),
            });
        }

        if self.http_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_HTTP_TIMEOUT_SECS,
                reason: "must be at least 1 second".to_string(),
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Timeout applied to outbound HTTP calls.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_threshold_from_env(default: f32) -> Result<f32, ConfigError> {
        match env::var(Self::ENV_FILTER_THRESHOLD) {
            Ok(value) => {
                let threshold: f32 =
                    value
                        .trim()
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue {
                            name: Self::ENV_FILTER_THRESHOLD,
                            reason: format!("'{value}' is not a number"),
                        })?;

                if !(-1.0..=1.0).contains(&threshold) {
                    return Err(ConfigError::InvalidValue {
                        name: Self::ENV_FILTER_THRESHOLD,
                        reason: format!("{threshold} is outside [-1, 1]"),
                    });
                }

                Ok(threshold)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        Self::parse_optional_string_from_env(var_name).map(PathBuf::from)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_u64_from_env(var_name: &str, default: u64) -> u64 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn parse_usize_from_env(var_name: &str, default: usize) -> usize {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }
}

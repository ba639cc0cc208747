use std::time::Duration;

use crate::constants::{
    DEFAULT_RERANK_BATCH_SIZE, DEFAULT_RERANK_TIMEOUT_SECS, DEFAULT_WINDOW_STRIDE,
    DEFAULT_WINDOW_WORDS, RERANK_WORKERS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RerankConfig {
    /// Words per window. The encoder truncates each window to its token limit.
    pub window_words: usize,
    /// Words between consecutive window starts.
    pub window_stride: usize,
    /// Chunks scored per blocking task.
    pub batch_size: usize,
    /// Concurrent scoring tasks.
    pub workers: usize,
    /// Deadline for one whole rerank call.
    pub timeout: Duration,
}

impl Default for RerankConfig {
    fn default() -> Self {
        Self {
            window_words: DEFAULT_WINDOW_WORDS,
            window_stride: DEFAULT_WINDOW_STRIDE,
            batch_size: DEFAULT_RERANK_BATCH_SIZE,
            workers: RERANK_WORKERS,
            timeout: Duration::from_secs(DEFAULT_RERANK_TIMEOUT_SECS),
        }
    }
}

impl RerankConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.window_words == 0 {
            return Err("window_words must be greater than 0".to_string());
        }
        if self.window_stride == 0 {
            return Err("window_stride must be greater than 0".to_string());
        }
        if self.batch_size == 0 {
            return Err("batch_size must be greater than 0".to_string());
        }
        if self.workers == 0 {
            return Err("workers must be greater than 0".to_string());
        }
        if self.timeout.is_zero() {
            return Err("timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}

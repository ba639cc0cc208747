use std::sync::atomic::{AtomicUsize, Ordering};

use super::{SearchError, SearchResult, WebSearch};

/// Canned search backend.
#[derive(Debug, Default)]
pub struct MockSearchBackend {
    results: Vec<SearchResult>,
    fail_with: Option<String>,
    calls: AtomicUsize,
}

impl MockSearchBackend {
    pub fn new(results: Vec<SearchResult>) -> Self {
        Self {
            results,
            ..Default::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Every call fails with `SearchError::RequestFailed { reason }`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            fail_with: Some(reason.into()),
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl WebSearch for MockSearchBackend {
    async fn search(
        &self,
        _query: &str,
        num_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(ref reason) = self.fail_with {
            return Err(SearchError::RequestFailed {
                reason: reason.clone(),
            });
        }

        Ok(self.results.iter().take(num_results).cloned().collect())
    }
}

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::{EmbeddingError, StubEmbedder, TextEmbedder};

/// Stub-backed embedder that counts calls and can be switched into failure.
#[derive(Debug, Default)]
pub struct MockEmbedder {
    inner: StubEmbedder,
    document_calls: AtomicUsize,
    query_calls: AtomicUsize,
    texts_embedded: AtomicUsize,
    fail: AtomicBool,
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dimension(dim: usize) -> Self {
        Self {
            inner: StubEmbedder::new(dim),
            ..Default::default()
        }
    }

    /// Makes every subsequent call fail with `RequestFailed`.
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Total calls of either kind.
    pub fn call_count(&self) -> usize {
        self.document_calls.load(Ordering::SeqCst) + self.query_calls.load(Ordering::SeqCst)
    }

    pub fn document_calls(&self) -> usize {
        self.document_calls.load(Ordering::SeqCst)
    }

    pub fn texts_embedded(&self) -> usize {
        self.texts_embedded.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> Result<(), EmbeddingError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(EmbeddingError::RequestFailed {
                reason: "mock embedding service unavailable".to_string(),
            });
        }
        Ok(())
    }
}

impl TextEmbedder for MockEmbedder {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.document_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        self.texts_embedded.fetch_add(texts.len(), Ordering::SeqCst);
        Ok(texts.iter().map(|t| self.inner.embed(t)).collect())
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        Ok(self.inner.embed(text))
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }
}

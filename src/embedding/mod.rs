//! Text embedding.
//!
//! - [`TextEmbedder`] is the async seam used by the index and the similarity filter.
//! - [`Embedder`] selects the remote OpenAI-compatible backend or the offline stub.
//! - [`SentenceEncoder`] is the local BERT encoder scored by the reranker.

/// BERT `[CLS]` encoder.
pub mod bert;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
pub mod encoder;
mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod remote;
pub mod stub;
/// Tokenizer loading helpers.
pub mod utils;

#[cfg(test)]
mod tests;

pub use encoder::{EncoderConfig, SentenceEncoder};
pub use error::EmbeddingError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbedder;
pub use remote::RemoteEmbedder;
pub use stub::StubEmbedder;

use tracing::warn;

use crate::config::Config;

/// Async text embedding.
pub trait TextEmbedder: Send + Sync {
    /// One vector per input text, in input order.
    fn embed_documents(
        &self,
        texts: &[String],
    ) -> impl std::future::Future<Output = Result<Vec<Vec<f32>>, EmbeddingError>> + Send;

    fn embed_query(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<Vec<f32>, EmbeddingError>> + Send;

    /// Expected output width.
    fn dimension(&self) -> usize;
}

/// Embedding backend chosen from configuration.
#[derive(Debug, Clone)]
pub enum Embedder {
    Remote(RemoteEmbedder),
    Stub(StubEmbedder),
}

impl Embedder {
    /// Remote when an API key is configured, stub otherwise.
    pub fn from_config(config: &Config) -> Result<Self, EmbeddingError> {
        match config.api_key {
            Some(ref key) => Ok(Self::Remote(RemoteEmbedder::new(
                &config.embedding_api_base,
                &config.embedding_model,
                key,
                config.http_timeout(),
            )?)),
            None => {
                warn!("OPENAI_API_KEY not set, using stub embeddings");
                Ok(Self::Stub(StubEmbedder::default()))
            }
        }
    }

    pub fn is_stub(&self) -> bool {
        matches!(self, Self::Stub(_))
    }
}

impl TextEmbedder for Embedder {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        match self {
            Self::Remote(e) => e.embed_documents(texts).await,
            Self::Stub(e) => e.embed_documents(texts).await,
        }
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        match self {
            Self::Remote(e) => e.embed_query(text).await,
            Self::Stub(e) => e.embed_query(text).await,
        }
    }

    fn dimension(&self) -> usize {
        match self {
            Self::Remote(e) => e.dimension(),
            Self::Stub(e) => e.dimension(),
        }
    }
}

impl<T: TextEmbedder> TextEmbedder for std::sync::Arc<T> {
    fn embed_documents(
        &self,
        texts: &[String],
    ) -> impl std::future::Future<Output = Result<Vec<Vec<f32>>, EmbeddingError>> + Send {
        (**self).embed_documents(texts)
    }

    fn embed_query(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<Vec<f32>, EmbeddingError>> + Send {
        (**self).embed_query(text)
    }

    fn dimension(&self) -> usize {
        (**self).dimension()
    }
}

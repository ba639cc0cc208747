//! Persistent embedding index with dense (MMR) and sparse (BM25) retrieval.
//!
//! Records are appended to disk and mirrored in memory. All appends go through one async
//! writer lock, so concurrent queries sharing an `Arc<EmbeddingIndex>` never interleave
//! partial writes. Appends are not deduplicated: adding the same chunks twice stores them
//! twice.

pub mod bm25;
pub mod error;
pub mod mmr;
pub mod model;
pub mod store;


pub use bm25::Bm25Index;
pub use error::{IndexError, IndexResult};
pub use mmr::maximal_marginal_relevance;
pub use model::IndexRecord;
pub use store::DiskStore;

use std::path::PathBuf;

use half::f16;
use parking_lot::RwLock;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::chunking::Chunk;
use crate::constants::{DEFAULT_FETCH_K, DEFAULT_MMR_LAMBDA};
use crate::embedding::TextEmbedder;
use crate::similarity::{cosine_similarity_f16_f32, f16_to_f32_vec, f32_to_f16_vec};

/// Collection directory used by the pipeline.
pub const DEFAULT_COLLECTION: &str = "news_chunks";

#[derive(Debug, Clone)]
struct IndexedChunk {
    chunk: Chunk,
    /// Kept at storage precision; widened only for the MMR candidate pool.
    vector: Vec<f16>,
}

#[derive(Debug, Default)]
struct IndexState {
    entries: Vec<IndexedChunk>,
    dim: Option<usize>,
    next_sequence: u64,
}

/// Embedding index shared process-wide behind an `Arc`.
pub struct EmbeddingIndex<E> {
    embedder: E,
    store: DiskStore,
    state: RwLock<IndexState>,
    writer: Mutex<()>,
}

impl<E> std::fmt::Debug for EmbeddingIndex<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("EmbeddingIndex")
            .field("path", &self.store.collection_path())
            .field("entries", &state.entries.len())
            .field("dim", &state.dim)
            .finish()
    }
}

impl<E: TextEmbedder> EmbeddingIndex<E> {
    /// Opens (or creates) the collection under `root` and loads existing records.
    pub fn open(
        root: impl Into<PathBuf>,
        collection: &str,
        embedder: E,
    ) -> IndexResult<Self> {
        let store = DiskStore::new(root, collection);
        store.ensure_dir()?;

        let mut state = IndexState::default();
        for record in store.load_all()? {
            let Some(vector) = record.halves() else {
                warn!(
                    id = %record.id,
                    bytes = record.embedding.len(),
                    "Skipping record with malformed embedding"
                );
                continue;
            };
            match state.dim {
                Some(dim) if dim != vector.len() => {
                    return Err(IndexError::DimensionMismatch {
                        expected: dim,
                        actual: vector.len(),
                    });
                }
                _ => state.dim = Some(vector.len()),
            }
            state.next_sequence = state.next_sequence.max(record.sequence + 1);
            state.entries.push(IndexedChunk {
                chunk: record.to_chunk(),
                vector,
            });
        }

        info!(
            path = %store.collection_path().display(),
            entries = state.entries.len(),
            dim = ?state.dim,
            "Embedding index opened"
        );

        Ok(Self {
            embedder,
            store,
            state: RwLock::new(state),
            writer: Mutex::new(()),
        })
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored vector width, once the first record exists.
    pub fn dimension(&self) -> Option<usize> {
        self.state.read().dim
    }

    /// Embeds `texts` with the index's embedder.
    pub async fn embed(&self, texts: &[String]) -> IndexResult<Vec<Vec<f32>>> {
        Ok(self.embedder.embed_documents(texts).await?)
    }

    /// Embeds and appends `chunks`; returns the number appended.
    pub async fn add(&self, chunks: &[Chunk]) -> IndexResult<usize> {
        if chunks.is_empty() {
            return Ok(0);
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let vectors = self.embed(&texts).await?;
        if vectors.len() != chunks.len() {
            return Err(IndexError::VectorCountMismatch {
                expected: chunks.len(),
                actual: vectors.len(),
            });
        }

        let _guard = self.writer.lock().await;

        let (expected_dim, first_sequence) = {
            let state = self.state.read();
            (state.dim, state.next_sequence)
        };
        let dim = expected_dim.unwrap_or(vectors[0].len());
        if let Some(bad) = vectors.iter().find(|v| v.len() != dim || v.is_empty()) {
            return Err(IndexError::DimensionMismatch {
                expected: dim,
                actual: bad.len(),
            });
        }

        // Reserve the sequence range before writing so a partial write never hands the
        // same numbers to the next append.
        self.state.write().next_sequence = first_sequence + chunks.len() as u64;

        let now = chrono::Utc::now().timestamp();
        let records: Vec<IndexRecord> = chunks
            .iter()
            .zip(vectors.iter())
            .enumerate()
            .map(|(i, (chunk, vector))| {
                IndexRecord::new(
                    uuid::Uuid::new_v4().to_string(),
                    first_sequence + i as u64,
                    now,
                    chunk,
                    vector,
                )
            })
            .collect();

        let store = self.store.clone();
        tokio::task::spawn_blocking(move || -> IndexResult<()> {
            for record in &records {
                store.write(record)?;
            }
            Ok(())
        })
        .await
        .map_err(|e| IndexError::WriteTaskFailed {
            reason: e.to_string(),
        })??;

        let mut state = self.state.write();
        state.dim = Some(dim);
        for (chunk, vector) in chunks.iter().zip(&vectors) {
            state.entries.push(IndexedChunk {
                chunk: chunk.clone(),
                vector: f32_to_f16_vec(vector),
            });
        }

        debug!(added = chunks.len(), total = state.entries.len(), "Appended chunks to index");
        Ok(chunks.len())
    }

    /// MMR search over the whole index with default `fetch_k` and `lambda`.
    pub async fn dense_retrieve_default(&self, query: &str, k: usize) -> IndexResult<Vec<Chunk>> {
        self.dense_retrieve(query, k, DEFAULT_FETCH_K, DEFAULT_MMR_LAMBDA)
            .await
    }

    /// Fetches the `fetch_k` nearest chunks, then selects `k` of them by maximal marginal
    /// relevance (`lambda = 1.0` pure relevance, `0.0` pure diversity).
    pub async fn dense_retrieve(
        &self,
        query: &str,
        k: usize,
        fetch_k: usize,
        lambda: f32,
    ) -> IndexResult<Vec<Chunk>> {
        if k == 0 || self.is_empty() {
            return Ok(Vec::new());
        }

        let query_vector = self.embedder.embed_query(query).await?;

        let state = self.state.read();
        if let Some(dim) = state.dim
            && dim != query_vector.len()
        {
            return Err(IndexError::DimensionMismatch {
                expected: dim,
                actual: query_vector.len(),
            });
        }

        let mut nearest: Vec<(usize, f32)> = state
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (i, cosine_similarity_f16_f32(&entry.vector, &query_vector)))
            .collect();
        nearest.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        nearest.truncate(fetch_k.max(k));

        let pool: Vec<Vec<f32>> = nearest
            .iter()
            .map(|(i, _)| f16_to_f32_vec(&state.entries[*i].vector))
            .collect();
        let picked = maximal_marginal_relevance(&query_vector, &pool, k, lambda);

        let results: Vec<Chunk> = picked
            .into_iter()
            .map(|p| state.entries[nearest[p].0].chunk.clone())
            .collect();

        debug!(k, fetch_k, returned = results.len(), "Dense retrieval complete");
        Ok(results)
    }

    /// BM25 over `chunks` only (not the persistent store); returns `min(k, chunks.len())`.
    pub fn sparse_retrieve(&self, chunks: &[Chunk], query: &str, k: usize) -> Vec<Chunk> {
        sparse_retrieve(chunks, query, k)
    }
}

/// BM25 top-`k` over an ephemeral corpus.
pub fn sparse_retrieve(chunks: &[Chunk], query: &str, k: usize) -> Vec<Chunk> {
    let texts: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
    let index = Bm25Index::new(&texts);
    let results: Vec<Chunk> = index
        .top_k(query, k)
        .into_iter()
        .map(|i| chunks[i].clone())
        .collect();

    debug!(k, corpus = chunks.len(), returned = results.len(), "Sparse retrieval complete");
    results
}

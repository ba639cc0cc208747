//! On-disk record format.

use half::f16;
use rkyv::{Archive, Deserialize, Serialize};

use crate::chunking::{Chunk, ChunkMetadata};
use crate::similarity::{bytes_to_f16_slice, bytes_to_f16_vec, f16_to_f32_vec, f32_to_f16_bytes};

/// One indexed chunk persisted as `rkyv` bytes.
#[derive(Archive, Deserialize, Serialize, Debug, PartialEq, Clone)]
pub struct IndexRecord {
    /// Random UUID; also the file stem.
    pub id: String,
    /// Monotonic insertion counter, restores append order on load.
    pub sequence: u64,
    /// Unix timestamp (seconds) of the append.
    pub indexed_at: i64,
    pub content: String,
    pub title: String,
    pub url: String,
    pub source: String,
    /// Embedding bytes (little-endian f16).
    pub embedding: Vec<u8>,
}

impl IndexRecord {
    pub fn new(id: String, sequence: u64, indexed_at: i64, chunk: &Chunk, vector: &[f32]) -> Self {
        Self {
            id,
            sequence,
            indexed_at,
            content: chunk.content.clone(),
            title: chunk.metadata.title.clone(),
            url: chunk.metadata.url.clone(),
            source: chunk.metadata.source.clone(),
            embedding: f32_to_f16_bytes(vector),
        }
    }

    pub fn to_chunk(&self) -> Chunk {
        Chunk {
            content: self.content.clone(),
            metadata: ChunkMetadata {
                title: self.title.clone(),
                url: self.url.clone(),
                source: self.source.clone(),
            },
        }
    }

    /// Stored embedding at storage precision. `None` when the byte length is odd.
    pub fn halves(&self) -> Option<Vec<f16>> {
        #[cfg(target_endian = "little")]
        if let Some(halves) = bytes_to_f16_slice(&self.embedding) {
            return Some(halves.to_vec());
        }
        bytes_to_f16_vec(&self.embedding)
    }

    /// Stored embedding widened to f32.
    pub fn vector(&self) -> Option<Vec<f32>> {
        self.halves().map(|v| f16_to_f32_vec(&v))
    }

    pub fn dimension(&self) -> usize {
        self.embedding.len() / 2
    }
}

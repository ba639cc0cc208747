use std::sync::Arc;

use tempfile::TempDir;

use super::*;
use crate::chunking::ChunkMetadata;
use crate::embedding::StubEmbedder;

fn chunk(url: &str, content: &str) -> Chunk {
    Chunk::new(content, ChunkMetadata::web_scrape("title", url))
}

#[test]
fn test_rrf_sums_contributions_for_shared_chunk() {
    let a = chunk("https://a.example", "alpha");
    let b = chunk("https://b.example", "beta");
    let c = chunk("https://c.example", "gamma");

    let dense = vec![a.clone(), b.clone()];
    let sparse = vec![b.clone(), c.clone()];
    let fused = reciprocal_rank_fusion(&[(dense.as_slice(), 0.7), (sparse.as_slice(), 0.3)], 60.0);

    assert_eq!(fused.len(), 3);
    assert_eq!(fused[0].chunk, b);
    let expected_b = 0.7 / 62.0 + 0.3 / 61.0;
    assert!((fused[0].score - expected_b).abs() < 1e-6);
    assert_eq!(fused[1].chunk, a);
    assert_eq!(fused[2].chunk, c);
}

#[test]
fn test_rrf_never_duplicates() {
    let shared = chunk("https://a.example", "same text");
    let dense = vec![shared.clone()];
    let sparse = vec![shared.clone(), shared.clone()];

    let fused = reciprocal_rank_fusion(&[(dense.as_slice(), 0.7), (sparse.as_slice(), 0.3)], 60.0);
    assert_eq!(fused.len(), 1);
}

#[test]
fn test_rrf_ties_keep_dense_order() {
    let a = chunk("https://a.example", "alpha");
    let b = chunk("https://b.example", "beta");

    let dense = vec![a.clone()];
    let sparse = vec![b.clone()];
    let fused = reciprocal_rank_fusion(&[(dense.as_slice(), 0.5), (sparse.as_slice(), 0.5)], 60.0);

    assert_eq!(fused[0].chunk, a);
    assert_eq!(fused[1].chunk, b);
}

#[test]
fn test_same_text_different_url_kept_apart() {
    let dense = vec![chunk("https://a.example", "wire copy")];
    let sparse = vec![chunk("https://b.example", "wire copy")];

    let fused = reciprocal_rank_fusion(&[(dense.as_slice(), 0.7), (sparse.as_slice(), 0.3)], 60.0);
    assert_eq!(fused.len(), 2);
}

#[test]
fn test_config_validation() {
    assert!(RetrievalConfig::default().validate().is_ok());

    let bad = RetrievalConfig {
        fetch_k: 1,
        dense_k: 3,
        ..Default::default()
    };
    assert!(bad.validate().is_err());

    let bad = RetrievalConfig {
        mmr_lambda: 1.5,
        ..Default::default()
    };
    assert!(bad.validate().is_err());
}

#[tokio::test]
async fn test_three_single_chunk_articles_fuse_to_three() {
    let dir = TempDir::new().unwrap();
    let index = Arc::new(EmbeddingIndex::open(dir.path(), "test", StubEmbedder::new(64)).unwrap());

    let chunks = vec![
        chunk("https://a.example", "The sky looked green during the storm"),
        chunk("https://b.example", "Experts say the sky is blue on clear days"),
        chunk("https://c.example", "Photographers capture rare green flash at sunset"),
    ];
    index.add(&chunks).await.unwrap();

    let retriever = EnsembleRetriever::new(Arc::clone(&index), RetrievalConfig::default());
    let fused = retriever.retrieve("The sky is green", &chunks).await.unwrap();

    assert_eq!(fused.len(), 3);
    let mut fingerprints: Vec<u64> = fused.iter().map(|s| s.chunk.fingerprint()).collect();
    fingerprints.sort_unstable();
    fingerprints.dedup();
    assert_eq!(fingerprints.len(), 3);
    assert!(fused.windows(2).all(|w| w[0].score >= w[1].score));
}

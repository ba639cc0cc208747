use std::path::PathBuf;

use super::*;
use crate::similarity::cosine_similarity;

#[test]
fn test_stub_is_deterministic_and_normalized() {
    let embedder = StubEmbedder::new(64);
    let a = embedder.embed("The sky is blue");
    let b = embedder.embed("The sky is blue");

    assert_eq!(a, b);
    assert_eq!(a.len(), 64);
    let norm: f32 = a.iter().map(|v| v * v).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() < 1e-4);
}

#[test]
fn test_stub_ignores_case_and_punctuation() {
    let embedder = StubEmbedder::new(64);
    assert_eq!(embedder.embed("Sky, blue!"), embedder.embed("sky blue"));
}

#[test]
fn test_stub_shared_vocabulary_scores_higher() {
    let embedder = StubEmbedder::new(256);
    let query = embedder.embed("sky colour blue atmosphere");
    let related = embedder.embed("the blue colour of the sky comes from the atmosphere");
    let unrelated = embedder.embed("quarterly earnings beat analyst forecasts");

    assert!(cosine_similarity(&query, &related) > cosine_similarity(&query, &unrelated));
}

#[test]
fn test_stub_empty_text_is_zero_vector() {
    let v = StubEmbedder::new(16).embed("  ...  ");
    assert!(v.iter().all(|x| *x == 0.0));
}

#[tokio::test]
async fn test_embedder_trait_preserves_order() {
    let embedder = Embedder::Stub(StubEmbedder::new(32));
    let texts = vec!["alpha".to_string(), "beta".to_string()];

    let docs = embedder.embed_documents(&texts).await.unwrap();
    let query = embedder.embed_query("beta").await.unwrap();

    assert_eq!(docs.len(), 2);
    assert_eq!(docs[1], query);
    assert!(embedder.is_stub());
    assert_eq!(embedder.dimension(), 32);
}

#[test]
fn test_embedder_from_config_without_key_is_stub() {
    let config = crate::config::Config::default();
    let embedder = Embedder::from_config(&config).unwrap();
    assert!(embedder.is_stub());
}

#[test]
fn test_embedder_from_config_with_key_is_remote() {
    let config = crate::config::Config {
        api_key: Some("sk-test".to_string()),
        ..Default::default()
    };
    let embedder = Embedder::from_config(&config).unwrap();
    assert!(!embedder.is_stub());
}

#[test]
fn test_parse_embedding_response_orders_by_index() {
    let json = serde_json::json!({
        "data": [
            { "index": 1, "embedding": [2.0, 3.0] },
            { "index": 0, "embedding": [0.5, 1.5] }
        ]
    });
    let parsed = remote::parse_embedding_response(json).unwrap();
    assert_eq!(parsed, vec![vec![0.5, 1.5], vec![2.0, 3.0]]);
}

#[test]
fn test_parse_embedding_response_rejects_malformed() {
    let missing = serde_json::json!({ "object": "list" });
    assert!(matches!(
        remote::parse_embedding_response(missing),
        Err(EmbeddingError::InvalidResponse { .. })
    ));

    let non_numeric = serde_json::json!({ "data": [{ "index": 0, "embedding": ["x"] }] });
    assert!(remote::parse_embedding_response(non_numeric).is_err());
}

#[tokio::test]
async fn test_remote_embedder_empty_input_skips_request() {
    let embedder = RemoteEmbedder::new(
        "http://127.0.0.1:9",
        "text-embedding-3-small",
        "sk-test",
        std::time::Duration::from_secs(1),
    )
    .unwrap();

    assert!(embedder.embed_documents(&[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_mock_embedder_counts_and_fails() {
    let embedder = MockEmbedder::with_dimension(8);
    embedder
        .embed_documents(&["a".to_string(), "b".to_string()])
        .await
        .unwrap();
    embedder.embed_query("a").await.unwrap();

    assert_eq!(embedder.call_count(), 2);
    assert_eq!(embedder.texts_embedded(), 2);

    embedder.set_failing(true);
    assert!(embedder.embed_query("a").await.is_err());
}

#[test]
fn test_encoder_stub_mode() {
    let encoder = SentenceEncoder::load(EncoderConfig::stub()).unwrap();
    assert!(encoder.is_stub());
    assert_eq!(encoder.dimension(), 768);

    let vectors = encoder.encode_batch(&["one", "two"]).unwrap();
    assert_eq!(vectors.len(), 2);
    assert_eq!(vectors[0], encoder.encode("one").unwrap());
}

#[test]
fn test_encoder_missing_model_files() {
    let dir = tempfile::tempdir().unwrap();
    let err = SentenceEncoder::load(EncoderConfig::new(dir.path())).unwrap_err();
    assert!(matches!(err, EmbeddingError::ModelLoadFailed { .. }));
    assert!(err.to_string().contains("config.json"));
}

#[test]
fn test_encoder_config_validation() {
    assert!(EncoderConfig::default().validate().is_ok());
    assert!(EncoderConfig::new(PathBuf::new()).validate().is_err());

    let zero = EncoderConfig {
        max_seq_len: 0,
        ..Default::default()
    };
    assert!(zero.validate().is_err());
}

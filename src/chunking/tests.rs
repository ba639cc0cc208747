use super::*;

fn sample_text(len: usize) -> String {
    (0..len)
        .map(|i| char::from(b'a' + (i % 26) as u8))
        .collect()
}

#[test]
fn test_empty_input_yields_no_chunks() {
    let chunker = Chunker::default();
    assert!(chunker.split("").is_empty());
    assert!(chunker.split("   \n\t ").is_empty());
}

#[test]
fn test_short_input_is_single_trimmed_chunk() {
    let chunker = Chunker::default();
    let chunks = chunker.split("  The sky is blue.  ");
    assert_eq!(chunks, vec!["The sky is blue.".to_string()]);
}

#[test]
fn test_exact_chunk_size_is_single_chunk() {
    let chunker = Chunker::default();
    let text = sample_text(512);
    assert_eq!(chunker.split(&text), vec![text]);
}

#[test]
fn test_chunks_respect_size_limit() {
    let chunker = Chunker::default();
    let chunks = chunker.split(&sample_text(2000));

    assert!(chunks.len() > 1);
    for chunk in &chunks {
        assert!(chunk.chars().count() <= 512);
    }
}

#[test]
fn test_adjacent_chunks_share_overlap() {
    let chunker = Chunker::default();
    let chunks = chunker.split(&sample_text(1500));

    for pair in chunks.windows(2) {
        let prev: Vec<char> = pair[0].chars().collect();
        let next: Vec<char> = pair[1].chars().collect();
        let tail: String = prev[prev.len() - 200..].iter().collect();
        let head: String = next[..200].iter().collect();
        assert_eq!(tail, head);
    }
}

#[test]
fn test_chunks_cover_entire_text() {
    let chunker = Chunker::default();
    let text = sample_text(1300);
    let chunks = chunker.split(&text);

    let mut rebuilt: String = chunks[0].clone();
    for chunk in &chunks[1..] {
        rebuilt.extend(chunk.chars().skip(200));
    }
    assert_eq!(rebuilt, text);
}

#[test]
fn test_multibyte_characters_not_split() {
    let chunker = Chunker::new(ChunkerConfig::new(4, 1));
    let chunks = chunker.split("héllo wörld");

    assert_eq!(chunks[0], "héll");
    assert_eq!(chunks[1], "lo w");
    for chunk in &chunks {
        assert!(chunk.chars().count() <= 4);
    }
}

#[test]
fn test_deterministic() {
    let chunker = Chunker::default();
    let text = sample_text(3000);
    assert_eq!(chunker.split(&text), chunker.split(&text));
}

#[test]
fn test_chunk_article_attaches_metadata() {
    let chunker = Chunker::default();
    let article = ScrapedArticle {
        url: "https://news.example/a".to_string(),
        title: "Headline".to_string(),
        content: "Body text.".to_string(),
    };

    let chunks = chunker.chunk_article(&article);
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].metadata.title, "Headline");
    assert_eq!(chunks[0].metadata.url, "https://news.example/a");
    assert_eq!(chunks[0].metadata.source, "Web scrape");
}

#[test]
fn test_config_validation() {
    assert!(ChunkerConfig::default().validate().is_ok());
    assert!(ChunkerConfig::new(0, 0).validate().is_err());
    assert!(ChunkerConfig::new(100, 100).validate().is_err());
    assert_eq!(ChunkerConfig::default().step(), 312);
}

#[test]
fn test_tokenize_lowercases_and_splits_on_punctuation() {
    assert_eq!(
        tokenize("The Sky's colour: BLUE-ish, 2024!"),
        vec!["the", "sky", "s", "colour", "blue", "ish", "2024"]
    );
    assert!(tokenize(" ,.; ").is_empty());
}

use super::*;

const RESULTS_PAGE: &str = r#"
<html><body>
  <div class="result results_links results_links_deep web-result">
    <h2 class="result__title">
      <a rel="nofollow" class="result__a"
         href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.reuters.com%2Fscience%2Fsky%2D2024%2F&amp;rut=abc">
        Why the sky is <b>blue</b>
      </a>
    </h2>
  </div>
  <div class="result result--ad">
    <a class="result__a" href="https://duckduckgo.com/y.js?ad_provider=bing&amp;u3=x">Buy sky paint</a>
  </div>
  <div class="result">
    <a class="result__a" href="https://apnews.com/article/sky-color"></a>
  </div>
  <div class="result">
    <a class="result__a" href="https://apnews.com/article/sky-color">Duplicate</a>
  </div>
  <div class="result">
    <a class="result__a" href="javascript:void(0)">Broken</a>
  </div>
  <div class="result">
    <a class="result__a" href="https://www.bbc.com/news/sky">BBC on the sky</a>
  </div>
</body></html>
"#;

#[test]
fn test_parse_unwraps_redirect_links() {
    let results = parse_results(RESULTS_PAGE, 10);
    assert_eq!(results[0].url, "https://www.reuters.com/science/sky-2024/");
    assert_eq!(results[0].title, "Why the sky is blue");
}

#[test]
fn test_parse_skips_ads_duplicates_and_non_http() {
    let results = parse_results(RESULTS_PAGE, 10);
    let urls: Vec<&str> = results.iter().map(|r| r.url.as_str()).collect();

    assert_eq!(
        urls,
        vec![
            "https://www.reuters.com/science/sky-2024/",
            "https://apnews.com/article/sky-color",
            "https://www.bbc.com/news/sky",
        ]
    );
}

#[test]
fn test_parse_missing_title_uses_fallback() {
    let results = parse_results(RESULTS_PAGE, 10);
    assert_eq!(results[1].title, "No title");
}

#[test]
fn test_parse_respects_limit_and_order() {
    let results = parse_results(RESULTS_PAGE, 2);
    assert_eq!(results.len(), 2);
    assert!(results[0].url.contains("reuters"));
    assert!(results[1].url.contains("apnews"));
}

#[test]
fn test_parse_no_matches_is_empty() {
    assert!(parse_results("<html><body><p>No results.</p></body></html>", 3).is_empty());
    assert!(parse_results("", 3).is_empty());
}

#[test]
fn test_invalid_endpoint_rejected() {
    let err = DuckDuckGoSearch::new("not a url", std::time::Duration::from_secs(1)).unwrap_err();
    assert!(matches!(err, SearchError::InvalidEndpoint { .. }));
}

#[tokio::test]
async fn test_mock_backend_truncates_and_counts() {
    let backend = MockSearchBackend::new(vec![
        SearchResult::new("https://a.example", "A"),
        SearchResult::new("https://b.example", "B"),
    ]);

    let results = backend.search("claim", 1).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(backend.call_count(), 1);
}

#[tokio::test]
async fn test_mock_backend_failure() {
    let backend = MockSearchBackend::failing("connection refused");
    let err = backend.search("claim", 3).await.unwrap_err();
    assert!(err.to_string().contains("connection refused"));
}

//! Anthropic summarizer against a mock Messages API

use sumi_scout::config::SummarizerConfig;
use sumi_scout::summarizer::{AnthropicSummarizer, Summarizer, SummarizerError};
use sumi_scout::{NormalizedUrl, PageRecord, UrlGuard};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> SummarizerConfig {
    SummarizerConfig {
        api_base: format!("{}/v1", server.uri()),
        model: "test-model".to_string(),
        ..Default::default()
    }
}

fn sample_pages() -> (NormalizedUrl, Vec<PageRecord>) {
    let origin = UrlGuard::strict().normalize("https://example.com").unwrap();
    let about = UrlGuard::strict()
        .normalize("https://example.com/about")
        .unwrap();
    let pages = vec![
        PageRecord::new(origin.clone(), "Home", "Example builds rockets."),
        PageRecord::new(about, "About", "Founded in 2001."),
    ];
    (origin, pages)
}

#[tokio::test]
async fn test_summarize_sends_headers_and_model() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "test-key"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(serde_json::json!({
            "model": "test-model",
            "max_tokens": 2048
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "content": [{"type": "text", "text": "Example is a rocket company."}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let summarizer = AnthropicSummarizer::new("test-key", &config_for(&mock_server)).unwrap();
    let (origin, pages) = sample_pages();

    let summary = summarizer.summarize(&pages, &origin).await.unwrap();
    assert_eq!(summary, "Example is a rocket company.");
}

#[tokio::test]
async fn test_answer_includes_question_in_prompt() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(body_partial_json(serde_json::json!({ "max_tokens": 3072 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "content": [{"type": "text", "text": "It was founded in 2001."}]
        })))
        .mount(&mock_server)
        .await;

    let summarizer = AnthropicSummarizer::new("test-key", &config_for(&mock_server)).unwrap();
    let (origin, pages) = sample_pages();

    let answer = summarizer
        .answer("When was it founded?", &pages, &origin)
        .await
        .unwrap();
    assert_eq!(answer, "It was founded in 2001.");

    let requests = mock_server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("When was it founded?"));
    assert!(body.contains("Founded in 2001."));
}

#[tokio::test]
async fn test_api_error_status_is_reported() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&mock_server)
        .await;

    let summarizer = AnthropicSummarizer::new("test-key", &config_for(&mock_server)).unwrap();
    let (origin, pages) = sample_pages();

    match summarizer.summarize(&pages, &origin).await {
        Err(SummarizerError::Api { status, body }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "overloaded");
        }
        other => panic!("expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_response_without_text_is_empty() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "content": []
        })))
        .mount(&mock_server)
        .await;

    let summarizer = AnthropicSummarizer::new("test-key", &config_for(&mock_server)).unwrap();
    let (origin, pages) = sample_pages();

    let result = summarizer.summarize(&pages, &origin).await;
    assert!(matches!(result, Err(SummarizerError::EmptyResponse)));
}

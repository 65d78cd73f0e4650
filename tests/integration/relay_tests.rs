//! End-to-end request flows through the relay against a mock site

use crate::common::{drain, fast_settings, http_crawler, mount_site, CannedSummarizer};
use std::sync::Arc;
use std::time::Duration;
use sumi_scout::protocol::{ProtocolEvent, SummaryPayload};
use sumi_scout::relay::Relay;
use sumi_scout::{EventChannel, SessionStore, UrlGuard};
use wiremock::MockServer;

fn relay_with_summarizer() -> Relay {
    let sessions = Arc::new(SessionStore::new(Duration::from_secs(30 * 60)));
    Relay::new(http_crawler(fast_settings()), sessions)
        .with_guard(UrlGuard::permissive())
        .with_summarizer(Arc::new(CannedSummarizer))
}

fn scrape_frame(url: &str, max_pages: u32) -> String {
    serde_json::json!({
        "type": "start_scrape",
        "data": { "url": url, "maxPages": max_pages }
    })
    .to_string()
}

fn chat_frame(question: &str, session_id: &str) -> String {
    serde_json::json!({
        "type": "chat_question",
        "data": { "question": question, "sessionId": session_id }
    })
    .to_string()
}

fn single_summary(events: &[ProtocolEvent]) -> SummaryPayload {
    let summaries: Vec<&SummaryPayload> = events
        .iter()
        .filter_map(|e| match e {
            ProtocolEvent::Summary(s) => Some(s),
            _ => None,
        })
        .collect();
    assert_eq!(summaries.len(), 1, "events: {:?}", events);
    summaries[0].clone()
}

#[tokio::test]
async fn test_scrape_then_chat() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server, 10).await;
    let relay = relay_with_summarizer();
    let (channel, mut events) = EventChannel::open("relay-e2e");

    relay
        .dispatch(&channel, &scrape_frame(&mock_server.uri(), 3))
        .await;
    let scrape_events = drain(&mut events);

    // Progress never goes backwards and ends with the summary
    let progress: Vec<u8> = scrape_events
        .iter()
        .filter_map(|e| match e {
            ProtocolEvent::StatusUpdate(s) => Some(s.progress),
            _ => None,
        })
        .collect();
    assert!(progress.windows(2).all(|w| w[0] <= w[1]), "{:?}", progress);
    assert_eq!(progress.first(), Some(&0));
    assert_eq!(progress.last(), Some(&95));
    assert!(matches!(scrape_events.last(), Some(ProtocolEvent::Summary(_))));
    assert!(!scrape_events
        .iter()
        .any(|e| matches!(e, ProtocolEvent::Error(_))));

    let summary = single_summary(&scrape_events);
    assert_eq!(summary.pages_analyzed, 3);
    assert!(summary.summary.contains("covering 3 pages"));
    assert!(summary.summary.contains("**Model:** canned-model"));
    let session_id = summary.session_id.expect("summary carries a session id");
    assert!(session_id.starts_with("session_"));
    assert_eq!(relay.sessions().count(), 1);

    relay
        .dispatch(&channel, &chat_frame("What is on page 2?", &session_id))
        .await;
    let chat_events = drain(&mut events);

    let answers: Vec<&str> = chat_events
        .iter()
        .filter_map(|e| match e {
            ProtocolEvent::ChatResponse(r) => Some(r.answer.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(answers, vec!["'What is on page 2?' answered from 3 pages"]);
}

#[tokio::test]
async fn test_scrape_without_summarizer_lists_pages() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server, 3).await;
    let sessions = Arc::new(SessionStore::new(Duration::from_secs(60)));
    let relay = Relay::new(http_crawler(fast_settings()), sessions)
        .with_guard(UrlGuard::permissive());
    let (channel, mut events) = EventChannel::open("relay-fallback");

    relay
        .dispatch(&channel, &scrape_frame(&mock_server.uri(), 5))
        .await;
    let scrape_events = drain(&mut events);

    let summary = single_summary(&scrape_events);
    assert_eq!(summary.pages_analyzed, 3);
    assert!(summary.summary.starts_with("Successfully crawled 3 page(s):"));
    let session_id = summary.session_id.expect("fallback summary carries a session id");

    // Follow-up questions need a summarizer
    relay
        .dispatch(&channel, &chat_frame("Anything?", &session_id))
        .await;
    let chat_events = drain(&mut events);
    assert_eq!(chat_events.len(), 1);
    match &chat_events[0] {
        ProtocolEvent::Error(e) => assert_eq!(e.message, "AI service is not available"),
        other => panic!("expected error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_scrape_of_dead_site_reports_one_error() {
    let mock_server = MockServer::start().await;
    let uri = mock_server.uri();
    drop(mock_server);

    let relay = relay_with_summarizer();
    let (channel, mut events) = EventChannel::open("relay-dead");

    relay.dispatch(&channel, &scrape_frame(&uri, 3)).await;
    let events = drain(&mut events);

    let errors: Vec<&str> = events
        .iter()
        .filter_map(|e| match e {
            ProtocolEvent::Error(e) => Some(e.message.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("No pages could be crawled"));
    assert!(!events.iter().any(|e| matches!(e, ProtocolEvent::Summary(_))));
    assert_eq!(relay.sessions().count(), 0);
}

#[tokio::test]
async fn test_strict_relay_rejects_loopback_targets() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server, 2).await;
    let sessions = Arc::new(SessionStore::new(Duration::from_secs(60)));
    let relay = Relay::new(http_crawler(fast_settings()), sessions);
    let (channel, mut events) = EventChannel::open("relay-strict");

    relay
        .dispatch(&channel, &scrape_frame(&mock_server.uri(), 2))
        .await;
    let events = drain(&mut events);

    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], ProtocolEvent::Error(_)));
    assert!(mock_server.received_requests().await.unwrap_or_default().is_empty());
}

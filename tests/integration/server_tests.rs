//! HTTP and WebSocket surface over a live listener

use crate::common::{fast_settings, http_crawler};
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use sumi_scout::protocol::ProtocolEvent;
use sumi_scout::relay::Relay;
use sumi_scout::server::{router, AppState};
use sumi_scout::SessionStore;
use tokio_tungstenite::tungstenite::Message;

/// Serves a strict relay on an ephemeral port
async fn spawn_server() -> SocketAddr {
    let sessions = Arc::new(SessionStore::new(Duration::from_secs(60)));
    let relay = Relay::new(http_crawler(fast_settings()), sessions);
    let app = router(
        AppState::new(relay),
        &["http://localhost:3000".to_string()],
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn next_event<S>(stream: &mut S) -> ProtocolEvent
where
    S: futures::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(5), stream.next())
            .await
            .expect("timed out waiting for event")
            .expect("socket closed")
            .expect("socket error");
        if let Message::Text(text) = frame {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

#[tokio::test]
async fn test_websocket_welcome_and_invalid_frame() {
    let addr = spawn_server().await;
    let (socket, _) = tokio_tungstenite::connect_async(format!("ws://{}/ws", addr))
        .await
        .unwrap();
    let (mut sink, mut stream) = socket.split();

    match next_event(&mut stream).await {
        ProtocolEvent::StatusUpdate(s) => {
            assert_eq!(s.message, "Connected to Web Research Agent");
            assert_eq!(s.progress, 0);
        }
        other => panic!("expected welcome status, got {:?}", other),
    }

    sink.send(Message::Text("not json".to_string())).await.unwrap();
    match next_event(&mut stream).await {
        ProtocolEvent::Error(e) => assert_eq!(e.message, "Invalid message format"),
        other => panic!("expected error, got {:?}", other),
    }

    let chat = serde_json::json!({
        "type": "chat_question",
        "data": { "question": "Hello?", "sessionId": "session_unknown" }
    });
    sink.send(Message::Text(chat.to_string())).await.unwrap();
    match next_event(&mut stream).await {
        ProtocolEvent::Error(e) => {
            assert_eq!(e.message, "Session expired. Please analyze a new website.")
        }
        other => panic!("expected error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_root_path_also_upgrades() {
    let addr = spawn_server().await;
    let (socket, _) = tokio_tungstenite::connect_async(format!("ws://{}/", addr))
        .await
        .unwrap();
    let (_sink, mut stream) = socket.split();
    assert!(matches!(
        next_event(&mut stream).await,
        ProtocolEvent::StatusUpdate(_)
    ));
}

#[tokio::test]
async fn test_health_reports_counts() {
    let addr = spawn_server().await;
    let body: serde_json::Value = reqwest::get(format!("http://{}/health", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "ok");
    assert_eq!(body["activeSessions"], 0);
    assert_eq!(body["websocketConnections"], 0);
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_scrape_endpoint_validates_requests() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();
    let endpoint = format!("http://{}/api/scrape", addr);

    let accepted = client
        .post(&endpoint)
        .json(&serde_json::json!({ "url": "example.com", "maxPages": 3 }))
        .send()
        .await
        .unwrap();
    assert_eq!(accepted.status(), reqwest::StatusCode::ACCEPTED);
    let body: serde_json::Value = accepted.json().await.unwrap();
    assert_eq!(body["status"], "started");
    assert_eq!(body["url"], "https://example.com/");
    assert_eq!(body["maxPages"], 3);
    assert!(body["sessionId"].as_str().unwrap().starts_with("session_"));

    let private = client
        .post(&endpoint)
        .json(&serde_json::json!({ "url": "http://192.168.1.10/" }))
        .send()
        .await
        .unwrap();
    assert_eq!(private.status(), reqwest::StatusCode::BAD_REQUEST);

    let too_many = client
        .post(&endpoint)
        .json(&serde_json::json!({ "url": "https://example.com", "maxPages": 500 }))
        .send()
        .await
        .unwrap();
    assert_eq!(too_many.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = too_many.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("maxPages"));

    let malformed = client
        .post(&endpoint)
        .header("content-type", "application/json")
        .body("{")
        .send()
        .await
        .unwrap();
    assert_eq!(malformed.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let addr = spawn_server().await;
    let response = reqwest::get(format!("http://{}/nope", addr)).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Not found");
    assert_eq!(body["path"], "/nope");
}

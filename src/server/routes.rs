//! Plain HTTP routes: health probe, scrape validation, not-found fallback

use super::AppState;
use crate::protocol::ScrapeRequest;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::atomic::Ordering;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub websocket_connections: usize,
    pub active_sessions: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeAccepted {
    pub session_id: String,
    pub status: &'static str,
    pub url: String,
    pub max_pages: u32,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: chrono::Utc::now().to_rfc3339(),
        websocket_connections: state.connections.load(Ordering::SeqCst),
        active_sessions: state.relay.sessions().count(),
    })
}

/// `POST /api/scrape`
///
/// Validates the request and echoes the normalized target. The crawl itself is
/// started over the WebSocket.
pub async fn scrape(
    State(state): State<AppState>,
    payload: Result<Json<ScrapeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ScrapeAccepted>), (StatusCode, Json<ErrorBody>)> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!("Rejected scrape body: {}", rejection.body_text());
        bad_request("Invalid request", Some(rejection.body_text()))
    })?;

    let admitted = state.relay.admit(&request).map_err(|e| {
        tracing::debug!("Rejected scrape of '{}': {}", request.url, e);
        bad_request(e.to_string(), None)
    })?;

    Ok((
        StatusCode::ACCEPTED,
        Json(ScrapeAccepted {
            session_id: format!("session_{}", uuid::Uuid::new_v4().simple()),
            status: "started",
            url: admitted.url.to_string(),
            max_pages: admitted.max_pages,
        }),
    ))
}

pub async fn not_found(uri: Uri) -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": "Not found", "path": uri.path()})),
    )
}

fn bad_request(message: impl Into<String>, details: Option<String>) -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: message.into(),
            details,
        }),
    )
}

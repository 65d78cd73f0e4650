//! Wire messages exchanged over the WebSocket
//!
//! Every frame is a JSON envelope `{"type": ..., "data": {...}}`. Payload fields
//! use camelCase on the wire.

use serde::{Deserialize, Serialize};

/// Server-to-client event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ProtocolEvent {
    StatusUpdate(StatusUpdate),
    Summary(SummaryPayload),
    ChatResponse(ChatResponse),
    Error(ErrorPayload),
}

impl ProtocolEvent {
    /// Wire name of the event type
    pub fn kind(&self) -> &'static str {
        match self {
            Self::StatusUpdate(_) => "status_update",
            Self::Summary(_) => "summary",
            Self::ChatResponse(_) => "chat_response",
            Self::Error(_) => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub message: String,
    /// Percentage in 0..=100
    pub progress: u8,
    /// URL being worked on, empty when none
    #[serde(default)]
    pub current_page: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryPayload {
    pub summary: String,
    pub pages_analyzed: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
}

/// Client-to-server message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ClientMessage {
    StartScrape(ScrapeRequest),
    ChatQuestion(ChatRequest),
}

/// Request to crawl and summarize a site
///
/// Also the body of `POST /api/scrape`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequest {
    pub url: String,
    /// Signed so out-of-range values reach validation instead of failing to parse
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<i64>,
}

/// Follow-up question about a previously crawled site
///
/// Both fields are optional at the parsing level; the relay rejects blank ones
/// with a dedicated error.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

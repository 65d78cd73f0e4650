//! Bidirectional event protocol
//!
//! # Components
//!
//! - `ProtocolEvent` / `ClientMessage`: typed envelopes for both directions
//! - `EventChannel`: fire-and-forget outbound queue for one client
//! - `InboundHandler` + `demultiplex`: routes a raw inbound frame to its handler

mod channel;
mod messages;

pub use channel::EventChannel;
pub use messages::{
    ChatRequest, ChatResponse, ClientMessage, ErrorPayload, ProtocolEvent, ScrapeRequest,
    StatusUpdate, SummaryPayload,
};

use crate::ScoutError;
use async_trait::async_trait;

/// Receives parsed client messages
#[async_trait]
pub trait InboundHandler: Send + Sync {
    /// Handles a request to crawl and summarize a site
    async fn on_start_scrape(&self, channel: &EventChannel, request: ScrapeRequest);

    /// Handles a follow-up question
    async fn on_chat_question(&self, channel: &EventChannel, request: ChatRequest);
}

/// Parses one inbound frame and routes it to `handler`
///
/// Frames that are not valid JSON or carry an unknown type get a single Error
/// event ("Invalid message format") and are otherwise ignored.
pub async fn demultiplex<H>(channel: &EventChannel, raw: &str, handler: &H)
where
    H: InboundHandler + ?Sized,
{
    let message = match serde_json::from_str::<ClientMessage>(raw) {
        Ok(message) => message,
        Err(e) => {
            let error = ScoutError::Protocol(e.to_string());
            tracing::warn!("Invalid message from client {}: {}", channel.client_id(), e);
            channel.error(error.to_string());
            return;
        }
    };

    match message {
        ClientMessage::StartScrape(request) => handler.on_start_scrape(channel, request).await,
        ClientMessage::ChatQuestion(request) => handler.on_chat_question(channel, request).await,
    }
}

use super::messages::{ChatResponse, ErrorPayload, ProtocolEvent, StatusUpdate, SummaryPayload};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Outbound event stream for one connected client
///
/// Sending never blocks and never fails: once the client's transport is gone the
/// receiving half is dropped and further events are discarded. Cloning yields
/// another handle onto the same client.
#[derive(Debug, Clone)]
pub struct EventChannel {
    client_id: Arc<str>,
    tx: UnboundedSender<ProtocolEvent>,
}

impl EventChannel {
    /// Opens a channel for a client
    ///
    /// The receiver is drained by the transport writer; dropping it closes the
    /// channel.
    pub fn open(client_id: impl Into<Arc<str>>) -> (Self, UnboundedReceiver<ProtocolEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                client_id: client_id.into(),
                tx,
            },
            rx,
        )
    }

    /// A channel whose transport is already closed
    pub fn detached(client_id: impl Into<Arc<str>>) -> Self {
        let (channel, _rx) = Self::open(client_id);
        channel
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns true while the transport still accepts events
    pub fn is_open(&self) -> bool {
        !self.tx.is_closed()
    }

    /// Queues an event for delivery; dropped silently if the client is gone
    pub fn send(&self, event: ProtocolEvent) {
        let kind = event.kind();
        if self.tx.send(event).is_err() {
            tracing::debug!(
                "Dropping {} event for disconnected client {}",
                kind,
                self.client_id
            );
        }
    }

    pub fn status(&self, message: impl Into<String>, progress: u8, current_page: impl Into<String>) {
        self.send(ProtocolEvent::StatusUpdate(StatusUpdate {
            message: message.into(),
            progress,
            current_page: current_page.into(),
        }));
    }

    pub fn summary(&self, summary: String, pages_analyzed: usize, session_id: Option<String>) {
        self.send(ProtocolEvent::Summary(SummaryPayload {
            summary,
            pages_analyzed,
            session_id,
        }));
    }

    pub fn chat_response(&self, answer: String) {
        self.send(ProtocolEvent::ChatResponse(ChatResponse { answer }));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.send(ProtocolEvent::Error(ErrorPayload {
            message: message.into(),
        }));
    }
}

//! WebSocket transport
//!
//! Each connection gets an `EventChannel`. A writer task drains the channel into
//! the socket while the reader loop hands every inbound frame to the relay in its
//! own task, so a long crawl never blocks chat questions on the same connection.

use super::AppState;
use crate::protocol::EventChannel;
use crate::state::progress::ACCEPTED;
use crate::ScoutError;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use std::sync::atomic::Ordering;

pub async fn upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let client_id = uuid::Uuid::new_v4().to_string();
    let active = state.connections.fetch_add(1, Ordering::SeqCst) + 1;
    tracing::info!("Client {} connected ({} active)", client_id, active);

    let (mut sink, mut stream) = socket.split();
    let (channel, mut events) = EventChannel::open(client_id.as_str());

    let writer_id = client_id.clone();
    let writer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!("Failed to encode event for {}: {}", writer_id, e);
                    continue;
                }
            };
            if sink.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    channel.status("Connected to Web Research Agent", ACCEPTED, "");

    while let Some(frame) = stream.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Binary(bytes)) => match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(_) => {
                    channel.error(ScoutError::Protocol("binary frame".to_string()).to_string());
                    continue;
                }
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                tracing::warn!("WebSocket error for client {}: {}", client_id, e);
                break;
            }
        };

        let relay = state.relay.clone();
        let channel = channel.clone();
        tokio::spawn(async move {
            relay.dispatch(&channel, &text).await;
        });
    }

    // Dropping the writer closes the channel; in-flight requests keep running
    // and their remaining events are discarded.
    writer.abort();
    let active = state.connections.fetch_sub(1, Ordering::SeqCst) - 1;
    tracing::info!("Client {} disconnected ({} active)", client_id, active);
}

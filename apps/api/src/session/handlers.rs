//! WebSocket entry point for chat sessions.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::session::error::SessionError;
use crate::session::protocol::ServerMessage;
use crate::session::router::SessionRouter;
use crate::state::AppState;

const OUTBOUND_CAPACITY: usize = 32;

#[derive(Debug, Deserialize)]
pub struct ChatQuery {
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

/// GET /api/chat?sessionId=…
///
/// Upgrades to a WebSocket bound to the session's actor. Without a session id
/// a random one is minted, which can never be reconnected to.
pub async fn handle_chat_upgrade(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(query): Query<ChatQuery>,
) -> impl IntoResponse {
    let session_id = resolve_session_id(query.session_id);
    let sessions = state.sessions.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, sessions, session_id))
}

fn resolve_session_id(requested: Option<String>) -> String {
    match requested.map(|id| id.trim().to_string()) {
        Some(id) if !id.is_empty() => id,
        _ => {
            let minted = Uuid::new_v4().to_string();
            warn!(session_id = %minted, "No sessionId supplied; minted one that cannot be resumed");
            minted
        }
    }
}

async fn handle_socket(socket: WebSocket, sessions: SessionRouter, session_id: String) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<ServerMessage>(OUTBOUND_CAPACITY);

    // Writer: everything the actor emits goes out in emission order.
    let send_task = tokio::spawn(async move {
        while let Some(message) = outbound_rx.recv().await {
            let json = match serde_json::to_string(&message) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize outbound message: {e}");
                    continue;
                }
            };
            if ws_tx.send(Message::Text(json)).await.is_err() {
                debug!("WebSocket send failed, client disconnected");
                break;
            }
        }
        let _ = ws_tx.close().await;
    });

    let (handle, connection) = match sessions.connect(&session_id, outbound_tx.clone()).await {
        Ok(attached) => attached,
        Err(e) => {
            error!(session_id = %session_id, "Failed to attach connection: {e}");
            let _ = outbound_tx.send(ServerMessage::error(e.to_string())).await;
            drop(outbound_tx);
            let _ = send_task.await;
            return;
        }
    };
    // The actor holds its own sender; ours must not keep the writer alive.
    let outbound = outbound_tx.downgrade();
    drop(outbound_tx);
    debug!(session_id = %session_id, instance = handle.instance(), connection, "WebSocket attached");

    while let Some(result) = ws_rx.next().await {
        let message = match result {
            Ok(message) => message,
            Err(e) => {
                warn!(session_id = %session_id, "WebSocket error: {e}");
                break;
            }
        };
        let frame = match frame_text(message) {
            FrameText::Frame(text) => text,
            FrameText::Invalid(e) => {
                warn!(session_id = %session_id, "Rejected frame: {e}");
                // Earlier replies are already queued, so order is kept.
                let Some(tx) = outbound.upgrade() else { break };
                if tx.send(ServerMessage::error(e.to_string())).await.is_err() {
                    break;
                }
                continue;
            }
            FrameText::Skip => continue,
            FrameText::Close => {
                debug!(session_id = %session_id, "Client sent close frame");
                break;
            }
        };

        // Waiting here keeps the next frame unread until this one is handled.
        if let Err(e) = handle.deliver(connection, frame).await {
            info!(session_id = %session_id, "Stopping reader: {e}");
            break;
        }
    }

    handle.disconnect(connection).await;
    let _ = send_task.await;
    info!(session_id = %session_id, connection, "WebSocket connection closed");
}

enum FrameText {
    Frame(String),
    Invalid(SessionError),
    Skip,
    Close,
}

fn frame_text(message: Message) -> FrameText {
    match message {
        Message::Text(text) => FrameText::Frame(text),
        Message::Binary(bytes) => match String::from_utf8(bytes) {
            Ok(text) => FrameText::Frame(text),
            Err(_) => FrameText::Invalid(SessionError::InvalidUtf8),
        },
        Message::Close(_) => FrameText::Close,
        Message::Ping(_) | Message::Pong(_) => FrameText::Skip,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_frames_must_be_utf8() {
        assert!(matches!(
            frame_text(Message::Binary(b"{\"type\":\"chat\"}".to_vec())),
            FrameText::Frame(text) if text == r#"{"type":"chat"}"#
        ));
        assert!(matches!(
            frame_text(Message::Binary(vec![0x7b, 0xff, 0xfe, 0x7d])),
            FrameText::Invalid(SessionError::InvalidUtf8)
        ));
    }

    #[test]
    fn test_control_frames_are_not_delivered() {
        assert!(matches!(frame_text(Message::Ping(vec![1])), FrameText::Skip));
        assert!(matches!(frame_text(Message::Close(None)), FrameText::Close));
        assert!(matches!(
            frame_text(Message::Text("hello".to_string())),
            FrameText::Frame(text) if text == "hello"
        ));
    }

    #[test]
    fn test_supplied_session_id_is_kept() {
        assert_eq!(resolve_session_id(Some("abc-123".to_string())), "abc-123");
        assert_eq!(resolve_session_id(Some("  abc-123 ".to_string())), "abc-123");
    }

    #[test]
    fn test_missing_or_blank_session_id_is_minted() {
        let minted = resolve_session_id(None);
        assert!(Uuid::parse_str(&minted).is_ok());

        let blank = resolve_session_id(Some("   ".to_string()));
        assert!(Uuid::parse_str(&blank).is_ok());
        assert_ne!(minted, blank);
    }

    #[test]
    fn test_chat_query_reads_camel_case() {
        let query: ChatQuery = serde_json::from_str(r#"{"sessionId": "s-1"}"#).unwrap();
        assert_eq!(query.session_id.as_deref(), Some("s-1"));
    }
}

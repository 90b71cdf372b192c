//! WebSocket connection loop for the invalidation feed.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use crate::domain::ViewInvalidation;

/// Runs the write loop for one feed connection.
///
/// Forwards every [`ViewInvalidation`] from the broadcast channel as a
/// JSON text frame. The read side is drained only to observe the close
/// handshake; inbound text is ignored.
pub async fn run_connection(socket: WebSocket, mut rx: broadcast::Receiver<ViewInvalidation>) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(_)) => break,
                    _ => {}
                }
            }
            invalidation = rx.recv() => {
                match invalidation {
                    Ok(invalidation) => {
                        let json = serde_json::to_string(&invalidation).unwrap_or_default();
                        if ws_tx.send(Message::text(json)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "ws client lagged behind invalidation feed");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!("ws connection closed");
}

//! WebSocket handler for the realtime chat channel.
//!
//! The `/ws` endpoint upgrades an HTTP connection to a WebSocket. Once
//! connected, the handler:
//!
//! - **Registers a session:** The connection gets a fresh id and an
//!   unbounded outbound mailbox in the [`SessionRegistry`].
//! - **Delivers fan-out:** Every event the broker drops into the mailbox
//!   is pushed to the client as a JSON text frame.
//! - **Receives events:** Incoming text frames are parsed as
//!   [`ClientEvent`] and dispatched to the broker one at a time, in order.
//!
//! Malformed frames are logged and ignored; they never tear down the
//! session. Disconnecting removes the session from the registry -- peers
//! in the room are not notified of the departure.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use roomee_core::realtime::ConnectionId;
use roomee_types::event::ClientEvent;

use crate::state::AppState;

/// Upgrade an HTTP request to the chat WebSocket.
///
/// This is mounted at `/ws` in the router.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_connection(socket, state))
}

/// Core WebSocket connection handler.
///
/// Uses `tokio::select!` to multiplex between draining the session's
/// outbound mailbox and processing inbound frames from the client. This
/// keeps both halves in a single task; the persistence calls inside
/// `dispatch` are the only suspension points, and they stall only this
/// connection's pending event.
async fn handle_connection(socket: WebSocket, state: AppState) {
    let conn = ConnectionId::new();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel();
    state.registry.register(conn, outbound_tx);

    let (mut ws_sender, mut ws_receiver) = socket.split();

    loop {
        tokio::select! {
            // --- Branch 1: Deliver room fan-out to this client ---
            event = outbound_rx.recv() => {
                match event {
                    Some(event) => {
                        match serde_json::to_string(&event) {
                            Ok(json) => {
                                if ws_sender.send(Message::Text(json.into())).await.is_err() {
                                    // Client disconnected
                                    break;
                                }
                            }
                            Err(err) => {
                                tracing::warn!(%conn, "failed to serialize server event: {err}");
                            }
                        }
                    }
                    // Mailbox sender dropped (session replaced)
                    None => break,
                }
            }

            // --- Branch 2: Process events from the client ---
            frame = ws_receiver.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientEvent>(&text) {
                            Ok(event) => state.broker.dispatch(conn, event).await,
                            Err(err) => {
                                tracing::warn!(
                                    %conn,
                                    raw = %text,
                                    error = %err,
                                    "ignoring malformed chat event"
                                );
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        // Client disconnected
                        break;
                    }
                    Some(Err(err)) => {
                        tracing::debug!(%conn, "WebSocket receive error: {err}");
                        break;
                    }
                    // Ignore binary, ping, pong protocol frames (handled by axum/tungstenite)
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    state.registry.unregister(conn);
    tracing::debug!(%conn, "chat connection closed");
}

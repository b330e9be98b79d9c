//! Realtime chat broker.
//!
//! One dispatch function keyed by event kind, operating on session state
//! looked up in the registry by connection id -- the connection object
//! itself carries no mutable chat state. Sends persist first and fan out
//! on success; history replays go to the requester only. A failure in one
//! room's processing never touches another room's state.

use std::sync::Arc;

use roomee_types::event::{ClientEvent, ServerEvent};
use roomee_types::message::MessagePayload;
use roomee_types::room::RoomKey;
use tracing::{debug, warn};

use crate::message::{MessageRepository, MessageService};
use crate::realtime::registry::{ConnectionId, SessionRegistry};

/// Failure notice for a send that could not be persisted.
const SEND_FAILED: &str = "Failed to send message";

/// Failure notice for a history replay that could not be served.
const HISTORY_FAILED: &str = "Failed to load chat history";

/// Routes inbound client events to persistence and fans resulting state
/// out to the sessions subscribed to the affected room.
pub struct ChatBroker<R: MessageRepository> {
    registry: Arc<SessionRegistry>,
    messages: Arc<MessageService<R>>,
}

impl<R: MessageRepository> ChatBroker<R> {
    /// Create a broker over the given registry and message service.
    pub fn new(registry: Arc<SessionRegistry>, messages: Arc<MessageService<R>>) -> Self {
        Self { registry, messages }
    }

    /// Access the session registry.
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Access the message service.
    pub fn messages(&self) -> &MessageService<R> {
        &self.messages
    }

    /// Handle one inbound event for `conn`.
    ///
    /// Persistence calls are the only suspension points; an event for one
    /// connection never blocks the processing of another connection's
    /// events.
    pub async fn dispatch(&self, conn: ConnectionId, event: ClientEvent) {
        match event {
            ClientEvent::JoinRoom {
                user_id,
                other_user_id,
            } => {
                // Ids are recorded as-is; no reply on join.
                self.registry.join(conn, &user_id, &other_user_id);
            }
            ClientEvent::SendMessage {
                content,
                to_user_id,
            } => {
                self.handle_send(conn, &content, &to_user_id).await;
            }
            ClientEvent::LoadHistory {
                user_id,
                other_user_id,
            } => {
                self.handle_load_history(conn, &user_id, &other_user_id).await;
            }
        }
    }

    /// Persist a send and broadcast it to the room, sender included.
    ///
    /// The sender identity comes from the session's last join, never from
    /// the frame. The room is recomputed from `(fromUserId, toUserId)` at
    /// send time, so it may differ from the session's joined room.
    async fn handle_send(&self, conn: ConnectionId, content: &str, to_user_id: &str) {
        let from_user_id = self.registry.identity_of(conn).unwrap_or_default();
        let room = RoomKey::for_pair(&from_user_id, to_user_id);

        match self.messages.send(&from_user_id, to_user_id, content).await {
            Ok(message) => {
                let delivered = self
                    .registry
                    .broadcast(&room, ServerEvent::ReceiveMessage(message.into()));
                debug!(%conn, room = %room, delivered, "message broadcast");
            }
            Err(err) if err.is_validation() => {
                self.registry.send_to(conn, ServerEvent::error(err.to_string()));
            }
            Err(err) => {
                warn!(%conn, room = %room, error = %err, "failed to persist message");
                self.registry.send_to(conn, ServerEvent::error(SEND_FAILED));
            }
        }
    }

    /// Replay the full ordered conversation to the requester only.
    async fn handle_load_history(&self, conn: ConnectionId, user_id: &str, other_user_id: &str) {
        match self.messages.conversation(user_id, other_user_id).await {
            Ok(messages) => {
                let messages = messages.into_iter().map(MessagePayload::from).collect();
                self.registry
                    .send_to(conn, ServerEvent::ChatHistory { messages });
            }
            Err(err) if err.is_validation() => {
                self.registry.send_to(conn, ServerEvent::error(err.to_string()));
            }
            Err(err) => {
                warn!(%conn, error = %err, "failed to load history");
                self.registry.send_to(conn, ServerEvent::error(HISTORY_FAILED));
            }
        }
    }
}

//! Chat message types for the roomee messaging service.
//!
//! `ChatMessage` is the stored shape; `MessagePayload` is the external wire
//! shape shared verbatim by the realtime broadcast, history replay, and the
//! pull query, so every surface serializes a conversation identically.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted chat message between two platform users.
///
/// Immutable once stored except for the `read` flag. `id` is store-assigned
/// and strictly increasing; together with `sent_at` it forms the total order
/// history queries rely on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub sender_id: String,
    pub recipient_id: String,
    pub content: String,
    pub sent_at: DateTime<Utc>,
    pub read: bool,
}

/// External representation of a chat message.
///
/// Field names match the platform's client contract: `fromUserId`,
/// `toUserId`, `date`. Consumers treat `id` as an opaque ordering token
/// in combination with `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePayload {
    pub id: i64,
    pub content: String,
    pub from_user_id: String,
    pub to_user_id: String,
    pub date: DateTime<Utc>,
    pub read: bool,
}

impl From<ChatMessage> for MessagePayload {
    fn from(msg: ChatMessage) -> Self {
        Self {
            id: msg.id,
            content: msg.content,
            from_user_id: msg.sender_id,
            to_user_id: msg.recipient_id,
            date: msg.sent_at,
            read: msg.read,
        }
    }
}

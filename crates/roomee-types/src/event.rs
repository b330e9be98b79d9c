//! Realtime event types exchanged over the chat WebSocket.
//!
//! Clients send JSON text frames tagged by `type` (`joinRoom`, `sendMessage`,
//! `loadHistory`); the server replies with `receiveMessage`, `chatHistory`,
//! or `error` frames in the same tagged form.

use serde::{Deserialize, Serialize};

use crate::message::MessagePayload;

/// Inbound event from a connected chat client.
///
/// Unknown or malformed frames are logged and ignored by the connection
/// handler; they never tear down the session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Join the conversation room shared with another user.
    #[serde(rename_all = "camelCase")]
    JoinRoom {
        user_id: String,
        other_user_id: String,
    },

    /// Send a message to another user. The sender identity is taken from
    /// the session, never from the frame.
    #[serde(rename_all = "camelCase")]
    SendMessage { content: String, to_user_id: String },

    /// Request the full ordered history shared with another user.
    #[serde(rename_all = "camelCase")]
    LoadHistory {
        user_id: String,
        other_user_id: String,
    },
}

/// Outbound event from the server to a connected chat client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerEvent {
    /// A newly persisted message, fanned out to every session in the room.
    ReceiveMessage(MessagePayload),

    /// Full ordered conversation history, sent to the requester only.
    ChatHistory { messages: Vec<MessagePayload> },

    /// A human-readable failure notice, sent to the originator only.
    Error { message: String },
}

impl ServerEvent {
    /// Build an `Error` event from any displayable failure.
    pub fn error(message: impl Into<String>) -> Self {
        ServerEvent::Error {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_join_room_parses() {
        let event: ClientEvent =
            serde_json::from_str(r#"{"type":"joinRoom","userId":"1","otherUserId":"2"}"#).unwrap();
        assert_eq!(
            event,
            ClientEvent::JoinRoom {
                user_id: "1".to_string(),
                other_user_id: "2".to_string(),
            }
        );
    }

    #[test]
    fn test_send_message_parses() {
        let event: ClientEvent =
            serde_json::from_str(r#"{"type":"sendMessage","content":"hi","toUserId":"2"}"#)
                .unwrap();
        assert_eq!(
            event,
            ClientEvent::SendMessage {
                content: "hi".to_string(),
                to_user_id: "2".to_string(),
            }
        );
    }

    #[test]
    fn test_load_history_parses() {
        let event: ClientEvent =
            serde_json::from_str(r#"{"type":"loadHistory","userId":"1","otherUserId":"2"}"#)
                .unwrap();
        assert!(matches!(event, ClientEvent::LoadHistory { .. }));
    }

    #[test]
    fn test_unknown_event_is_rejected() {
        let result: Result<ClientEvent, _> =
            serde_json::from_str(r#"{"type":"deleteEverything"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_receive_message_serializes_inline() {
        let event = ServerEvent::ReceiveMessage(MessagePayload {
            id: 1,
            content: "hi".to_string(),
            from_user_id: "1".to_string(),
            to_user_id: "2".to_string(),
            date: Utc::now(),
            read: false,
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "receiveMessage");
        assert_eq!(json["fromUserId"], "1");
        assert_eq!(json["toUserId"], "2");
        assert_eq!(json["content"], "hi");
        assert_eq!(json["read"], false);
    }

    #[test]
    fn test_chat_history_serializes() {
        let event = ServerEvent::ChatHistory { messages: vec![] };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "chatHistory");
        assert!(json["messages"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_error_event_shape() {
        let event = ServerEvent::error("Failed to send message");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["message"], "Failed to send message");
    }
}

//! Message service: validation in front of the durable store.
//!
//! `MessageService` is the single entry point for both delivery surfaces --
//! the realtime broker and the pull query endpoint call the same methods,
//! so a conversation serializes identically everywhere.

use roomee_types::error::MessageError;
use roomee_types::message::ChatMessage;
use tracing::debug;

use crate::message::repository::MessageRepository;

/// Validates inputs and delegates to the message repository.
///
/// Generic over `MessageRepository` to maintain clean architecture
/// (roomee-core never depends on roomee-infra). Validation lives here so
/// the store stays a dumb append/replay log.
pub struct MessageService<R: MessageRepository> {
    repo: R,
}

impl<R: MessageRepository> MessageService<R> {
    /// Create a new message service over the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Access the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Validate and persist a message from `sender_id` to `recipient_id`.
    ///
    /// Returns the stored record with its server-assigned `id` and
    /// `sent_at`. Fails with a validation error before touching the store
    /// when the content is empty or either identity is absent.
    pub async fn send(
        &self,
        sender_id: &str,
        recipient_id: &str,
        content: &str,
    ) -> Result<ChatMessage, MessageError> {
        if sender_id.is_empty() || recipient_id.is_empty() {
            return Err(MessageError::MissingParticipant);
        }
        if content.is_empty() {
            return Err(MessageError::EmptyContent);
        }

        let message = self.repo.append(sender_id, recipient_id, content).await?;
        debug!(
            id = message.id,
            sender_id, recipient_id, "message persisted"
        );
        Ok(message)
    }

    /// Full ordered conversation between two users.
    ///
    /// The pair is unordered: `conversation(a, b)` and `conversation(b, a)`
    /// return identical sequences. An empty conversation is an empty vec.
    pub async fn conversation(
        &self,
        a: &str,
        b: &str,
    ) -> Result<Vec<ChatMessage>, MessageError> {
        if a.is_empty() || b.is_empty() {
            return Err(MessageError::MissingParticipant);
        }
        Ok(self.repo.history_between(a, b).await?)
    }
}

//! In-memory `MessageRepository` for service and broker tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use chrono::Utc;
use roomee_types::error::RepositoryError;
use roomee_types::message::ChatMessage;

use crate::message::MessageRepository;

/// Vec-backed message store with a failure toggle.
///
/// Ids increase monotonically; `sent_at` is assigned at append time, so
/// insertion order already matches the `(sent_at, id)` total order.
#[derive(Default)]
pub(crate) struct InMemoryMessageRepository {
    messages: Mutex<Vec<ChatMessage>>,
    next_id: AtomicI64,
    fail: AtomicBool,
}

impl InMemoryMessageRepository {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail with a connection error.
    pub(crate) fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), RepositoryError> {
        if self.fail.load(Ordering::SeqCst) {
            Err(RepositoryError::Connection)
        } else {
            Ok(())
        }
    }
}

impl MessageRepository for InMemoryMessageRepository {
    async fn append(
        &self,
        sender_id: &str,
        recipient_id: &str,
        content: &str,
    ) -> Result<ChatMessage, RepositoryError> {
        self.check_available()?;
        let message = ChatMessage {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            sender_id: sender_id.to_string(),
            recipient_id: recipient_id.to_string(),
            content: content.to_string(),
            sent_at: Utc::now(),
            read: false,
        };
        self.messages.lock().unwrap().push(message.clone());
        Ok(message)
    }

    async fn history_between(
        &self,
        a: &str,
        b: &str,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        self.check_available()?;
        let messages = self.messages.lock().unwrap();
        Ok(messages
            .iter()
            .filter(|m| {
                (m.sender_id == a && m.recipient_id == b)
                    || (m.sender_id == b && m.recipient_id == a)
            })
            .cloned()
            .collect())
    }
}

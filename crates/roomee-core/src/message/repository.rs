//! MessageRepository trait definition.
//!
//! Append-and-replay operations over the durable message log.
//! Implementations live in roomee-infra (e.g., `SqliteMessageRepository`).
//! Uses native async fn in traits (RPITIT, Rust 2024 edition).

use roomee_types::error::RepositoryError;
use roomee_types::message::ChatMessage;

/// Repository trait for chat message persistence.
///
/// The store exclusively owns message rows: it assigns `id` (strictly
/// increasing) and `sent_at` at persistence time. Failures are surfaced,
/// never retried, at this layer.
pub trait MessageRepository: Send + Sync {
    /// Persist a new message and return the stored record.
    ///
    /// A single atomic row insert; no partial persistence is possible.
    fn append(
        &self,
        sender_id: &str,
        recipient_id: &str,
        content: &str,
    ) -> impl std::future::Future<Output = Result<ChatMessage, RepositoryError>> + Send;

    /// All messages whose unordered participant pair matches `{a, b}`,
    /// ascending by `(sent_at, id)`.
    ///
    /// A full, finite snapshot -- no pagination. A conversation with no
    /// messages yields an empty vec, not an error.
    fn history_between(
        &self,
        a: &str,
        b: &str,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;
}

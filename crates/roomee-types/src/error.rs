use thiserror::Error;

/// Errors from message validation and orchestration.
///
/// `EmptyContent` and `MissingParticipant` are caller errors and surface
/// immediately to the originator; `Storage` wraps an underlying repository
/// failure and is never retried at this layer.
#[derive(Debug, Error)]
pub enum MessageError {
    #[error("message content must not be empty")]
    EmptyContent,

    #[error("both participant ids are required")]
    MissingParticipant,

    #[error("storage error: {0}")]
    Storage(String),
}

impl MessageError {
    /// Whether this error is a caller-side validation failure.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            MessageError::EmptyContent | MessageError::MissingParticipant
        )
    }
}

/// Errors from repository operations (used by trait definitions in roomee-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,
}

impl From<RepositoryError> for MessageError {
    fn from(e: RepositoryError) -> Self {
        MessageError::Storage(e.to_string())
    }
}

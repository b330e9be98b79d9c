//! Pull-query handler over the message log.
//!
//! `GET /messages?user1=<id>&user2=<id>` returns the full ordered
//! conversation between two users -- the same sequence, in the same order,
//! as the realtime `loadHistory` replay, because both run the same query.

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use roomee_types::message::MessagePayload;

use crate::http::error::AppError;
use crate::state::AppState;

/// Query parameters for the conversation lookup.
///
/// Both ids are required; either one missing is a 400.
#[derive(Debug, Deserialize)]
pub struct MessagesQuery {
    pub user1: Option<String>,
    pub user2: Option<String>,
}

/// GET /messages - All messages between two users, ascending by
/// `(sent_at, id)`.
pub async fn get_messages(
    State(state): State<AppState>,
    Query(query): Query<MessagesQuery>,
) -> Result<Json<Vec<MessagePayload>>, AppError> {
    let (Some(user1), Some(user2)) = (query.user1, query.user2) else {
        return Err(AppError::Validation(
            "Both user1 and user2 are required".to_string(),
        ));
    };

    let messages = state
        .messages
        .conversation(&user1, &user2)
        .await
        .map_err(|err| {
            if err.is_validation() {
                AppError::Validation(err.to_string())
            } else {
                tracing::error!(error = %err, %user1, %user2, "failed to fetch messages");
                AppError::Internal("Failed to fetch messages".to_string())
            }
        })?;

    Ok(Json(
        messages.into_iter().map(MessagePayload::from).collect(),
    ))
}

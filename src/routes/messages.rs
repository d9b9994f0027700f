//! Message routes.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::Json;
use serde::Deserialize;

use super::error::ApiError;
use super::parse_id;
use crate::db::Message;
use crate::services::chat;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessageBody {
    pub chat_id: Option<i64>,
    pub content: Option<String>,
    pub role: Option<String>,
}

/// `POST /api/messages`: Store one message without contacting the provider.
pub async fn create_message(
    State(state): State<AppState>,
    body: Result<Json<CreateMessageBody>, JsonRejection>,
) -> Result<Json<Message>, ApiError> {
    let Json(body) = body?;
    let message = chat::add_message(&state, body.chat_id, body.content.as_deref(), body.role.as_deref())
        .await
        .map_err(|e| ApiError::from_chat(e, state.locale))?;
    Ok(Json(message))
}

/// `GET /api/chats/:id/messages`: Oldest first. Unknown chats list empty.
pub async fn list_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Message>>, ApiError> {
    let id = parse_id(&id, "Invalid chat ID")?;
    Ok(Json(state.store.get_messages_by_chat(id).await?))
}

/// `GET /api/messages/:id`
pub async fn get_message(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Message>, ApiError> {
    let id = parse_id(&id, "Invalid message ID")?;
    state
        .store
        .get_message(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Message not found".into()))
}

#[cfg(test)]
#[path = "messages_test.rs"]
mod tests;

//! Chat routes, including the send-and-reply round trip.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::Json;
use serde::Deserialize;

use super::error::ApiError;
use super::{RequestLocale, parse_id};
use crate::db::{Chat, Message};
use crate::services::chat;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateChatBody {
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostChatMessageBody {
    pub chat_id: Option<i64>,
    pub message: Option<String>,
}

/// `POST /api/chats`: Create a chat.
pub async fn create_chat(
    State(state): State<AppState>,
    body: Result<Json<CreateChatBody>, JsonRejection>,
) -> Result<Json<Chat>, ApiError> {
    let Json(body) = body?;
    let chat = chat::create_chat(&state, body.title.as_deref())
        .await
        .map_err(|e| ApiError::from_chat(e, state.locale))?;
    Ok(Json(chat))
}

/// `GET /api/chats`: All chats, newest first.
pub async fn list_chats(State(state): State<AppState>) -> Result<Json<Vec<Chat>>, ApiError> {
    Ok(Json(state.store.list_chats().await?))
}

/// `GET /api/chats/:id`
pub async fn get_chat(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Chat>, ApiError> {
    let id = parse_id(&id, "Invalid chat ID")?;
    state
        .store
        .get_chat(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Chat not found".into()))
}

/// `POST /api/chat`: Store the user's message and return the stored
/// assistant reply.
pub async fn post_chat_message(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    body: Result<Json<PostChatMessageBody>, JsonRejection>,
) -> Result<Json<Message>, ApiError> {
    let Json(body) = body?;
    let reply = chat::post_chat_message(&state, body.chat_id, body.message.as_deref())
        .await
        .map_err(|e| ApiError::from_chat(e, locale))?;
    Ok(Json(reply))
}

#[cfg(test)]
#[path = "chats_test.rs"]
mod tests;

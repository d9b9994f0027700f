//! Chat service: chat/message creation and the send-message round trip.
//!
//! DESIGN
//! ======
//! `post_chat_message` stores the user's message, asks the completion
//! gateway for a reply using the chat's earlier messages, then stores the
//! reply. The two writes are independent: when the provider call fails the
//! user message stays persisted and the failure goes back to the caller.

use tracing::{info, warn};

use super::completion::{self, CompletionError};
use crate::db::{Chat, Message, Role, StoreError};
use crate::state::AppState;

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("{0}")]
    Validation(String),
    #[error("chat not found: {0}")]
    ChatNotFound(i64),
    #[error("completion failed: {0}")]
    Completion(#[from] CompletionError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

fn required_text<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, ChatError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ChatError::Validation(format!("{field} is required"))),
    }
}

async fn ensure_chat(state: &AppState, chat_id: i64) -> Result<Chat, ChatError> {
    state
        .store
        .get_chat(chat_id)
        .await?
        .ok_or(ChatError::ChatNotFound(chat_id))
}

/// Create a chat with a placeholder title.
///
/// # Errors
///
/// Returns a validation error for a blank title, or a store error.
pub async fn create_chat(state: &AppState, title: Option<&str>) -> Result<Chat, ChatError> {
    let title = required_text(title, "title")?;
    let chat = state.store.create_chat(title).await?;
    info!(chat_id = chat.id, "chat: created");
    Ok(chat)
}

/// Store one message in an existing chat.
///
/// # Errors
///
/// Returns a validation error for missing fields or an unknown role, a
/// not-found error for an unknown chat, or a store error.
pub async fn add_message(
    state: &AppState,
    chat_id: Option<i64>,
    content: Option<&str>,
    role: Option<&str>,
) -> Result<Message, ChatError> {
    let chat_id = chat_id.ok_or_else(|| ChatError::Validation("chatId is required".into()))?;
    let content = required_text(content, "content")?;
    let role = role
        .and_then(Role::parse)
        .ok_or_else(|| ChatError::Validation("role must be \"user\" or \"assistant\"".into()))?;

    ensure_chat(state, chat_id).await?;
    Ok(state.store.create_message(chat_id, content, role).await?)
}

/// Store the user's message, fetch a completion, store and return the reply.
///
/// # Errors
///
/// Returns a validation or not-found error before anything is stored. A
/// [`ChatError::Completion`] means the user message was stored but no reply
/// was produced.
pub async fn post_chat_message(
    state: &AppState,
    chat_id: Option<i64>,
    user_text: Option<&str>,
) -> Result<Message, ChatError> {
    let (Some(chat_id), Some(user_text)) = (chat_id, user_text.filter(|t| !t.trim().is_empty())) else {
        return Err(ChatError::Validation("chatId and message are required".into()));
    };
    ensure_chat(state, chat_id).await?;

    let user_message = state
        .store
        .create_message(chat_id, user_text, Role::User)
        .await?;

    let history: Vec<Message> = state
        .store
        .get_messages_by_chat(chat_id)
        .await?
        .into_iter()
        .filter(|m| m.id != user_message.id)
        .collect();

    let reply = match completion::complete(state.llm.as_deref(), &state.system_prompt, user_text, &history).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!(chat_id, user_message_id = user_message.id, error = %e, "chat: reply failed, user message kept");
            return Err(e.into());
        }
    };

    let assistant_message = state
        .store
        .create_message(chat_id, &reply, Role::Assistant)
        .await?;
    info!(chat_id, history_len = history.len(), message_id = assistant_message.id, "chat: reply stored");
    Ok(assistant_message)
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;

//! Entity store: users, chats and messages.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route handlers and services reach persistence only through the
//! [`ChatStore`] trait. Two variants implement it: [`memory::MemoryStore`]
//! for database-less runs and [`postgres::PgStore`] backed by SQLx. The
//! variant is chosen once at startup from configuration and injected via
//! `AppState`.
//!
//! ORDERING
//! ========
//! Identifiers increase with insertion order in both variants, so the id is
//! the tiebreaker whenever two records share a timestamp: messages sort by
//! `(created_at, id)` ascending, chats by `(created_at, id)` descending.

pub mod memory;
pub mod postgres;

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use time::OffsetDateTime;

/// Chat titles derived from a message keep at most this many characters.
pub const TITLE_MAX_CHARS: usize = 30;
const TITLE_ELLIPSIS: &str = "...";

// =============================================================================
// RECORDS
// =============================================================================

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            _ => None,
        }
    }
}

/// Registered user. The stored password is a bcrypt hash and is never
/// serialized.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: i64,
    pub title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i64,
    pub chat_id: i64,
    pub content: String,
    pub role: Role,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("username already taken: {0}")]
    UsernameTaken(String),
    #[error("stored row is invalid: {0}")]
    InvalidRow(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

// =============================================================================
// STORE TRAIT
// =============================================================================

/// Capability interface shared by every storage variant.
///
/// Lookups of unknown ids return `Ok(None)` or an empty list; errors are
/// reserved for backend faults and the username conflict.
#[async_trait::async_trait]
pub trait ChatStore: Send + Sync {
    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;

    /// # Errors
    ///
    /// Returns [`StoreError::UsernameTaken`] if the username exists.
    async fn create_user(&self, username: &str, password: &str) -> Result<User, StoreError>;

    async fn get_user(&self, id: i64) -> Result<Option<User>, StoreError>;

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn create_chat(&self, title: &str) -> Result<Chat, StoreError>;

    async fn get_chat(&self, id: i64) -> Result<Option<Chat>, StoreError>;

    /// All chats, newest first.
    async fn list_chats(&self) -> Result<Vec<Chat>, StoreError>;

    /// Store a message. The first user-role message of a chat also renames
    /// the chat via [`derive_title`]; a missing chat skips the rename.
    async fn create_message(&self, chat_id: i64, content: &str, role: Role) -> Result<Message, StoreError>;

    async fn get_message(&self, id: i64) -> Result<Option<Message>, StoreError>;

    /// Messages of one chat, oldest first.
    async fn get_messages_by_chat(&self, chat_id: i64) -> Result<Vec<Message>, StoreError>;
}

/// Chat title derived from its first user message: the content itself, or
/// its first [`TITLE_MAX_CHARS`] characters followed by `...`.
#[must_use]
pub fn derive_title(content: &str) -> String {
    match content.char_indices().nth(TITLE_MAX_CHARS) {
        Some((cut, _)) => format!("{}{TITLE_ELLIPSIS}", &content[..cut]),
        None => content.to_string(),
    }
}

// =============================================================================
// POSTGRES POOL
// =============================================================================

/// Initialize the `PostgreSQL` connection pool and run migrations.
///
/// # Errors
///
/// Returns an error if the connection or migrations fail.
pub async fn init_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    sqlx::migrate!("src/db/migrations").run(&pool).await?;

    Ok(pool)
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

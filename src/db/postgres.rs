//! `PostgreSQL` store backed by SQLx.
//!
//! Schema lives in `src/db/migrations`. `messages.chat_id` carries no foreign
//! key; a message for a missing chat is stored and the title step no-ops.

use sqlx::PgPool;
use time::OffsetDateTime;

use super::{Chat, ChatStore, Message, Role, StoreError, User, derive_title};

type MessageRow = (i64, i64, String, String, OffsetDateTime);

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn message_from_row((id, chat_id, content, role, created_at): MessageRow) -> Result<Message, StoreError> {
    let role = Role::parse(&role).ok_or_else(|| StoreError::InvalidRow(format!("message {id} has role {role:?}")))?;
    Ok(Message { id, chat_id, content, role, created_at })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[async_trait::async_trait]
impl ChatStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn create_user(&self, username: &str, password: &str) -> Result<User, StoreError> {
        let id: i64 = sqlx::query_scalar("INSERT INTO users (username, password) VALUES ($1, $2) RETURNING id")
            .bind(username)
            .bind(password)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::UsernameTaken(username.to_string())
                } else {
                    StoreError::Database(e)
                }
            })?;

        Ok(User { id, username: username.to_string(), password: password.to_string() })
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, (i64, String, String)>("SELECT id, username, password FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(id, username, password)| User { id, username, password }))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let row =
            sqlx::query_as::<_, (i64, String, String)>("SELECT id, username, password FROM users WHERE username = $1")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(id, username, password)| User { id, username, password }))
    }

    async fn create_chat(&self, title: &str) -> Result<Chat, StoreError> {
        let (id, created_at) = sqlx::query_as::<_, (i64, OffsetDateTime)>(
            "INSERT INTO chats (title) VALUES ($1) RETURNING id, created_at",
        )
        .bind(title)
        .fetch_one(&self.pool)
        .await?;

        Ok(Chat { id, title: title.to_string(), created_at })
    }

    async fn get_chat(&self, id: i64) -> Result<Option<Chat>, StoreError> {
        let row = sqlx::query_as::<_, (i64, String, OffsetDateTime)>("SELECT id, title, created_at FROM chats WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(id, title, created_at)| Chat { id, title, created_at }))
    }

    async fn list_chats(&self) -> Result<Vec<Chat>, StoreError> {
        let rows = sqlx::query_as::<_, (i64, String, OffsetDateTime)>(
            "SELECT id, title, created_at FROM chats ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, title, created_at)| Chat { id, title, created_at })
            .collect())
    }

    async fn create_message(&self, chat_id: i64, content: &str, role: Role) -> Result<Message, StoreError> {
        let mut tx = self.pool.begin().await?;

        let first_user_message = if role == Role::User {
            let exists: bool = sqlx::query_scalar(
                "SELECT EXISTS (SELECT 1 FROM messages WHERE chat_id = $1 AND role = 'user')",
            )
            .bind(chat_id)
            .fetch_one(tx.as_mut())
            .await?;
            !exists
        } else {
            false
        };

        let (id, created_at) = sqlx::query_as::<_, (i64, OffsetDateTime)>(
            "INSERT INTO messages (chat_id, content, role) VALUES ($1, $2, $3) RETURNING id, created_at",
        )
        .bind(chat_id)
        .bind(content)
        .bind(role.as_str())
        .fetch_one(tx.as_mut())
        .await?;

        if first_user_message {
            sqlx::query("UPDATE chats SET title = $2 WHERE id = $1")
                .bind(chat_id)
                .bind(derive_title(content))
                .execute(tx.as_mut())
                .await?;
        }

        tx.commit().await?;

        Ok(Message { id, chat_id, content: content.to_string(), role, created_at })
    }

    async fn get_message(&self, id: i64) -> Result<Option<Message>, StoreError> {
        let row = sqlx::query_as::<_, MessageRow>(
            "SELECT id, chat_id, content, role, created_at FROM messages WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(message_from_row).transpose()
    }

    async fn get_messages_by_chat(&self, chat_id: i64) -> Result<Vec<Message>, StoreError> {
        let rows = sqlx::query_as::<_, MessageRow>(
            "SELECT id, chat_id, content, role, created_at
             FROM messages
             WHERE chat_id = $1
             ORDER BY created_at ASC, id ASC",
        )
        .bind(chat_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(message_from_row).collect()
    }
}

#[cfg(test)]
#[path = "postgres_test.rs"]
mod tests;

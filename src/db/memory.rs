//! In-memory store: process-local tables behind one async `RwLock`.
//!
//! Built once at startup when no database is configured. Contents live as
//! long as the process.

use std::collections::BTreeMap;

use time::OffsetDateTime;
use tokio::sync::RwLock;

use super::{Chat, ChatStore, Message, Role, StoreError, User, derive_title};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    chats: BTreeMap<i64, Chat>,
    messages: BTreeMap<i64, Message>,
    next_user_id: i64,
    next_chat_id: i64,
    next_message_id: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ChatStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn create_user(&self, username: &str, password: &str) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == username) {
            return Err(StoreError::UsernameTaken(username.to_string()));
        }
        let user = User {
            id: next_id(&mut tables.next_user_id),
            username: username.to_string(),
            password: password.to_string(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn create_chat(&self, title: &str) -> Result<Chat, StoreError> {
        let mut tables = self.tables.write().await;
        let chat = Chat {
            id: next_id(&mut tables.next_chat_id),
            title: title.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        tables.chats.insert(chat.id, chat.clone());
        Ok(chat)
    }

    async fn get_chat(&self, id: i64) -> Result<Option<Chat>, StoreError> {
        Ok(self.tables.read().await.chats.get(&id).cloned())
    }

    async fn list_chats(&self) -> Result<Vec<Chat>, StoreError> {
        let tables = self.tables.read().await;
        let mut chats: Vec<Chat> = tables.chats.values().cloned().collect();
        chats.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(chats)
    }

    async fn create_message(&self, chat_id: i64, content: &str, role: Role) -> Result<Message, StoreError> {
        let mut tables = self.tables.write().await;

        let first_user_message = role == Role::User
            && !tables
                .messages
                .values()
                .any(|m| m.chat_id == chat_id && m.role == Role::User);

        let message = Message {
            id: next_id(&mut tables.next_message_id),
            chat_id,
            content: content.to_string(),
            role,
            created_at: OffsetDateTime::now_utc(),
        };
        tables.messages.insert(message.id, message.clone());

        if first_user_message {
            if let Some(chat) = tables.chats.get_mut(&chat_id) {
                chat.title = derive_title(content);
            }
        }

        Ok(message)
    }

    async fn get_message(&self, id: i64) -> Result<Option<Message>, StoreError> {
        Ok(self.tables.read().await.messages.get(&id).cloned())
    }

    async fn get_messages_by_chat(&self, chat_id: i64) -> Result<Vec<Message>, StoreError> {
        let tables = self.tables.read().await;
        let mut messages: Vec<Message> = tables
            .messages
            .values()
            .filter(|m| m.chat_id == chat_id)
            .cloned()
            .collect();
        messages.sort_by_key(|m| (m.created_at, m.id));
        Ok(messages)
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;

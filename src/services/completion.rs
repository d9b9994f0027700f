//! Completion gateway: chat history → provider prompt → reply text.
//!
//! DESIGN
//! ======
//! The prompt is always: one system instruction, then every prior message
//! as a role/content pair, then the new user message. Model, temperature and
//! token budget belong to the configured client and never vary per request.
//!
//! ERROR HANDLING
//! ==============
//! Provider failures collapse into four categories keyed on the upstream
//! HTTP status (401, 429, 402, everything else). Each category renders a
//! fixed message in the caller's locale. Nothing is retried.

use tracing::{info, warn};

use crate::config::Locale;
use crate::db::{self, Role};
use crate::llm::LlmChat;
use crate::llm::types::{LlmError, Message};

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a smart and helpful assistant named Open Life. \
Give detailed, useful and accurate answers concisely, and always respect the user's privacy. \
Reply in the language the user writes in.";

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("provider rejected the API key")]
    InvalidCredential,
    #[error("provider rate limit exceeded")]
    RateLimited,
    #[error("provider account balance exhausted")]
    InsufficientBalance,
    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

impl From<LlmError> for CompletionError {
    fn from(err: LlmError) -> Self {
        match err.status() {
            Some(401) => Self::InvalidCredential,
            Some(429) => Self::RateLimited,
            Some(402) => Self::InsufficientBalance,
            _ => Self::Unavailable(err.to_string()),
        }
    }
}

impl CompletionError {
    /// Human-readable message shown verbatim by the client.
    #[must_use]
    pub fn user_message(&self, locale: Locale) -> String {
        match (self, locale) {
            (Self::InvalidCredential, Locale::Ar) => {
                "المفتاح غير صالح أو منتهي الصلاحية. يرجى التحقق من تكوين المفتاح".to_string()
            }
            (Self::InvalidCredential, Locale::En) => {
                "The API key is invalid or expired. Please check the key configuration.".to_string()
            }
            (Self::RateLimited, Locale::Ar) => "تم تجاوز حد الاستخدام للواجهة البرمجية. يرجى المحاولة لاحقًا".to_string(),
            (Self::RateLimited, Locale::En) => {
                "The API usage limit has been exceeded. Please try again later.".to_string()
            }
            (Self::InsufficientBalance, Locale::Ar) => {
                "الرصيد غير كافٍ في حساب مزود الذكاء الاصطناعي. يرجى إضافة رصيد إلى حسابك".to_string()
            }
            (Self::InsufficientBalance, Locale::En) => {
                "Insufficient balance in the AI provider account. Please add credit to your account.".to_string()
            }
            (Self::Unavailable(detail), Locale::Ar) => format!("حدث خطأ أثناء الاتصال بمزود الذكاء الاصطناعي: {detail}"),
            (Self::Unavailable(detail), Locale::En) => {
                format!("An error occurred while contacting the AI provider: {detail}")
            }
        }
    }
}

/// Build the provider-neutral message list: history then the new message.
/// The system instruction travels separately.
#[must_use]
pub fn build_prompt(user_message: &str, history: &[db::Message]) -> Vec<Message> {
    let mut messages: Vec<Message> = history
        .iter()
        .map(|m| match m.role {
            Role::User => Message::user(m.content.clone()),
            Role::Assistant => Message::assistant(m.content.clone()),
        })
        .collect();
    messages.push(Message::user(user_message));
    messages
}

/// Ask the configured provider for a reply to `user_message`.
///
/// # Errors
///
/// Returns a [`CompletionError`] if no provider is configured or the single
/// provider call fails.
pub async fn complete(
    llm: Option<&dyn LlmChat>,
    system: &str,
    user_message: &str,
    history: &[db::Message],
) -> Result<String, CompletionError> {
    let Some(llm) = llm else {
        return Err(CompletionError::Unavailable("AI provider is not configured".to_string()));
    };

    let messages = build_prompt(user_message, history);
    match llm.chat(system, &messages).await {
        Ok(response) => {
            info!(
                model = %response.model,
                stop_reason = %response.stop_reason,
                input_tokens = response.input_tokens,
                output_tokens = response.output_tokens,
                "completion: reply received"
            );
            Ok(response.text)
        }
        Err(e) => {
            warn!(
                error = %e,
                status = ?e.status(),
                body = e.body().unwrap_or_default(),
                model = llm.model(),
                "completion: provider call failed"
            );
            Err(e.into())
        }
    }
}

#[cfg(test)]
#[path = "completion_test.rs"]
mod tests;

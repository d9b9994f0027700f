//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the entity store chosen at startup, the optional LLM client, and
//! the process-wide completion settings. Nothing here is a global: one
//! instance is built in `main` and cloned into the router.

use std::sync::Arc;

use crate::config::Locale;
use crate::db::ChatStore;
use crate::llm::LlmChat;
use crate::services::completion::DEFAULT_SYSTEM_PROMPT;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Copy.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ChatStore>,
    /// Optional LLM client. `None` if the provider is not configured.
    pub llm: Option<Arc<dyn LlmChat>>,
    /// Locale used when the request does not name a supported one.
    pub locale: Locale,
    /// Instruction prepended to every completion prompt.
    pub system_prompt: Arc<str>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn ChatStore>, llm: Option<Arc<dyn LlmChat>>) -> Self {
        Self { store, llm, locale: Locale::default(), system_prompt: Arc::from(DEFAULT_SYSTEM_PROMPT) }
    }

    #[must_use]
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    #[must_use]
    pub fn with_system_prompt(mut self, prompt: &str) -> Self {
        self.system_prompt = Arc::from(prompt);
        self
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use std::sync::Mutex;

    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::llm::types::{ChatResponse, LlmError, Message};

    /// Scripted LLM: pops one queued result per call and records every prompt.
    pub struct MockLlm {
        responses: Mutex<Vec<Result<ChatResponse, LlmError>>>,
        pub calls: Mutex<Vec<(String, Vec<Message>)>>,
    }

    impl MockLlm {
        #[must_use]
        pub fn new(responses: Vec<Result<ChatResponse, LlmError>>) -> Self {
            Self { responses: Mutex::new(responses), calls: Mutex::new(Vec::new()) }
        }

        #[must_use]
        pub fn replying(text: &str) -> Self {
            Self::new(vec![Ok(reply(text))])
        }

        #[must_use]
        pub fn failing_with_status(status: u16) -> Self {
            Self::new(vec![Err(LlmError::ApiResponse { status, body: String::new() })])
        }
    }

    #[async_trait::async_trait]
    impl LlmChat for MockLlm {
        async fn chat(&self, system: &str, messages: &[Message]) -> Result<ChatResponse, LlmError> {
            self.calls
                .lock()
                .expect("mock mutex should lock")
                .push((system.to_string(), messages.to_vec()));
            let mut responses = self.responses.lock().expect("mock mutex should lock");
            if responses.is_empty() { Ok(reply("done")) } else { responses.remove(0) }
        }

        fn model(&self) -> &str {
            "mock"
        }
    }

    #[must_use]
    pub fn reply(text: &str) -> ChatResponse {
        ChatResponse {
            text: text.into(),
            model: "mock".into(),
            stop_reason: "end_turn".into(),
            input_tokens: 0,
            output_tokens: 0,
        }
    }

    /// Create a test `AppState` with an in-memory store and no LLM.
    #[must_use]
    pub fn test_app_state() -> AppState {
        AppState::new(Arc::new(MemoryStore::new()), None)
    }

    /// Create a test `AppState` with an in-memory store and a mock LLM.
    #[must_use]
    pub fn test_app_state_with_llm(llm: Arc<dyn LlmChat>) -> AppState {
        AppState::new(Arc::new(MemoryStore::new()), Some(llm))
    }
}

//! LLM types: provider-neutral prompt types and errors.
//!
//! Shared by the OpenAI-compatible and Anthropic clients. Prompts here are
//! text-only: the chat proxy never sends tools or structured content.

use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR
// =============================================================================

/// Failures of a single provider call, or of building the client.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("invalid LLM config: {0}")]
    ConfigParse(String),

    #[error("no API key in {var}")]
    MissingApiKey { var: String },

    /// Transport failure: DNS, connect, TLS or timeout.
    #[error("provider request failed: {0}")]
    ApiRequest(String),

    /// Non-200 answer. `status` drives the user-facing error category.
    #[error("provider answered with status {status}")]
    ApiResponse { status: u16, body: String },

    #[error("provider response malformed: {0}")]
    ApiParse(String),

    /// The provider answered but produced no completion text.
    #[error("no completion returned by provider")]
    EmptyCompletion,

    #[error("could not build HTTP client: {0}")]
    HttpClientBuild(String),
}

impl LlmError {
    /// Upstream HTTP status, when the provider answered with one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiResponse { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw upstream error body, for logs only.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::ApiResponse { body, .. } => Some(body),
            _ => None,
        }
    }
}

// =============================================================================
// MESSAGE TYPES
// =============================================================================

/// A single turn in the prompt sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".into(), content: content.into() }
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: "assistant".into(), content: content.into() }
    }
}

/// Sampling parameters fixed per process, never per request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sampling {
    pub max_tokens: u32,
    pub temperature: f32,
}

/// One completion, with token accounting for logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Text of the first completion choice.
    pub text: String,
    pub model: String,
    pub stop_reason: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

// =============================================================================
// LLM CHAT TRAIT
// =============================================================================

/// Seam between the completion gateway and a concrete provider.
#[async_trait::async_trait]
pub trait LlmChat: Send + Sync {
    /// Ask for one completion of `messages`.
    ///
    /// `messages` must not contain the system instruction; providers place
    /// `system` wherever their wire format expects it.
    ///
    /// # Errors
    ///
    /// Returns an [`LlmError`] if the request fails, the provider answers
    /// with a non-success status, or the response is malformed.
    async fn chat(&self, system: &str, messages: &[Message]) -> Result<ChatResponse, LlmError>;

    /// Model identifier used for every request.
    fn model(&self) -> &str;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;

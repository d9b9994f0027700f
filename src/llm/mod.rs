//! LLM: multi-provider adapter for the completion gateway.
//!
//! DESIGN
//! ======
//! Configuration comes from environment variables (see [`config`]). The
//! `LlmClient` wrapper dispatches to an OpenAI-compatible provider (AIML or
//! OpenAI) or to Anthropic based on `LLM_PROVIDER`, and is consumed through
//! the [`LlmChat`] trait so tests can substitute a mock.

pub mod anthropic;
pub mod config;
pub mod openai;
pub mod types;

use std::time::Duration;

use config::{LlmConfig, LlmProviderKind, LlmTimeouts};
pub use types::LlmChat;
use types::{ChatResponse, LlmError, Message, Sampling};

// =============================================================================
// CLIENT DISPATCH
// =============================================================================

/// Concrete LLM client that dispatches to the configured provider.
///
/// Configured from environment variables by [`LlmClient::from_env`].
#[derive(Debug)]
pub struct LlmClient {
    inner: LlmProvider,
    kind: LlmProviderKind,
    model: String,
    sampling: Sampling,
}

#[derive(Debug)]
enum LlmProvider {
    OpenAi(openai::OpenAiClient),
    Anthropic(anthropic::AnthropicClient),
}

impl LlmClient {
    /// Build an LLM client from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing, a value fails to parse, or
    /// the HTTP client fails to build.
    pub fn from_env() -> Result<Self, LlmError> {
        let config = LlmConfig::from_env()?;
        Self::from_config(config)
    }

    /// Build an LLM client from a parsed typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider HTTP client fails to build.
    pub fn from_config(config: LlmConfig) -> Result<Self, LlmError> {
        let inner = match config.provider {
            LlmProviderKind::Aiml | LlmProviderKind::OpenAi => {
                LlmProvider::OpenAi(openai::OpenAiClient::new(config.api_key, config.base_url, config.timeouts)?)
            }
            LlmProviderKind::Anthropic => LlmProvider::Anthropic(anthropic::AnthropicClient::new(
                config.api_key,
                config.base_url,
                config.timeouts,
            )?),
        };
        Ok(Self { inner, kind: config.provider, model: config.model, sampling: config.sampling })
    }

    /// Configured provider name (`aiml`, `openai` or `anthropic`).
    #[must_use]
    pub fn provider(&self) -> &'static str {
        self.kind.as_str()
    }
}

#[async_trait::async_trait]
impl LlmChat for LlmClient {
    async fn chat(&self, system: &str, messages: &[Message]) -> Result<ChatResponse, LlmError> {
        match &self.inner {
            LlmProvider::OpenAi(c) => c.chat(&self.model, self.sampling, system, messages).await,
            LlmProvider::Anthropic(c) => c.chat(&self.model, self.sampling, system, messages).await,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Shared reqwest client construction for every provider.
fn http_client(timeouts: LlmTimeouts) -> Result<reqwest::Client, LlmError> {
    let mut builder = reqwest::Client::builder().connect_timeout(Duration::from_secs(timeouts.connect_secs));
    if let Some(secs) = timeouts.request_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder
        .build()
        .map_err(|e| LlmError::HttpClientBuild(e.to_string()))
}

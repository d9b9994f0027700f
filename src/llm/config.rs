//! LLM configuration parsed from environment variables.

use super::types::{LlmError, Sampling};

pub const DEFAULT_AIML_BASE_URL: &str = "https://api.aimlapi.com/v1";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";
pub const DEFAULT_LLM_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LLM_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProviderKind {
    Aiml,
    OpenAi,
    Anthropic,
}

impl LlmProviderKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Aiml => "aiml",
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
        }
    }

    fn default_key_var(self) -> &'static str {
        match self {
            Self::Aiml => "AIML_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    fn default_model(self) -> &'static str {
        match self {
            Self::Aiml => "gpt-4o",
            Self::OpenAi => "gpt-3.5-turbo",
            Self::Anthropic => "claude-sonnet-4-5-20250929",
        }
    }

    fn default_max_tokens(self) -> u32 {
        match self {
            Self::Aiml | Self::Anthropic => 2048,
            Self::OpenAi => 4000,
        }
    }

    fn default_base_url(self) -> &'static str {
        match self {
            Self::Aiml => DEFAULT_AIML_BASE_URL,
            Self::OpenAi => DEFAULT_OPENAI_BASE_URL,
            Self::Anthropic => DEFAULT_ANTHROPIC_BASE_URL,
        }
    }
}

/// HTTP timeouts for provider calls. `request_secs: None` leaves the
/// overall request unbounded, which is the HTTP client default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LlmTimeouts {
    pub request_secs: Option<u64>,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    pub provider: LlmProviderKind,
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub sampling: Sampling,
    pub timeouts: LlmTimeouts,
}

impl LlmConfig {
    /// Build typed LLM config from environment variables.
    ///
    /// Optional:
    /// - `LLM_PROVIDER`: `aiml` (default), `openai` or `anthropic`
    /// - `LLM_API_KEY_ENV`: names the env var holding the key; defaults to
    ///   `AIML_API_KEY`, `OPENAI_API_KEY` or `ANTHROPIC_API_KEY`
    /// - `LLM_MODEL`: provider default when absent
    /// - `LLM_MAX_TOKENS`: provider default when absent
    /// - `LLM_TEMPERATURE`: default 0.7
    /// - `LLM_BASE_URL`: provider default when absent
    /// - `LLM_REQUEST_TIMEOUT_SECS`: unset means no overall timeout
    /// - `LLM_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if the key is absent or a value fails to parse.
    pub fn from_env() -> Result<Self, LlmError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build typed LLM config from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`LlmConfig::from_env`].
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, LlmError> {
        let provider = parse_provider(var("LLM_PROVIDER").as_deref())?;

        let key_var = var("LLM_API_KEY_ENV").unwrap_or_else(|| provider.default_key_var().to_string());
        let api_key = var(&key_var)
            .filter(|k| !k.trim().is_empty())
            .ok_or(LlmError::MissingApiKey { var: key_var })?;

        let model = var("LLM_MODEL").unwrap_or_else(|| provider.default_model().to_string());
        let base_url = var("LLM_BASE_URL")
            .unwrap_or_else(|| provider.default_base_url().to_string())
            .trim_end_matches('/')
            .to_string();
        let sampling = Sampling {
            max_tokens: parse_or("LLM_MAX_TOKENS", var("LLM_MAX_TOKENS"), provider.default_max_tokens())?,
            temperature: parse_or("LLM_TEMPERATURE", var("LLM_TEMPERATURE"), DEFAULT_LLM_TEMPERATURE)?,
        };
        let timeouts = LlmTimeouts {
            request_secs: var("LLM_REQUEST_TIMEOUT_SECS")
                .map(|raw| parse_value("LLM_REQUEST_TIMEOUT_SECS", &raw))
                .transpose()?,
            connect_secs: parse_or(
                "LLM_CONNECT_TIMEOUT_SECS",
                var("LLM_CONNECT_TIMEOUT_SECS"),
                DEFAULT_LLM_CONNECT_TIMEOUT_SECS,
            )?,
        };

        Ok(Self { provider, api_key, model, base_url, sampling, timeouts })
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, LlmError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| LlmError::ConfigParse(format!("invalid {key}: {raw}")))
}

fn parse_or<T: std::str::FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T, LlmError> {
    raw.map_or(Ok(default), |raw| parse_value(key, &raw))
}

fn parse_provider(raw: Option<&str>) -> Result<LlmProviderKind, LlmError> {
    match raw.unwrap_or("aiml") {
        "aiml" => Ok(LlmProviderKind::Aiml),
        "openai" => Ok(LlmProviderKind::OpenAi),
        "anthropic" => Ok(LlmProviderKind::Anthropic),
        other => Err(LlmError::ConfigParse(format!("unknown LLM_PROVIDER: {other}"))),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

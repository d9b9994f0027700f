//! Server configuration parsed from environment variables.
//!
//! LLM settings are parsed separately by [`crate::llm::config`] so a missing
//! provider key never prevents the server from starting.

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {key}: {value}")]
    Invalid { key: &'static str, value: String },
    #[error("STORAGE_BACKEND=postgres requires DATABASE_URL")]
    MissingDatabaseUrl,
}

/// Language used for user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    Ar,
    En,
}

impl Locale {
    /// Parse a language tag such as `en`, `en-US` or `ar_EG`.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "ar" => Some(Self::Ar),
            "en" => Some(Self::En),
            _ => None,
        }
    }

    /// First supported language in an `Accept-Language` header value, in
    /// header order. Quality weights are ignored.
    #[must_use]
    pub fn from_accept_language(header: &str) -> Option<Self> {
        header
            .split(',')
            .filter_map(|part| part.split(';').next())
            .find_map(Self::from_tag)
    }
}

/// Where chats and messages are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    Memory,
    Postgres { database_url: String, max_connections: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub storage: StorageConfig,
    pub locale: Locale,
    /// Overrides the built-in assistant instruction when set.
    pub system_prompt: Option<String>,
}

impl AppConfig {
    /// Build typed server config from environment variables.
    ///
    /// - `PORT`: default 3000
    /// - `STORAGE_BACKEND`: `memory` or `postgres`; when unset, `postgres`
    ///   if `DATABASE_URL` is set, otherwise `memory`
    /// - `DATABASE_URL`: required for `postgres`
    /// - `DB_MAX_CONNECTIONS`: default 5
    /// - `APP_LOCALE`: `ar` (default) or `en`
    /// - `AI_SYSTEM_PROMPT`: optional assistant instruction override
    ///
    /// # Errors
    ///
    /// Returns an error if a value fails to parse or `postgres` is selected
    /// without a database URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build typed server config from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`AppConfig::from_env`].
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = parse_or("PORT", var("PORT"), DEFAULT_PORT)?;

        let database_url = var("DATABASE_URL").filter(|v| !v.trim().is_empty());
        let backend = var("STORAGE_BACKEND");
        let storage = match (backend.as_deref(), database_url) {
            (Some("memory"), _) | (None, None) => StorageConfig::Memory,
            (Some("postgres") | None, Some(database_url)) => StorageConfig::Postgres {
                database_url,
                max_connections: parse_or(
                    "DB_MAX_CONNECTIONS",
                    var("DB_MAX_CONNECTIONS"),
                    DEFAULT_DB_MAX_CONNECTIONS,
                )?,
            },
            (Some("postgres"), None) => return Err(ConfigError::MissingDatabaseUrl),
            (Some(other), _) => {
                return Err(ConfigError::Invalid { key: "STORAGE_BACKEND", value: other.to_string() });
            }
        };

        let locale = match var("APP_LOCALE") {
            None => Locale::default(),
            Some(raw) => Locale::from_tag(&raw).ok_or(ConfigError::Invalid { key: "APP_LOCALE", value: raw })?,
        };

        let system_prompt = var("AI_SYSTEM_PROMPT").filter(|v| !v.trim().is_empty());

        Ok(Self { port, storage, locale, system_prompt })
    }
}

fn parse_or<T: std::str::FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

//! Runtime configuration for the chat services.
//!
//! [`ChatConfig`] is built explicitly and handed to service constructors.
//! It can be assembled in code with the `with_*` setters, deserialized from
//! a host configuration file, or read from `CHAT_*` environment variables.

use serde::Deserialize;
use std::str::FromStr;
use thiserror::Error;

/// Environment variable holding the `PostgreSQL` connection string.
pub const ENV_DATABASE_URL: &str = "CHAT_DATABASE_URL";
/// Environment variable holding the connection pool size.
pub const ENV_DATABASE_POOL_SIZE: &str = "CHAT_DATABASE_POOL_SIZE";
/// Environment variable holding the largest page size served.
pub const ENV_MAX_PAGE_SIZE: &str = "CHAT_MAX_PAGE_SIZE";
/// Environment variable holding the message content limit in characters.
pub const ENV_MAX_CONTENT_LENGTH: &str = "CHAT_MAX_CONTENT_LENGTH";
/// Environment variable selecting the reply validation policy.
pub const ENV_REPLY_POLICY: &str = "CHAT_REPLY_POLICY";
/// Environment variable holding the default log filter directive.
pub const ENV_LOG_FILTER: &str = "CHAT_LOG_FILTER";

const DEFAULT_POOL_SIZE: u32 = 8;
const DEFAULT_MAX_PAGE_SIZE: u32 = 100;
const DEFAULT_MAX_CONTENT_LENGTH: usize = 4096;
const DEFAULT_LOG_FILTER: &str = "info";

/// How the message service validates a reply target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyPolicy {
    /// The target must exist and belong to the same room.
    #[default]
    SameRoom,
    /// The target is stored as given without lookup.
    Unchecked,
}

impl ReplyPolicy {
    /// Returns the configuration spelling of the policy.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SameRoom => "same_room",
            Self::Unchecked => "unchecked",
        }
    }
}

impl FromStr for ReplyPolicy {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "same_room" => Ok(Self::SameRoom),
            "unchecked" => Ok(Self::Unchecked),
            other => Err(ConfigError::InvalidValue {
                key: ENV_REPLY_POLICY,
                value: other.to_owned(),
                reason: "expected `same_room` or `unchecked`".to_owned(),
            }),
        }
    }
}

/// Errors raised while reading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was present but could not be interpreted.
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        /// The offending variable.
        key: &'static str,
        /// The raw value.
        value: String,
        /// What was expected instead.
        reason: String,
    },
    /// A required variable was not set.
    #[error("{key} is not set")]
    Missing {
        /// The absent variable.
        key: &'static str,
    },
}

/// Chat service configuration.
///
/// # Example
///
/// ```
/// use chatroom::config::{ChatConfig, ReplyPolicy};
///
/// let config = ChatConfig::default()
///     .with_max_page_size(50)
///     .with_reply_policy(ReplyPolicy::Unchecked);
/// assert_eq!(config.max_page_size(), 50);
/// assert_eq!(config.max_content_length(), 4096);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    database_url: Option<String>,
    database_pool_size: u32,
    max_page_size: u32,
    max_content_length: usize,
    reply_policy: ReplyPolicy,
    log_filter: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            database_pool_size: DEFAULT_POOL_SIZE,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            reply_policy: ReplyPolicy::default(),
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
        }
    }
}

impl ChatConfig {
    /// Loads a `.env` file when present, then reads `CHAT_*` variables from
    /// the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a variable is present but
    /// malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                tracing::warn!(error = %err, "failed to load .env file");
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup, falling back to
    /// defaults for absent keys.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a value is present but
    /// malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_DATABASE_URL).filter(|url| !url.trim().is_empty()) {
            config.database_url = Some(url);
        }
        if let Some(raw) = lookup(ENV_DATABASE_POOL_SIZE) {
            config.database_pool_size = parse_positive(ENV_DATABASE_POOL_SIZE, &raw)?;
        }
        if let Some(raw) = lookup(ENV_MAX_PAGE_SIZE) {
            config.max_page_size = parse_positive(ENV_MAX_PAGE_SIZE, &raw)?;
        }
        if let Some(raw) = lookup(ENV_MAX_CONTENT_LENGTH) {
            config.max_content_length = parse_positive(ENV_MAX_CONTENT_LENGTH, &raw)?;
        }
        if let Some(raw) = lookup(ENV_REPLY_POLICY) {
            config.reply_policy = raw.parse()?;
        }
        if let Some(filter) = lookup(ENV_LOG_FILTER).filter(|filter| !filter.trim().is_empty()) {
            config.log_filter = filter;
        }

        Ok(config)
    }

    /// Sets the `PostgreSQL` connection string.
    #[must_use]
    pub fn with_database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    /// Sets the connection pool size. Zero is raised to one.
    #[must_use]
    pub fn with_database_pool_size(mut self, size: u32) -> Self {
        self.database_pool_size = size.max(1);
        self
    }

    /// Sets the largest page size served. Zero is raised to one.
    #[must_use]
    pub fn with_max_page_size(mut self, size: u32) -> Self {
        self.max_page_size = size.max(1);
        self
    }

    /// Sets the message content limit in characters.
    #[must_use]
    pub const fn with_max_content_length(mut self, length: usize) -> Self {
        self.max_content_length = length;
        self
    }

    /// Sets the reply validation policy.
    #[must_use]
    pub const fn with_reply_policy(mut self, policy: ReplyPolicy) -> Self {
        self.reply_policy = policy;
        self
    }

    /// Sets the default log filter directive.
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Returns the `PostgreSQL` connection string, if configured.
    #[must_use]
    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }

    /// Returns the `PostgreSQL` connection string for adapters that need one.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when no URL is configured.
    pub fn require_database_url(&self) -> Result<&str, ConfigError> {
        self.database_url().ok_or(ConfigError::Missing {
            key: ENV_DATABASE_URL,
        })
    }

    /// Returns the connection pool size.
    #[must_use]
    pub const fn database_pool_size(&self) -> u32 {
        self.database_pool_size
    }

    /// Returns the largest page size served.
    #[must_use]
    pub const fn max_page_size(&self) -> u32 {
        self.max_page_size
    }

    /// Returns the message content limit in characters.
    #[must_use]
    pub const fn max_content_length(&self) -> usize {
        self.max_content_length
    }

    /// Returns the reply validation policy.
    #[must_use]
    pub const fn reply_policy(&self) -> ReplyPolicy {
        self.reply_policy
    }

    /// Returns the default log filter directive.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }
}

fn parse_positive<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr + Default + PartialEq,
{
    let invalid = || ConfigError::InvalidValue {
        key,
        value: raw.to_owned(),
        reason: "expected a positive integer".to_owned(),
    };
    let parsed = raw.trim().parse::<T>().map_err(|_| invalid())?;
    if parsed == T::default() {
        return Err(invalid());
    }
    Ok(parsed)
}

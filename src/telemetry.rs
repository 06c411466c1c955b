//! Tracing subscriber setup for hosts embedding the chat services.

use crate::config::ChatConfig;
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// Errors raised while installing the tracing subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Neither `RUST_LOG` nor the configured filter is a valid directive.
    #[error("invalid log filter '{filter}': {source}")]
    InvalidFilter {
        /// The configured directive.
        filter: String,
        /// Parser failure.
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    /// A global subscriber has already been installed.
    #[error("tracing subscriber already initialised: {0}")]
    AlreadyInitialised(#[from] TryInitError),
}

/// Resolves the log filter: `RUST_LOG` when set and valid, otherwise the
/// configured [`ChatConfig::log_filter`].
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] when the fallback directive
/// cannot be parsed.
pub fn build_filter(config: &ChatConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(config.log_filter()).map_err(|source| TelemetryError::InvalidFilter {
        filter: config.log_filter().to_owned(),
        source,
    })
}

/// Installs a structured `fmt` subscriber with target visibility.
///
/// # Errors
///
/// Returns [`TelemetryError`] when the filter is invalid or a global
/// subscriber is already set.
pub fn init_tracing(config: &ChatConfig) -> Result<(), TelemetryError> {
    let filter = build_filter(config)?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()?;
    tracing::debug!(
        reply_policy = config.reply_policy().as_str(),
        max_page_size = config.max_page_size(),
        "tracing initialised"
    );
    Ok(())
}

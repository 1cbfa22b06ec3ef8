//! Log subscriber setup.
//!
//! The engine only emits `tracing` events; installing a subscriber is the
//! host's choice. [`init_logging`] is the standard one.
//!
//! # Example
//!
//! ```ignore
//! use risk_engine::config::LoggingConfig;
//! use risk_engine::observability::init_logging;
//!
//! init_logging(&LoggingConfig::default())?;
//! ```

use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use crate::config::{LogFormat, LoggingConfig};

/// Errors installing the log subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The configured level is not a valid filter directive.
    #[error("Invalid log filter '{directive}': {source}")]
    InvalidFilter {
        /// The rejected directive.
        directive: String,
        /// Parser error.
        source: tracing_subscriber::filter::ParseError,
    },

    /// A global subscriber is already installed.
    #[error("Failed to install log subscriber: {0}")]
    Install(String),
}

/// Install a global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `config.level` when set.
///
/// # Errors
///
/// Returns an error if the level is not a valid filter or a subscriber is
/// already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = build_filter(config)?;
    let span_events = if config.include_spans {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let installed = match config.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(config.include_spans)
            .with_span_list(config.include_spans)
            .with_span_events(span_events)
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .pretty()
            .with_env_filter(filter)
            .with_span_events(span_events)
            .try_init(),
    };
    installed.map_err(|e| LoggingError::Install(e.to_string()))?;

    tracing::debug!(level = %config.level, format = ?config.format, "Logging initialized");
    Ok(())
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(&config.level).map_err(|source| LoggingError::InvalidFilter {
            directive: config.level.clone(),
            source,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_level_is_reported() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = LoggingConfig {
            level: "risk_engine=loud".to_string(),
            ..LoggingConfig::default()
        };
        let err = build_filter(&config).unwrap_err();
        assert!(err.to_string().contains("risk_engine=loud"));
    }

    #[test]
    fn valid_level_builds_filter() {
        let config = LoggingConfig {
            level: "risk_engine=debug,warn".to_string(),
            ..LoggingConfig::default()
        };
        assert!(build_filter(&config).is_ok());
    }
}

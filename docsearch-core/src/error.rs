//! src/error.rs
//! ============================================================================
//! # `AppError`: Unified Error Type for the Search Front-end
//!
//! Application-level failures (config loading and validation). Search
//! fetch failures have their own type in `tasks::search_task` and never
//! escape the dispatcher, so they are not represented here.

use std::{io, path::PathBuf};
use thiserror::Error;

/// Unified error type for application setup and runtime.
#[derive(Debug, Error)]
pub enum AppError {
    /// Standard IO error, auto-converted from `io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// TOML config parsing error.
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// TOML config serialization error.
    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Config file I/O error with path.
    #[error("Failed to read config file {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No platform config directory could be resolved.
    #[error("Could not determine a config directory for this platform")]
    NoConfigDir,

    /// Input validation errors
    #[error("Invalid input: {field} - {message}")]
    InvalidInput {
        field: String, // "endpoint", "base_url", etc.
        message: String,
    },

    /// Any other error, with description.
    #[error("Unexpected error: {0}")]
    Other(String),
}

impl AppError {
    #[must_use]
    /// Attach extra context to an error.
    pub fn with_context<S: Into<String>>(self, ctx: S) -> Self {
        Self::Other(format!("{}: {}", ctx.into(), self))
    }

    /// Create an input validation error
    pub fn invalid_input<S1: Into<String>, S2: Into<String>>(field: S1, message: S2) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }
}

// Allow conversion from `anyhow::Error` as fallback.
impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        Self::Other(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_context_wraps_message() {
        let err = AppError::invalid_input("endpoint", "must not be empty").with_context("config");
        assert_eq!(
            err.to_string(),
            "Unexpected error: config: Invalid input: endpoint - must not be empty"
        );
    }
}

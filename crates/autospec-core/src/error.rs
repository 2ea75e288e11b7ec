//! Error types for the AutoSpec core library.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error types for AutoSpec.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration loading or validation error.
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Affiliate configuration could not be parsed.
    #[error("Affiliate config error in {path}: {message}")]
    Affiliate { path: PathBuf, message: String },

    /// File system I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic configuration crate error.
    #[error("Config crate error: {0}")]
    ConfigCrate(#[from] config::ConfigError),
}

impl CoreError {
    /// Create a new configuration error with a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source.
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new affiliate config error.
    pub fn affiliate(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Affiliate {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error() {
        let err = CoreError::config("base_url cannot be empty");
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("base_url cannot be empty"));
    }

    #[test]
    fn test_config_error_keeps_source() {
        let io_err = std::io::Error::other("disk on fire");
        let err = CoreError::config_with_source("failed to read", io_err);
        let source = std::error::Error::source(&err).expect("source");
        assert!(source.to_string().contains("disk on fire"));
    }

    #[test]
    fn test_affiliate_error() {
        let err = CoreError::affiliate("config/affiliates.json", "expected an object");
        assert!(err.to_string().contains("config/affiliates.json"));
        assert!(err.to_string().contains("expected an object"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CoreError = io_err.into();
        assert!(err.to_string().contains("IO error"));
    }
}

//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("WebSocket path must start with '/'")]
    InvalidWebSocketPath,

    #[error("Invalid Redis URL format")]
    InvalidRedisUrl,

    #[error("Invalid Redis timeout")]
    InvalidTimeout,

    #[error("Bus channel prefix must be non-empty and contain no whitespace")]
    InvalidChannelPrefix,
}

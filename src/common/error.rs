//! Error handling module
//!
//! This module defines the crate-wide error type and result alias.

use thiserror::Error;

use crate::config::ConfigError;

/// Hub settings error type
#[derive(Error, Debug)]
pub enum HubError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Logger initialization error
    #[error("Logger error: {0}")]
    Logger(#[from] log::SetLoggerError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias
///
/// This is a `Result` type alias that uses our custom `HubError`.
pub type Result<T> = std::result::Result<T, HubError>;

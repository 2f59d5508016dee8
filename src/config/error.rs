//! Configuration errors
//!
//! This module defines error types for the configuration module.

use std::error::Error;
use std::fmt;

use crate::config::types::ValueType;

/// Configuration error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Property is not registered in the namespace
    UnknownProperty(String),

    /// Property name was registered twice
    DuplicateProperty(String),

    /// Property was read or written with the wrong value type
    TypeMismatch {
        property: String,
        expected: ValueType,
        actual: ValueType,
    },

    /// Invalid value for a property; the message is shown verbatim
    InvalidValue(String, String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownProperty(name) =>
                write!(f, "Unknown configuration property: {}", name),

            ConfigError::DuplicateProperty(name) =>
                write!(f, "Configuration property already registered: {}", name),

            ConfigError::TypeMismatch { property, expected, actual } =>
                write!(f, "Property '{}' holds {} values, not {}", property, expected, actual),

            ConfigError::InvalidValue(_, msg) =>
                write!(f, "{}", msg),
        }
    }
}

impl Error for ConfigError {}

/// Result type alias for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

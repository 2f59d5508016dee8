//! Configuration types
//!
//! Value types, value sources and the typed views of the hub settings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::defaults::{qualified_name, HUB_MODE_VALUES, MODE_KEY};
use crate::config::error::{ConfigError, Result};
use crate::config::validator::invalid_value_message;

/// Semantic type of a stored property value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// Free text
    Text,
    /// `true` or `false`
    Boolean,
    /// Signed 64-bit integer
    Integer,
}

impl ValueType {
    /// Check that `raw` can be read back as this type
    pub fn accepts(&self, raw: &str) -> bool {
        match self {
            ValueType::Text => true,
            ValueType::Boolean => raw.parse::<bool>().is_ok(),
            ValueType::Integer => raw.trim().parse::<i64>().is_ok(),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Text => write!(f, "text"),
            ValueType::Boolean => write!(f, "boolean"),
            ValueType::Integer => write!(f, "integer"),
        }
    }
}

/// Source of a configuration value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    /// Registered default value
    Default,
    /// Set by a caller
    Explicit,
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueSource::Default => write!(f, "default"),
            ValueSource::Explicit => write!(f, "explicit"),
        }
    }
}

/// Content sent to the hub during operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HubMode {
    /// Nothing is sent
    Off,
    /// Only operation metadata is sent
    Meta,
    /// Metadata and content are sent
    All,
}

impl Default for HubMode {
    fn default() -> Self {
        HubMode::All
    }
}

impl fmt::Display for HubMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HubMode::Off => write!(f, "off"),
            HubMode::Meta => write!(f, "meta"),
            HubMode::All => write!(f, "all"),
        }
    }
}

impl FromStr for HubMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "meta" => Ok(Self::Meta),
            "all" => Ok(Self::All),
            _ => {
                let property = qualified_name(MODE_KEY);
                let message = invalid_value_message(&property, Some(s), HUB_MODE_VALUES, ", ");
                Err(ConfigError::InvalidValue(property, message))
            }
        }
    }
}

/// Standard severity levels, ordered from most to least severe
///
/// Used as the secondary vocabulary when a hub log level is outside the
/// short allow-list. Each level also parses from its numeric weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StandardLevel {
    Off,
    Severe,
    Warning,
    Info,
    Config,
    Fine,
    Finer,
    Finest,
    All,
}

impl StandardLevel {
    const ALL_LEVELS: [StandardLevel; 9] = [
        StandardLevel::Off,
        StandardLevel::Severe,
        StandardLevel::Warning,
        StandardLevel::Info,
        StandardLevel::Config,
        StandardLevel::Fine,
        StandardLevel::Finer,
        StandardLevel::Finest,
        StandardLevel::All,
    ];

    /// Canonical upper-case name
    pub fn name(&self) -> &'static str {
        match self {
            StandardLevel::Off => "OFF",
            StandardLevel::Severe => "SEVERE",
            StandardLevel::Warning => "WARNING",
            StandardLevel::Info => "INFO",
            StandardLevel::Config => "CONFIG",
            StandardLevel::Fine => "FINE",
            StandardLevel::Finer => "FINER",
            StandardLevel::Finest => "FINEST",
            StandardLevel::All => "ALL",
        }
    }

    /// Numeric weight of the level
    pub fn value(&self) -> i32 {
        match self {
            StandardLevel::Off => i32::MAX,
            StandardLevel::Severe => 1000,
            StandardLevel::Warning => 900,
            StandardLevel::Info => 800,
            StandardLevel::Config => 700,
            StandardLevel::Fine => 500,
            StandardLevel::Finer => 400,
            StandardLevel::Finest => 300,
            StandardLevel::All => i32::MIN,
        }
    }

    /// Parse a level name (case-insensitive) or numeric weight
    ///
    /// Surrounding whitespace is not ignored.
    pub fn parse(s: &str) -> Option<Self> {
        if let Ok(weight) = s.parse::<i32>() {
            return Self::ALL_LEVELS.into_iter().find(|level| level.value() == weight);
        }
        Self::ALL_LEVELS
            .into_iter()
            .find(|level| level.name().eq_ignore_ascii_case(s))
    }

    /// Matching `log` filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            StandardLevel::Off => log::LevelFilter::Off,
            StandardLevel::Severe => log::LevelFilter::Error,
            StandardLevel::Warning => log::LevelFilter::Warn,
            StandardLevel::Info => log::LevelFilter::Info,
            StandardLevel::Config | StandardLevel::Fine => log::LevelFilter::Debug,
            StandardLevel::Finer | StandardLevel::Finest | StandardLevel::All => {
                log::LevelFilter::Trace
            }
        }
    }
}

impl fmt::Display for StandardLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StandardLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| {
            ConfigError::InvalidValue("level".to_string(), format!("Bad level \"{}\"", s))
        })
    }
}

/// Map a resolved hub log level name to a `log` filter
///
/// Accepts the hub allow-list names (`WARN`, `ERROR`, ...) as well as any
/// standard level; anything else filters at `Info`.
pub fn level_filter_for(name: &str) -> log::LevelFilter {
    match name.to_uppercase().as_str() {
        "WARN" => log::LevelFilter::Warn,
        "ERROR" => log::LevelFilter::Error,
        other => StandardLevel::parse(other)
            .map(|level| level.to_level_filter())
            .unwrap_or(log::LevelFilter::Info),
    }
}

//! Default configuration values
//!
//! Single source of truth for the hub namespace, property keys, defaults
//! and allowed values. These strings are part of the external contract and
//! must not change.

/// Namespace holding every hub property
pub const NAMESPACE: &str = "liquibase.hub";

/// API key property
pub const API_KEY_KEY: &str = "apiKey";

/// Hub URL property
pub const URL_KEY: &str = "url";

/// Content-sharing mode property
pub const MODE_KEY: &str = "mode";

/// Log filtering level property
pub const LOG_LEVEL_KEY: &str = "logLevel";

/// Default hub mode
pub const DEFAULT_MODE: &str = "all";

/// Default hub log level
pub const DEFAULT_LOG_LEVEL: &str = "INFO";

/// URL returned when no (valid) URL is stored
pub const DEFAULT_HUB_URL: &str = "https://hub.liquibase.com";

/// Characters of the API key shown by the secure description
pub const API_KEY_VISIBLE_CHARS: usize = 6;

/// Mask appended to the visible part of the API key
pub const API_KEY_MASK: &str = "************";

/// Accepted hub modes, compared case-insensitively
pub const HUB_MODE_VALUES: &[&str] = &["off", "meta", "all"];

/// Accepted hub log levels, compared case-insensitively
pub const HUB_LOG_LEVEL_VALUES: &[&str] = &["OFF", "FINE", "WARN", "ERROR", "INFO"];

/// Fully qualified name of a hub property, e.g. `liquibase.hub.mode`
pub fn qualified_name(key: &str) -> String {
    format!("{}.{}", NAMESPACE, key)
}

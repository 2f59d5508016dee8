//! Hub settings
//!
//! Typed, validated view over the `liquibase.hub` properties. Every property
//! is described once in [`HUB_PROPERTIES`]; the accessors only pick the row
//! and let its [`ValuePolicy`] decide what the caller gets back.

use std::fmt;
use std::sync::Arc;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::common;
use crate::config::defaults::{
    API_KEY_KEY, API_KEY_MASK, API_KEY_VISIBLE_CHARS, DEFAULT_HUB_URL, DEFAULT_LOG_LEVEL,
    DEFAULT_MODE, HUB_LOG_LEVEL_VALUES, HUB_MODE_VALUES, LOG_LEVEL_KEY, MODE_KEY, NAMESPACE,
    URL_KEY,
};
use crate::config::error::{ConfigError, Result};
use crate::config::registry::{Normalizer, PropertyDefinition, PropertyRegistry};
use crate::config::traits::{Diagnostics, LogDiagnostics, PropertyContainer};
use crate::config::types::{level_filter_for, HubMode, StandardLevel, ValueSource, ValueType};
use crate::config::validator::{resolve, ValuePolicy};

/// Component name reported with diagnostics
const COMPONENT: &str = module_path!();

// scheme://[userinfo@]host[:port] at the start of the value
static HUB_URL_ORIGIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z0-9+.\-]*://)(?:[^@/?#\s]*@)?([^@/?#\s]+)")
        .expect("hub URL pattern should be valid")
});

/// Reduce a URL to its origin, `None` when it does not start with one
///
/// Credentials in front of the host are dropped along with the path.
pub fn normalize_hub_url(raw: &str) -> Option<String> {
    HUB_URL_ORIGIN
        .captures(raw)
        .map(|origin| format!("{}{}", &origin[1], &origin[2]))
}

/// Canonical standard level name for a value outside the hub allow-list
fn reinterpret_log_level(raw: &str) -> Option<String> {
    StandardLevel::parse(raw).map(|level| level.name().to_string())
}

/// One row of the hub property table
#[derive(Clone, Copy)]
pub struct HubProperty {
    pub key: &'static str,
    pub description: &'static str,
    pub default_value: Option<&'static str>,
    pub normalizer: Option<Normalizer>,
    pub policy: ValuePolicy,
    pub secret: bool,
}

impl HubProperty {
    /// Registry definition for this row
    pub fn definition(&self) -> PropertyDefinition {
        let mut definition =
            PropertyDefinition::new(self.key, ValueType::Text).with_description(self.description);
        if let Some(default_value) = self.default_value {
            definition = definition.with_default(default_value);
        }
        if let Some(normalizer) = self.normalizer {
            definition = definition.with_normalizer(normalizer);
        }
        if self.secret {
            definition = definition.secret();
        }
        definition
    }
}

/// Every property of the hub namespace
pub static HUB_PROPERTIES: [HubProperty; 4] = [
    HubProperty {
        key: API_KEY_KEY,
        description: "Liquibase Hub API key for operations",
        default_value: None,
        normalizer: None,
        policy: ValuePolicy::Opaque,
        secret: true,
    },
    HubProperty {
        key: URL_KEY,
        description: "Liquibase Hub URL for operations",
        default_value: None,
        normalizer: Some(normalize_hub_url as Normalizer),
        policy: ValuePolicy::FallbackWhenEmpty(DEFAULT_HUB_URL),
        secret: false,
    },
    HubProperty {
        key: MODE_KEY,
        description: "Content to send to Liquibase Hub during operations. \
                      Values can be 'all', 'meta', or 'off'",
        default_value: Some(DEFAULT_MODE),
        normalizer: None,
        policy: ValuePolicy::Strict { allowed: HUB_MODE_VALUES },
        secret: false,
    },
    HubProperty {
        key: LOG_LEVEL_KEY,
        description: "Log level for filtering log messages to send to Liquibase Hub during \
                      operations. Values can be any acceptable log level.",
        default_value: Some(DEFAULT_LOG_LEVEL),
        normalizer: None,
        policy: ValuePolicy::Lenient {
            allowed: HUB_LOG_LEVEL_VALUES,
            reinterpret: reinterpret_log_level,
            fallback: DEFAULT_LOG_LEVEL,
        },
        secret: false,
    },
];

fn hub_property(key: &str) -> Option<&'static HubProperty> {
    HUB_PROPERTIES.iter().find(|property| property.key == key)
}

/// Validated settings of the hub integration
///
/// Holds no values itself; everything is read from and written to the
/// shared property container. Cloning is cheap and shares the container.
pub struct HubSettings<C: PropertyContainer = PropertyRegistry> {
    container: Arc<C>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl HubSettings<PropertyRegistry> {
    /// Hub settings backed by a fresh `liquibase.hub` registry
    pub fn standalone() -> Result<Self> {
        Self::new(Arc::new(PropertyRegistry::new(NAMESPACE)))
    }
}

impl<C: PropertyContainer> HubSettings<C> {
    /// Register the hub properties on `container`, warning through `log`
    pub fn new(container: Arc<C>) -> Result<Self> {
        Self::with_diagnostics(container, Arc::new(LogDiagnostics))
    }

    /// Register the hub properties on `container` with a custom warning sink
    pub fn with_diagnostics(container: Arc<C>, diagnostics: Arc<dyn Diagnostics>) -> Result<Self> {
        for property in HUB_PROPERTIES.iter() {
            container.register_property(property.definition())?;
        }
        debug!(
            "Registered {} hub properties in namespace {}",
            HUB_PROPERTIES.len(),
            container.namespace()
        );

        Ok(Self { container, diagnostics })
    }

    /// Underlying property container
    pub fn container(&self) -> &Arc<C> {
        &self.container
    }

    /// The property table these settings enforce
    pub fn properties(&self) -> &'static [HubProperty] {
        &HUB_PROPERTIES
    }

    fn qualified(&self, key: &str) -> String {
        format!("{}.{}", self.container.namespace(), key)
    }

    fn lookup(&self, key: &str) -> Result<&'static HubProperty> {
        hub_property(key).ok_or_else(|| ConfigError::UnknownProperty(self.qualified(key)))
    }

    fn resolved(&self, key: &str) -> Result<Option<String>> {
        let property = self.lookup(key)?;
        let raw = self.container.get_value(key, ValueType::Text)?;
        resolve(
            &property.policy,
            &self.qualified(key),
            raw,
            self.diagnostics.as_ref(),
            COMPONENT,
        )
    }

    /// Set any hub property by key
    ///
    /// Keys are the short names (`apiKey`, `url`, `mode`, `logLevel`).
    pub fn set_value<'a>(&self, key: &str, value: impl Into<Option<&'a str>>) -> Result<&Self> {
        self.lookup(key)?;
        self.container.set_value(key, value.into())?;
        Ok(self)
    }

    /// Return a hub property to its default
    pub fn reset_value(&self, key: &str) -> Result<&Self> {
        self.lookup(key)?;
        self.container.clear_value(key)?;
        Ok(self)
    }

    /// Where the current value of a hub property comes from
    pub fn source(&self, key: &str) -> Option<ValueSource> {
        hub_property(key).and_then(|_| self.container.source(key))
    }

    pub fn api_key(&self) -> Result<Option<String>> {
        self.resolved(API_KEY_KEY)
    }

    pub fn set_api_key<'a>(&self, api_key: impl Into<Option<&'a str>>) -> Result<&Self> {
        self.set_value(API_KEY_KEY, api_key)
    }

    /// The API key in a form that is safe for message output
    ///
    /// Shows at most the first six characters followed by a fixed mask, so
    /// the output length says nothing about the key length. `None` when no
    /// key is configured.
    pub fn api_key_secure_description(&self) -> Result<Option<String>> {
        Ok(self.api_key()?.map(|key| {
            let visible: String = key.chars().take(API_KEY_VISIBLE_CHARS).collect();
            format!("{}{}", visible, API_KEY_MASK)
        }))
    }

    /// Hub base URL, `https://hub.liquibase.com` unless a valid one is set
    pub fn url(&self) -> Result<String> {
        Ok(self
            .resolved(URL_KEY)?
            .unwrap_or_else(|| DEFAULT_HUB_URL.to_string()))
    }

    /// Store the hub URL; only `scheme://host[:port]` is kept
    pub fn set_url<'a>(&self, url: impl Into<Option<&'a str>>) -> Result<&Self> {
        self.set_value(URL_KEY, url)
    }

    /// Hub mode exactly as stored, after validation
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when the stored value is not
    /// `off`, `meta` or `all` (in any case).
    pub fn mode(&self) -> Result<String> {
        Ok(self.resolved(MODE_KEY)?.unwrap_or_default())
    }

    /// Hub mode as an enum
    pub fn hub_mode(&self) -> Result<HubMode> {
        self.mode()?.parse()
    }

    pub fn set_mode<'a>(&self, mode: impl Into<Option<&'a str>>) -> Result<&Self> {
        self.set_value(MODE_KEY, mode)
    }

    /// Hub log level, never invalid
    ///
    /// Values outside `OFF, FINE, WARN, ERROR, INFO` are read as a standard
    /// level name (`SEVERE`, `FINEST`, ...) when possible and as `INFO`
    /// otherwise, in which case a warning is reported.
    pub fn log_level(&self) -> Result<String> {
        Ok(self
            .resolved(LOG_LEVEL_KEY)?
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()))
    }

    /// Filter for log records forwarded to the hub
    pub fn log_level_filter(&self) -> Result<log::LevelFilter> {
        Ok(level_filter_for(&self.log_level()?))
    }

    pub fn set_log_level<'a>(&self, log_level: impl Into<Option<&'a str>>) -> Result<&Self> {
        self.set_value(LOG_LEVEL_KEY, log_level)
    }

    /// Display-safe copy of the current settings
    pub fn snapshot(&self) -> Result<HubSnapshot> {
        Ok(HubSnapshot {
            namespace: self.container.namespace().to_string(),
            api_key: self.api_key_secure_description()?,
            url: self.url()?,
            mode: self.mode()?,
            log_level: self.log_level()?,
        })
    }

    /// Log the settings with their sources at debug level
    pub fn log(&self) {
        if !log::log_enabled!(log::Level::Debug) {
            return;
        }

        let describe = |value: Result<String>| value.unwrap_or_else(|e| format!("<{}>", e));
        let source = |key: &str| {
            let source = self
                .source(key)
                .map(|source| source.to_string())
                .unwrap_or_else(|| "unset".to_string());
            match hub_property(key) {
                Some(property) => format!("{}, {}", source, property.policy.name()),
                None => source,
            }
        };

        debug!("=== Hub settings ({}) ===", self.container.namespace());
        debug!(
            "  API key: {} (from {})",
            describe(
                self.api_key_secure_description()
                    .map(|key| key.unwrap_or_else(|| "none".to_string()))
            ),
            source(API_KEY_KEY)
        );
        debug!("  URL: {} (from {})", describe(self.url()), source(URL_KEY));
        debug!("  Mode: {} (from {})", describe(self.mode()), source(MODE_KEY));
        debug!("  Log level: {} (from {})", describe(self.log_level()), source(LOG_LEVEL_KEY));
        debug!("=========================");
    }
}

impl<C: PropertyContainer> Clone for HubSettings<C> {
    fn clone(&self) -> Self {
        Self {
            container: Arc::clone(&self.container),
            diagnostics: Arc::clone(&self.diagnostics),
        }
    }
}

impl<C: PropertyContainer> fmt::Debug for HubSettings<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HubSettings")
            .field("namespace", &self.container.namespace())
            .finish_non_exhaustive()
    }
}

/// Resolved hub settings with the API key masked
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HubSnapshot {
    pub namespace: String,
    pub api_key: Option<String>,
    pub url: String,
    pub mode: String,
    pub log_level: String,
}

impl HubSnapshot {
    /// Pretty-printed JSON
    pub fn to_json(&self) -> common::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::traits::MockDiagnostics;

    fn settings_with(diagnostics: MockDiagnostics) -> HubSettings {
        HubSettings::with_diagnostics(
            Arc::new(PropertyRegistry::new(NAMESPACE)),
            Arc::new(diagnostics),
        )
        .unwrap()
    }

    fn quiet_settings() -> HubSettings {
        let mut diagnostics = MockDiagnostics::new();
        diagnostics.expect_warn().never();
        settings_with(diagnostics)
    }

    #[test]
    fn test_normalize_hub_url() {
        assert_eq!(
            normalize_hub_url("https://hub.example.com/api/v1?x=1").as_deref(),
            Some("https://hub.example.com")
        );
        assert_eq!(
            normalize_hub_url("http://localhost:8888/").as_deref(),
            Some("http://localhost:8888")
        );
        assert_eq!(
            normalize_hub_url("https://hub.example.com?query#frag").as_deref(),
            Some("https://hub.example.com")
        );
        assert_eq!(
            normalize_hub_url("https://user:pw@hub.example.com/x").as_deref(),
            Some("https://hub.example.com")
        );
        assert_eq!(
            normalize_hub_url("http://user@localhost:8080/").as_deref(),
            Some("http://localhost:8080")
        );
        assert_eq!(normalize_hub_url("hub.example.com/api"), None);
        assert_eq!(normalize_hub_url("https://"), None);
        assert_eq!(normalize_hub_url(" https://hub.example.com"), None);
        assert_eq!(normalize_hub_url(""), None);
    }

    #[test]
    fn test_definitions_match_table() {
        let settings = quiet_settings();
        let registry = settings.container();

        let url = registry.definition(URL_KEY).unwrap();
        assert!(url.normalizer.is_some());
        assert_eq!(url.default_value, None);

        let mode = registry.definition(MODE_KEY).unwrap();
        assert_eq!(mode.default_value.as_deref(), Some("all"));
        assert!(mode.normalizer.is_none());

        let log_level = registry.definition(LOG_LEVEL_KEY).unwrap();
        assert_eq!(log_level.default_value.as_deref(), Some("INFO"));

        let api_key = registry.definition(API_KEY_KEY).unwrap();
        assert!(api_key.secret);
        assert_eq!(api_key.value_type, ValueType::Text);
    }

    #[test]
    fn test_policy_per_property() {
        let settings = quiet_settings();
        let policies: Vec<(&str, &str)> = settings
            .properties()
            .iter()
            .map(|property| (property.key, property.policy.name()))
            .collect();
        assert_eq!(
            policies,
            vec![
                ("apiKey", "opaque"),
                ("url", "fallback-when-empty"),
                ("mode", "strict"),
                ("logLevel", "lenient"),
            ]
        );

        // Invalid values are described, not fatal, in the dump
        settings.set_mode("bogus").unwrap();
        settings.log();
    }

    #[test]
    fn test_registering_twice_fails() {
        let registry = Arc::new(PropertyRegistry::new(NAMESPACE));
        HubSettings::new(Arc::clone(&registry)).unwrap();
        let err = HubSettings::new(registry).unwrap_err();
        assert_eq!(err, ConfigError::DuplicateProperty("liquibase.hub.apiKey".to_string()));
    }

    #[test]
    fn test_unknown_log_level_warns_once() {
        let mut diagnostics = MockDiagnostics::new();
        diagnostics
            .expect_warn()
            .withf(|component, message| {
                component.to_string() == COMPONENT
                    && message.contains("liquibase.hub.logLevel")
                    && message.contains("verbose")
                    && message.contains("OFF, FINE, WARN, ERROR, INFO")
            })
            .times(1)
            .return_const(());
        let settings = settings_with(diagnostics);

        settings.set_log_level("verbose").unwrap();
        assert_eq!(settings.log_level().unwrap(), "INFO");
    }

    #[test]
    fn test_padded_level_is_not_a_standard_name() {
        let mut diagnostics = MockDiagnostics::new();
        diagnostics
            .expect_warn()
            .withf(|_, message| message.contains("value of  severe  detected"))
            .times(1)
            .return_const(());
        let settings = settings_with(diagnostics);

        settings.set_log_level(" severe ").unwrap();
        assert_eq!(settings.log_level().unwrap(), "INFO");
    }

    #[test]
    fn test_standard_level_does_not_warn() {
        let settings = quiet_settings();
        settings.set_log_level("severe").unwrap();
        assert_eq!(settings.log_level().unwrap(), "SEVERE");
        assert_eq!(settings.log_level_filter().unwrap(), log::LevelFilter::Error);

        settings.set_log_level("warn").unwrap();
        assert_eq!(settings.log_level().unwrap(), "warn");
        assert_eq!(settings.log_level_filter().unwrap(), log::LevelFilter::Warn);
    }

    #[test]
    fn test_null_log_level_falls_back() {
        let mut diagnostics = MockDiagnostics::new();
        diagnostics
            .expect_warn()
            .withf(|_, message| message.contains("value of null"))
            .times(1)
            .return_const(());
        let settings = settings_with(diagnostics);

        settings.set_log_level(None).unwrap();
        assert_eq!(settings.log_level().unwrap(), "INFO");
    }

    #[test]
    fn test_mode_error_is_not_reported_as_warning() {
        let settings = quiet_settings();
        settings.set_mode("bogus").unwrap();
        let err = settings.mode().unwrap_err();
        assert_eq!(
            err.to_string(),
            "An invalid liquibase.hub.mode value of bogus detected. \
             Acceptable values are off, meta, all"
        );
        assert!(settings.hub_mode().is_err());
    }

    #[test]
    fn test_set_value_rejects_foreign_keys() {
        let settings = quiet_settings();
        let err = settings.set_value("color", "red").unwrap_err();
        assert_eq!(err, ConfigError::UnknownProperty("liquibase.hub.color".to_string()));
        assert!(settings.reset_value("color").is_err());
        assert_eq!(settings.source("color"), None);
    }

    #[test]
    fn test_secure_description_short_key() {
        let settings = quiet_settings();
        settings.set_api_key("abc").unwrap();
        assert_eq!(
            settings.api_key_secure_description().unwrap().as_deref(),
            Some("abc************")
        );

        settings.set_api_key("ключ-секрет").unwrap();
        assert_eq!(
            settings.api_key_secure_description().unwrap().as_deref(),
            Some("ключ-с************")
        );
    }

    #[test]
    fn test_snapshot_masks_api_key() {
        let settings = quiet_settings();
        settings
            .set_api_key("abcdef1234567890")
            .unwrap()
            .set_url("https://hub.example.com/x")
            .unwrap();

        let snapshot = settings.snapshot().unwrap();
        assert_eq!(snapshot.api_key.as_deref(), Some("abcdef************"));
        assert_eq!(snapshot.url, "https://hub.example.com");
        assert_eq!(snapshot.mode, "all");
        assert_eq!(snapshot.log_level, "INFO");

        let json = snapshot.to_json().unwrap();
        assert!(json.contains("\"apiKey\": \"abcdef************\""));
        assert!(json.contains("\"logLevel\": \"INFO\""));
        assert!(!json.contains("1234567890"));
    }
}

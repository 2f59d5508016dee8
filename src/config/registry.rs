//! Property registry
//!
//! In-memory, thread-safe implementation of [`PropertyContainer`]. Values are
//! kept per namespace together with the definitions that describe them.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::debug;

use crate::config::error::{ConfigError, Result};
use crate::config::traits::PropertyContainer;
use crate::config::types::{ValueSource, ValueType};

/// Pure transformation applied to a value before it is stored
pub type Normalizer = fn(&str) -> Option<String>;

/// Metadata of one named property
#[derive(Clone)]
pub struct PropertyDefinition {
    /// Key, unique within the namespace
    pub name: String,
    /// Semantic type of the stored value
    pub value_type: ValueType,
    /// Human-readable documentation
    pub description: String,
    /// Value used while nothing has been set
    pub default_value: Option<String>,
    /// Write-time transformation of the raw value
    pub normalizer: Option<Normalizer>,
    /// Keep the value out of logs
    pub secret: bool,
}

impl fmt::Debug for PropertyDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDefinition")
            .field("name", &self.name)
            .field("value_type", &self.value_type)
            .field("description", &self.description)
            .field("default_value", &self.default_value)
            .field("normalizer", &self.normalizer.is_some())
            .field("secret", &self.secret)
            .finish()
    }
}

impl PropertyDefinition {
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            description: String::new(),
            default_value: None,
            normalizer: None,
            secret: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    /// Run the normalizer, if any, over a raw value
    pub fn normalize(&self, raw: &str) -> Option<String> {
        match self.normalizer {
            Some(normalizer) => normalizer(raw),
            None => Some(raw.to_string()),
        }
    }
}

#[derive(Debug, Default)]
struct RegistryState {
    definitions: BTreeMap<String, PropertyDefinition>,
    // Present key means explicitly set, possibly to null
    values: HashMap<String, Option<String>>,
}

/// Property registry for a single namespace
#[derive(Debug)]
pub struct PropertyRegistry {
    namespace: String,
    state: RwLock<RegistryState>,
}

impl PropertyRegistry {
    /// Create an empty registry
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            state: RwLock::new(RegistryState::default()),
        }
    }

    /// All registered definitions, ordered by name
    pub fn properties(&self) -> Vec<PropertyDefinition> {
        self.read().definitions.values().cloned().collect()
    }

    fn qualified(&self, name: &str) -> String {
        format!("{}.{}", self.namespace, name)
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_type(&self, definition: &PropertyDefinition, value: &str) -> Result<()> {
        if definition.value_type.accepts(value) {
            return Ok(());
        }
        let property = self.qualified(&definition.name);
        let message = format!(
            "Invalid value for '{}': expected {} but got '{}'",
            property, definition.value_type, value
        );
        Err(ConfigError::InvalidValue(property, message))
    }
}

impl PropertyContainer for PropertyRegistry {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn register_property(&self, definition: PropertyDefinition) -> Result<()> {
        if let Some(default_value) = &definition.default_value {
            self.check_type(&definition, default_value)?;
        }

        let mut state = self.write();
        if state.definitions.contains_key(&definition.name) {
            return Err(ConfigError::DuplicateProperty(self.qualified(&definition.name)));
        }

        debug!(
            "Registered property {} ({}, default: {})",
            self.qualified(&definition.name),
            definition.value_type,
            definition.default_value.as_deref().unwrap_or("none")
        );
        state.definitions.insert(definition.name.clone(), definition);
        Ok(())
    }

    fn get_value(&self, name: &str, value_type: ValueType) -> Result<Option<String>> {
        let state = self.read();
        let definition = state
            .definitions
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProperty(self.qualified(name)))?;

        if definition.value_type != value_type {
            return Err(ConfigError::TypeMismatch {
                property: self.qualified(name),
                expected: definition.value_type,
                actual: value_type,
            });
        }

        Ok(match state.values.get(name) {
            Some(value) => value.clone(),
            None => definition.default_value.clone(),
        })
    }

    fn set_value(&self, name: &str, value: Option<&str>) -> Result<()> {
        let mut state = self.write();
        let definition = state
            .definitions
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProperty(self.qualified(name)))?;

        let normalized = value.and_then(|raw| definition.normalize(raw));
        if let Some(normalized) = &normalized {
            self.check_type(definition, normalized)?;
        }

        if definition.secret {
            debug!("Set {} = <redacted>", self.qualified(name));
        } else {
            debug!(
                "Set {} = {}",
                self.qualified(name),
                normalized.as_deref().unwrap_or("null")
            );
        }

        state.values.insert(name.to_string(), normalized);
        Ok(())
    }

    fn clear_value(&self, name: &str) -> Result<()> {
        let mut state = self.write();
        if !state.definitions.contains_key(name) {
            return Err(ConfigError::UnknownProperty(self.qualified(name)));
        }
        state.values.remove(name);
        Ok(())
    }

    fn source(&self, name: &str) -> Option<ValueSource> {
        let state = self.read();
        if state.values.contains_key(name) {
            return Some(ValueSource::Explicit);
        }
        state
            .definitions
            .get(name)
            .and_then(|definition| definition.default_value.as_ref())
            .map(|_| ValueSource::Default)
    }

    fn definition(&self, name: &str) -> Option<PropertyDefinition> {
        self.read().definitions.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trim_normalizer(raw: &str) -> Option<String> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    fn registry() -> PropertyRegistry {
        let registry = PropertyRegistry::new("test.ns");
        let definitions = [
            PropertyDefinition::new("name", ValueType::Text).with_default("anon"),
            PropertyDefinition::new("trimmed", ValueType::Text).with_normalizer(trim_normalizer),
            PropertyDefinition::new("retries", ValueType::Integer).with_default("3"),
        ];
        for definition in definitions {
            registry.register_property(definition).unwrap();
        }
        registry
    }

    #[test]
    fn test_default_until_set() {
        let registry = registry();
        assert_eq!(registry.get_value("name", ValueType::Text).unwrap().as_deref(), Some("anon"));
        assert_eq!(registry.source("name"), Some(ValueSource::Default));

        registry.set_value("name", Some("bob")).unwrap();
        assert_eq!(registry.get_value("name", ValueType::Text).unwrap().as_deref(), Some("bob"));
        assert_eq!(registry.source("name"), Some(ValueSource::Explicit));

        registry.clear_value("name").unwrap();
        assert_eq!(registry.get_value("name", ValueType::Text).unwrap().as_deref(), Some("anon"));
    }

    #[test]
    fn test_explicit_null_overrides_default() {
        let registry = registry();
        registry.set_value("name", None).unwrap();
        assert_eq!(registry.get_value("name", ValueType::Text).unwrap(), None);
        assert_eq!(registry.source("name"), Some(ValueSource::Explicit));
    }

    #[test]
    fn test_normalizer_runs_on_write() {
        let registry = registry();
        registry.set_value("trimmed", Some("  padded  ")).unwrap();
        assert_eq!(
            registry.get_value("trimmed", ValueType::Text).unwrap().as_deref(),
            Some("padded")
        );

        registry.set_value("trimmed", Some("   ")).unwrap();
        assert_eq!(registry.get_value("trimmed", ValueType::Text).unwrap(), None);
        assert_eq!(registry.source("trimmed"), Some(ValueSource::Explicit));
    }

    #[test]
    fn test_unset_without_default_has_no_source() {
        let registry = registry();
        assert_eq!(registry.source("trimmed"), None);
        assert_eq!(registry.source("missing"), None);
    }

    #[test]
    fn test_unknown_property() {
        let registry = registry();
        let err = registry.set_value("missing", Some("x")).unwrap_err();
        assert_eq!(err, ConfigError::UnknownProperty("test.ns.missing".to_string()));
        assert!(registry.get_value("missing", ValueType::Text).is_err());
        assert!(registry.clear_value("missing").is_err());
    }

    #[test]
    fn test_duplicate_registration() {
        let registry = registry();
        let err = registry
            .register_property(PropertyDefinition::new("name", ValueType::Text))
            .unwrap_err();
        assert_eq!(err, ConfigError::DuplicateProperty("test.ns.name".to_string()));
    }

    #[test]
    fn test_type_checks() {
        let registry = registry();
        assert!(matches!(
            registry.get_value("retries", ValueType::Text),
            Err(ConfigError::TypeMismatch {
                expected: ValueType::Integer,
                actual: ValueType::Text,
                ..
            })
        ));

        let err = registry.set_value("retries", Some("many")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref name, _) if name == "test.ns.retries"));

        registry.set_value("retries", Some("5")).unwrap();
        assert_eq!(
            registry.get_value("retries", ValueType::Integer).unwrap().as_deref(),
            Some("5")
        );

        let bad_default = PropertyDefinition::new("flag", ValueType::Boolean).with_default("maybe");
        assert!(registry.register_property(bad_default).is_err());
    }

    #[test]
    fn test_properties_listing() {
        let registry = registry();
        let names: Vec<String> = registry.properties().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["name", "retries", "trimmed"]);
        assert_eq!(registry.namespace(), "test.ns");
    }
}

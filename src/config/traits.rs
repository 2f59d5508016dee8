//! Configuration traits
//!
//! Seams between the hub settings and their collaborators: the property
//! container that stores values and the sink that receives warnings.

use crate::config::error::Result;
use crate::config::registry::PropertyDefinition;
use crate::config::types::{ValueSource, ValueType};

/// Named, typed property storage for one namespace
///
/// Methods take `&self`; implementations provide their own interior
/// mutability so a container can be shared behind an `Arc`.
pub trait PropertyContainer: Send + Sync {
    /// Namespace prefix of every property, e.g. `liquibase.hub`
    fn namespace(&self) -> &str;

    /// Register a property definition
    ///
    /// Fails if a property with the same name already exists.
    fn register_property(&self, definition: PropertyDefinition) -> Result<()>;

    /// Read a value, falling back to the registered default when unset
    fn get_value(&self, name: &str, value_type: ValueType) -> Result<Option<String>>;

    /// Store a value, running the property's normalizer first
    ///
    /// `None` stores an explicit null.
    fn set_value(&self, name: &str, value: Option<&str>) -> Result<()>;

    /// Forget an explicitly set value so the default applies again
    fn clear_value(&self, name: &str) -> Result<()>;

    /// Where the current value comes from, `None` when unset without default
    fn source(&self, name: &str) -> Option<ValueSource>;

    /// Registered definition of a property
    fn definition(&self, name: &str) -> Option<PropertyDefinition>;
}

/// Receiver of non-fatal diagnostics
#[cfg_attr(test, mockall::automock)]
pub trait Diagnostics: Send + Sync {
    /// Report a warning raised by `source_component`
    fn warn(&self, source_component: &str, message: &str);
}

/// Diagnostics backed by the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn warn(&self, source_component: &str, message: &str) {
        log::warn!(target: source_component, "{}", message);
    }
}

//! Configuration module
//!
//! Typed settings for the hub integration on top of a generic property
//! registry. Values are normalized when written and validated when read.

pub mod defaults;
pub mod error;
pub mod hub;
pub mod registry;
pub mod traits;
pub mod types;
pub mod validator;

pub use self::error::{ConfigError, Result};
pub use self::hub::{normalize_hub_url, HubProperty, HubSettings, HubSnapshot, HUB_PROPERTIES};
pub use self::registry::{Normalizer, PropertyDefinition, PropertyRegistry};
pub use self::traits::{Diagnostics, LogDiagnostics, PropertyContainer};
pub use self::types::{HubMode, StandardLevel, ValueSource, ValueType};
pub use self::validator::ValuePolicy;

pub use self::defaults::{DEFAULT_HUB_URL, DEFAULT_LOG_LEVEL, DEFAULT_MODE, NAMESPACE};

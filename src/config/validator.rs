//! Configuration validator
//!
//! Named policies deciding how a stored value becomes the value handed to
//! callers. A property opts into exactly one policy; the accessor layer
//! evaluates them all through [`resolve`].

use std::fmt;

use crate::config::error::{ConfigError, Result};
use crate::config::traits::Diagnostics;

/// Second chance for a value outside a lenient allow-list
pub type Reinterpret = fn(&str) -> Option<String>;

/// Read-time handling of a stored value
#[derive(Clone, Copy)]
pub enum ValuePolicy {
    /// Hand the stored value back untouched
    Opaque,
    /// Replace a null or empty value with a literal
    FallbackWhenEmpty(&'static str),
    /// Reject anything outside the allow-list
    Strict {
        allowed: &'static [&'static str],
    },
    /// Reinterpret or replace anything outside the allow-list, with a warning
    Lenient {
        allowed: &'static [&'static str],
        reinterpret: Reinterpret,
        fallback: &'static str,
    },
}

impl ValuePolicy {
    /// Short policy name, used in logs
    pub fn name(&self) -> &'static str {
        match self {
            ValuePolicy::Opaque => "opaque",
            ValuePolicy::FallbackWhenEmpty(_) => "fallback-when-empty",
            ValuePolicy::Strict { .. } => "strict",
            ValuePolicy::Lenient { .. } => "lenient",
        }
    }
}

impl fmt::Debug for ValuePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValuePolicy::Opaque => write!(f, "Opaque"),
            ValuePolicy::FallbackWhenEmpty(value) => write!(f, "FallbackWhenEmpty({:?})", value),
            ValuePolicy::Strict { allowed } => write!(f, "Strict {:?}", allowed),
            ValuePolicy::Lenient { allowed, fallback, .. } => {
                write!(f, "Lenient {:?} (fallback {:?})", allowed, fallback)
            }
        }
    }
}

/// Message shared by every rejected or replaced value
pub fn invalid_value_message(
    property: &str,
    value: Option<&str>,
    allowed: &[&str],
    separator: &str,
) -> String {
    format!(
        "An invalid {} value of {} detected. Acceptable values are {}",
        property,
        value.unwrap_or("null"),
        allowed.join(separator)
    )
}

fn is_allowed(allowed: &[&str], value: &str) -> bool {
    allowed.iter().any(|candidate| candidate.eq_ignore_ascii_case(value))
}

/// Apply `policy` to the raw value of `property`
///
/// Only `Strict` can fail. `Lenient` reports replacements through
/// `diagnostics` on behalf of `component`.
pub fn resolve(
    policy: &ValuePolicy,
    property: &str,
    raw: Option<String>,
    diagnostics: &dyn Diagnostics,
    component: &str,
) -> Result<Option<String>> {
    match policy {
        ValuePolicy::Opaque => Ok(raw),

        ValuePolicy::FallbackWhenEmpty(fallback) => match raw {
            Some(value) if !value.is_empty() => Ok(Some(value)),
            _ => Ok(Some(fallback.to_string())),
        },

        ValuePolicy::Strict { allowed } => match raw {
            Some(value) if is_allowed(allowed, &value) => Ok(Some(value)),
            other => Err(ConfigError::InvalidValue(
                property.to_string(),
                invalid_value_message(property, other.as_deref(), allowed, ", "),
            )),
        },

        ValuePolicy::Lenient { allowed, reinterpret, fallback } => match raw {
            Some(value) if is_allowed(allowed, &value) => Ok(Some(value)),
            other => {
                if let Some(reinterpreted) = other.as_deref().and_then(reinterpret) {
                    return Ok(Some(reinterpreted));
                }
                let message = invalid_value_message(property, other.as_deref(), allowed, ", ");
                diagnostics.warn(component, &message);
                Ok(Some(fallback.to_string()))
            }
        },
    }
}

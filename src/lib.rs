//! Hub Settings: validated configuration for the Liquibase Hub integration
//!
//! This library exposes the `liquibase.hub` settings (API key, URL, mode and
//! log level) as typed accessors over a shared property registry.
//!
//! # Main Features
//!
//! - URL values reduced to their `scheme://host[:port]` origin on write
//! - Strict validation of the hub mode, lenient normalization of the log level
//! - Masked API key output for logs and messages
//! - Pluggable property container and diagnostics sink
//!
//! # Example
//!
//! ```
//! use hub_settings::HubSettings;
//!
//! # fn main() -> hub_settings::Result<()> {
//! let settings = HubSettings::standalone()?;
//! settings
//!     .set_api_key("abcdef1234567890")?
//!     .set_url("https://hub.example.com/organizations/1")?;
//!
//! assert_eq!(settings.url()?, "https://hub.example.com");
//! assert_eq!(settings.mode()?, "all");
//! assert_eq!(
//!     settings.api_key_secure_description()?.as_deref(),
//!     Some("abcdef************")
//! );
//! # Ok(())
//! # }
//! ```

pub mod common;
pub mod config;

pub use common::{init_logger, HubError, Result};
pub use config::{ConfigError, HubMode, HubSettings, HubSnapshot, PropertyRegistry};

//! Common module
//!
//! Shared error types and the logger bootstrap.

pub mod error;
pub mod log;

pub use error::{HubError, Result};
pub use log::init_logger;

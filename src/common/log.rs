//! Logging helpers
//!
//! Thin wrapper around `env_logger` so binaries embedding the settings get
//! the same log format.

use super::error::Result;

/// Initialize the logging system
///
/// `RUST_LOG` takes precedence over `level`. Calling this more than once
/// returns an error instead of panicking.
///
/// # Parameters
///
/// * `level` - Default log filter, e.g. `info` or `hub_settings=debug`
pub fn init_logger(level: &str) -> Result<()> {
    let env = env_logger::Env::default()
        .filter_or("RUST_LOG", level);

    env_logger::Builder::from_env(env).try_init()?;
    Ok(())
}

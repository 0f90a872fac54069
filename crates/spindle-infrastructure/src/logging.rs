//! Structured logging with tracing
//!
//! Centralized logging setup and the small helpers used by the load
//! pipeline. The filter honors the `SPINDLE_LOG` environment variable and
//! falls back to the level passed by the caller.

use crate::constants::{DEFAULT_LOG_LEVEL, LOG_ENV_VAR};
use spindle_domain::error::{Error, Result};
use std::path::Path;
use tracing::{debug, info, Level};
use tracing_subscriber::EnvFilter;

/// Initialize logging with the given level
///
/// Safe to call once per process; a second call fails because the global
/// subscriber is already set.
pub fn init_logging(level: &str) -> Result<()> {
    let level = parse_log_level(level)?;
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|error| Error::internal(format!("failed to initialize logging: {error}")))?;

    info!("Logging initialized with level: {}", level);
    Ok(())
}

/// Initialize logging with the default level
pub fn init_default_logging() -> Result<()> {
    init_logging(DEFAULT_LOG_LEVEL)
}

/// Parse a log level string to a tracing Level
pub fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(Error::configuration(format!(
            "Invalid log level: {level}. Valid levels: trace, debug, info, warn, error"
        ))),
    }
}

/// Log the outcome of loading a configuration entry file
pub fn log_config_loaded(path: &Path, found: bool) {
    if found {
        info!(path = %path.display(), "configuration loaded");
    } else {
        debug!(path = %path.display(), "configuration file not present");
    }
}

/// Log a service graph boot
pub fn log_container_booted(services: usize) {
    info!(services, "container booted");
}

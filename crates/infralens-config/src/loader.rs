//! Config file loading.
//!
//! Implements the `Config::load()` algorithm:
//! 1. Read and parse the TOML file into a value tree
//! 2. Apply env var fallbacks for unset fields
//! 3. Deserialize the tree into [`Config`]
//! 4. Validate

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use crate::env::{apply_env_fallbacks, collect_env_vars};
use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;
use crate::validate;

/// Load configuration from `path`, using the process environment for
/// fallbacks.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read or parsed, an env var
/// cannot be coerced, or the result fails validation.
pub fn load(path: &Path) -> ConfigResult<Config> {
    load_with_env(path, &collect_env_vars())
}

/// Load configuration from `path` with an explicit environment snapshot.
///
/// # Errors
///
/// See [`load`].
pub fn load_with_env<S: ::std::hash::BuildHasher>(
    path: &Path,
    env_vars: &HashMap<String, String, S>,
) -> ConfigResult<Config> {
    let shown = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: shown.clone(),
        source: e,
    })?;

    let config = parse_with_env(&content, &shown, env_vars)?;
    info!(path = %shown, "Loaded configuration");
    Ok(config)
}

/// Parse configuration from an in-memory TOML string.
///
/// `origin` is only used in error messages.
///
/// # Errors
///
/// See [`load`].
pub fn load_str<S: ::std::hash::BuildHasher>(
    content: &str,
    origin: &str,
    env_vars: &HashMap<String, String, S>,
) -> ConfigResult<Config> {
    parse_with_env(content, origin, env_vars)
}

/// Build configuration purely from environment variables.
///
/// # Errors
///
/// Returns a [`ConfigError`] if an env var cannot be coerced or the result
/// fails validation (for example when no base URL variable is set).
pub fn from_env<S: ::std::hash::BuildHasher>(
    env_vars: &HashMap<String, String, S>,
) -> ConfigResult<Config> {
    parse_with_env("", "<environment>", env_vars)
}

fn parse_with_env<S: ::std::hash::BuildHasher>(
    content: &str,
    origin: &str,
    env_vars: &HashMap<String, String, S>,
) -> ConfigResult<Config> {
    let mut merged: toml::Value = toml::from_str(content).map_err(|e| ConfigError::ParseError {
        path: origin.to_owned(),
        source: e,
    })?;

    let applied = apply_env_fallbacks(&mut merged, env_vars)?;
    if applied > 0 {
        debug!(origin, applied, "Applied env var fallbacks");
    }

    let config: Config = merged.try_into().map_err(|e| ConfigError::ParseError {
        path: origin.to_owned(),
        source: e,
    })?;

    validate::validate(&config)?;
    Ok(config)
}

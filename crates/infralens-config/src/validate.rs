//! Configuration validation.
//!
//! Runs after env fallbacks have been applied and the merged tree has been
//! deserialized. Each section has its own validator; the first failure wins.

use crate::error::{ConfigError, ConfigResult};
use crate::types::{Config, ResolverConfig, non_empty};

/// Largest accepted per-request timeout, in seconds.
const MAX_TIMEOUT_SECS: u64 = 600;

/// Validate a full configuration.
///
/// # Errors
///
/// Returns [`ConfigError::ValidationError`] naming the first offending field.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_registry(&config.registry)?;
    validate_logging(config)?;
    Ok(())
}

/// Validate the registry section on its own.
///
/// Useful for callers that build a [`ResolverConfig`] programmatically
/// instead of loading a file.
///
/// # Errors
///
/// Returns [`ConfigError::ValidationError`] naming the first offending field.
pub fn validate_registry(registry: &ResolverConfig) -> ConfigResult<()> {
    if registry.base_url.trim().is_empty() {
        return Err(ConfigError::validation(
            "registry.base_url",
            "registry base URL is required",
        ));
    }

    let parsed = url::Url::parse(&registry.base_url).map_err(|e| {
        ConfigError::validation(
            "registry.base_url",
            format!("'{}' is not a valid URL: {e}", registry.base_url),
        )
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::validation(
            "registry.base_url",
            format!("unsupported scheme '{}'; expected http or https", parsed.scheme()),
        ));
    }

    if registry.timeout_secs == 0 || registry.timeout_secs > MAX_TIMEOUT_SECS {
        return Err(ConfigError::validation(
            "registry.timeout_secs",
            format!(
                "timeout must be between 1 and {MAX_TIMEOUT_SECS} seconds, got {}",
                registry.timeout_secs
            ),
        ));
    }

    let has_key = non_empty(registry.api_key.as_deref()).is_some();
    let has_user = non_empty(registry.username.as_deref()).is_some();
    let has_password = non_empty(registry.password.as_deref()).is_some();

    if has_user != has_password {
        return Err(ConfigError::validation(
            "registry.username",
            "username and password must be set together",
        ));
    }

    if has_key && has_user {
        return Err(ConfigError::validation(
            "registry.api_key",
            "api_key and username/password are mutually exclusive",
        ));
    }

    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.logging.level.as_str()) {
        return Err(ConfigError::ValidationError {
            field: "logging.level".to_owned(),
            message: format!(
                "unsupported log level '{}'; expected one of: {}",
                config.logging.level,
                valid_levels.join(", ")
            ),
        });
    }

    let valid_formats = ["pretty", "compact", "json", "full"];
    if !valid_formats.contains(&config.logging.format.as_str()) {
        return Err(ConfigError::ValidationError {
            field: "logging.format".to_owned(),
            message: format!(
                "unsupported log format '{}'; expected one of: {}",
                config.logging.format,
                valid_formats.join(", ")
            ),
        });
    }

    Ok(())
}

//! Environment variable fallbacks.
//!
//! Env vars are **fallback**, not override: they only fill fields that the
//! config file left unset. When several variables map to the same field, the
//! first one listed in [`ENV_MAPPINGS`] wins.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};

/// Mapping from environment variable name to config field path.
struct EnvMapping {
    var_name: &'static str,
    field_path: &'static str,
}

/// Supported `INFRALENS_*` variables and the legacy `INFRAINSIGHTS_*` names.
const ENV_MAPPINGS: &[EnvMapping] = &[
    EnvMapping {
        var_name: "INFRALENS_BASE_URL",
        field_path: "registry.base_url",
    },
    EnvMapping {
        var_name: "INFRAINSIGHTS_URL",
        field_path: "registry.base_url",
    },
    EnvMapping {
        var_name: "INFRALENS_API_KEY",
        field_path: "registry.api_key",
    },
    EnvMapping {
        var_name: "INFRAINSIGHTS_API_KEY",
        field_path: "registry.api_key",
    },
    EnvMapping {
        var_name: "INFRALENS_USERNAME",
        field_path: "registry.username",
    },
    EnvMapping {
        var_name: "INFRALENS_PASSWORD",
        field_path: "registry.password",
    },
    EnvMapping {
        var_name: "INFRALENS_TIMEOUT_SECS",
        field_path: "registry.timeout_secs",
    },
    EnvMapping {
        var_name: "INFRALENS_ENABLE_NAME_LOOKUP",
        field_path: "registry.enable_name_lookup",
    },
    EnvMapping {
        var_name: "INFRALENS_HEALTH_POLICY",
        field_path: "registry.health_policy",
    },
    EnvMapping {
        var_name: "INFRALENS_LOG_LEVEL",
        field_path: "logging.level",
    },
    EnvMapping {
        var_name: "INFRALENS_LOG_FORMAT",
        field_path: "logging.format",
    },
];

/// Snapshot the process environment, keeping only variables we map.
#[must_use]
pub fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars()
        .filter(|(name, _)| ENV_MAPPINGS.iter().any(|m| m.var_name == name))
        .collect()
}

/// Apply environment fallbacks to fields missing from `merged`.
///
/// Returns the number of fields filled in.
///
/// # Errors
///
/// Returns [`ConfigError::EnvError`] if a numeric or boolean field receives a
/// value that cannot be coerced.
pub fn apply_env_fallbacks<S: ::std::hash::BuildHasher>(
    merged: &mut toml::Value,
    env_vars: &HashMap<String, String, S>,
) -> ConfigResult<usize> {
    let mut count: usize = 0;

    for mapping in ENV_MAPPINGS {
        if field_is_set(merged, mapping.field_path) {
            continue;
        }

        let Some(raw) = env_vars.get(mapping.var_name) else {
            continue;
        };

        debug!(
            var = mapping.var_name,
            field = mapping.field_path,
            "applying env var fallback"
        );

        let value = coerce(mapping, raw)?;
        set_field(merged, mapping.field_path, value);
        count = count.saturating_add(1);
    }

    Ok(count)
}

fn field_is_set(root: &toml::Value, path: &str) -> bool {
    let mut current = root;
    for segment in path.split('.') {
        match current.get(segment) {
            Some(next) => current = next,
            None => return false,
        }
    }
    true
}

fn set_field(root: &mut toml::Value, path: &str, value: toml::Value) {
    let Some((parents, leaf)) = path.rsplit_once('.') else {
        if let Some(table) = root.as_table_mut() {
            table.insert(path.to_owned(), value);
        }
        return;
    };

    let mut current = root;
    for segment in parents.split('.') {
        let Some(table) = current.as_table_mut() else {
            return;
        };
        current = table
            .entry(segment.to_owned())
            .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));
    }

    if let Some(table) = current.as_table_mut() {
        table.insert(leaf.to_owned(), value);
    }
}

fn coerce(mapping: &EnvMapping, raw: &str) -> ConfigResult<toml::Value> {
    let trimmed = raw.trim();
    match mapping.field_path {
        "registry.timeout_secs" => trimmed
            .parse::<i64>()
            .map(toml::Value::Integer)
            .map_err(|e| ConfigError::EnvError {
                var_name: mapping.var_name.to_owned(),
                message: format!("expected an integer number of seconds: {e}"),
            }),
        "registry.enable_name_lookup" => parse_bool(trimmed)
            .map(toml::Value::Boolean)
            .ok_or_else(|| ConfigError::EnvError {
                var_name: mapping.var_name.to_owned(),
                message: format!("expected a boolean, got '{trimmed}'"),
            }),
        _ => Ok(toml::Value::String(trimmed.to_owned())),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

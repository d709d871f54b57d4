//! Error types for toolsets.

use infralens_registry::RegistryError;
use thiserror::Error;

/// Errors raised when a tool needs a concrete, connectable instance.
#[derive(Debug, Error)]
pub enum ToolsetError {
    /// The instance carries no connection settings at all.
    #[error("no configuration available for instance '{instance}'")]
    MissingConfig {
        /// Instance name.
        instance: String,
    },

    /// A required connection setting is absent or empty.
    #[error("{service_type} instance '{instance}' is missing required setting '{field}'")]
    MissingField {
        /// Service type of the adapter.
        service_type: String,
        /// Instance name.
        instance: String,
        /// Primary spelling of the missing key.
        field: String,
    },

    /// A connection setting is present but unusable.
    #[error("{service_type} instance '{instance}' has invalid setting '{field}': {message}")]
    InvalidField {
        /// Service type of the adapter.
        service_type: String,
        /// Instance name.
        instance: String,
        /// Offending key.
        field: String,
        /// What was wrong.
        message: String,
    },

    /// No adapter is registered for the service type.
    #[error("no vendor adapter registered for service type '{0}'")]
    UnknownServiceType(String),

    /// Every selection step came up empty.
    #[error(
        "No {service_type} instance available or specified (attempted: {}; available: {}; API URL: {base_url}; name lookup enabled: {name_lookup})",
        describe_attempts(.attempted),
        describe_available(.available)
    )]
    NoInstance {
        /// Service type being selected.
        service_type: String,
        /// Identifiers that were tried, e.g. `name: payments`.
        attempted: Vec<String>,
        /// Up to five instance names the registry does know.
        available: Vec<String>,
        /// Registry base URL.
        base_url: String,
        /// Whether the by-name endpoint was in play.
        name_lookup: bool,
    },

    /// Tool parameters did not have the expected shape.
    #[error("invalid tool parameters: {0}")]
    InvalidParams(#[from] serde_json::Error),

    /// Building the registry client failed.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
}

/// Result type for toolset operations.
pub type ToolsetResult<T> = Result<T, ToolsetError>;

fn describe_attempts(attempted: &[String]) -> String {
    if attempted.is_empty() {
        "no specific identifier provided".to_owned()
    } else {
        attempted.join(", ")
    }
}

fn describe_available(available: &[String]) -> String {
    if available.is_empty() {
        "none found".to_owned()
    } else {
        available.join(", ")
    }
}

//! Configuration types for infralens.
//!
//! Every struct implements [`Default`] so that a bare `[section]` header in
//! TOML produces a usable configuration. Secrets are never serialized and are
//! redacted from `Debug` output.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default per-request timeout for registry calls, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Connection to the service-instance registry.
    pub registry: ResolverConfig,
    /// Logging level, format, and per-crate directives.
    pub logging: LoggingSection,
}

// ---------------------------------------------------------------------------
// ResolverConfig
// ---------------------------------------------------------------------------

/// How the registry's `/api/health` payload is judged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthPolicy {
    /// Healthy only when `status == "healthy"`.
    #[default]
    Strict,
    /// Healthy whenever the payload carries a `status` key, whatever its value.
    /// Matches the behaviour older registry deployments were deployed against.
    Lenient,
}

/// Registry endpoint, credentials, and resolution switches.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Base URL of the registry API (e.g. `https://registry.example.com`).
    #[serde(alias = "infrainsights_url")]
    pub base_url: String,
    /// Bearer token. Mutually exclusive with `username`/`password`.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Basic-auth user name.
    pub username: Option<String>,
    /// Basic-auth password.
    #[serde(skip_serializing)]
    pub password: Option<String>,
    /// Timeout applied uniformly to every registry request, in seconds.
    pub timeout_secs: u64,
    /// Whether the by-name endpoint may be queried during resolution.
    pub enable_name_lookup: bool,
    /// Health-check interpretation.
    pub health_policy: HealthPolicy,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: None,
            username: None,
            password: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            enable_name_lookup: true,
            health_policy: HealthPolicy::default(),
        }
    }
}

impl std::fmt::Debug for ResolverConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverConfig")
            .field("base_url", &self.base_url)
            .field("has_api_key", &self.api_key.is_some())
            .field("username", &self.username)
            .field("has_password", &self.password.is_some())
            .field("timeout_secs", &self.timeout_secs)
            .field("enable_name_lookup", &self.enable_name_lookup)
            .field("health_policy", &self.health_policy)
            .finish()
    }
}

impl ResolverConfig {
    /// Create an unauthenticated config pointing at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Authenticate with a bearer token.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Authenticate with HTTP basic credentials.
    #[must_use]
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set the per-request timeout (rounded down to whole seconds).
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs();
        self
    }

    /// Enable or disable the by-name lookup endpoint.
    #[must_use]
    pub fn with_name_lookup(mut self, enabled: bool) -> Self {
        self.enable_name_lookup = enabled;
        self
    }

    /// Set the health-check policy.
    #[must_use]
    pub fn with_health_policy(mut self, policy: HealthPolicy) -> Self {
        self.health_policy = policy;
        self
    }

    /// Per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The authentication scheme implied by the configured credentials.
    ///
    /// A non-empty `api_key` wins; otherwise both `username` and `password`
    /// must be non-empty for basic auth. Anything else is unauthenticated.
    #[must_use]
    pub fn auth(&self) -> Auth {
        if let Some(key) = non_empty(self.api_key.as_deref()) {
            return Auth::Bearer(key.to_owned());
        }
        match (
            non_empty(self.username.as_deref()),
            non_empty(self.password.as_deref()),
        ) {
            (Some(username), Some(password)) => Auth::Basic {
                username: username.to_owned(),
                password: password.to_owned(),
            },
            _ => Auth::None,
        }
    }
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Authentication scheme for registry requests.
#[derive(Clone, PartialEq, Eq)]
pub enum Auth {
    /// Requests are sent without credentials.
    None,
    /// `Authorization: Bearer <token>`.
    Bearer(String),
    /// HTTP basic credentials.
    Basic {
        /// User name.
        username: String,
        /// Password.
        password: String,
    },
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bearer(_) => f.debug_tuple("Bearer").field(&"***").finish(),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
        }
    }
}

// ---------------------------------------------------------------------------
// LoggingSection
// ---------------------------------------------------------------------------

/// Logging and tracing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Global log level filter (`"trace"`, `"debug"`, `"info"`, `"warn"`,
    /// `"error"`).
    pub level: String,
    /// Output format: `"pretty"`, `"compact"`, `"json"`, or `"full"`.
    pub format: String,
    /// Per-crate tracing directives (e.g. `["infralens_registry=debug"]`).
    pub directives: Vec<String>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "compact".to_owned(),
            directives: Vec::new(),
        }
    }
}

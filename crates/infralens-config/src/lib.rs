#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
//! Configuration for the infralens instance resolver.
//!
//! A single [`Config`] holds the registry connection ([`ResolverConfig`]) and
//! the logging section consumed by `infralens-telemetry`.
//!
//! # Usage
//!
//! ```rust,no_run
//! use infralens_config::Config;
//!
//! let config = Config::load(std::path::Path::new("infralens.toml")).unwrap();
//! println!("Registry at {}", config.registry.base_url);
//! ```
//!
//! # Precedence
//!
//! 1. **Config file** values
//! 2. **Environment variables** (`INFRALENS_*`, legacy `INFRAINSIGHTS_*`), fallback only
//! 3. **Built-in defaults**
//!
//! # Design
//!
//! This crate has **no dependencies on other internal infralens crates**. The
//! registry crate consumes [`ResolverConfig`] directly.

/// Environment variable fallback resolution.
pub mod env;
/// Configuration error types.
pub mod error;
/// Configuration file loading.
pub mod loader;
/// Configuration struct definitions.
pub mod types;
/// Configuration validation rules.
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use types::*;

impl Config {
    /// Load configuration from a TOML file, with env var fallbacks.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file is unreadable or malformed, or if
    /// the final configuration fails validation.
    pub fn load(path: &std::path::Path) -> ConfigResult<Self> {
        loader::load(path)
    }

    /// Load configuration from a TOML file with an explicit env snapshot.
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn load_with_env<S: ::std::hash::BuildHasher>(
        path: &std::path::Path,
        env_vars: &std::collections::HashMap<String, String, S>,
    ) -> ConfigResult<Self> {
        loader::load_with_env(path, env_vars)
    }

    /// Build configuration from the process environment alone.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a variable cannot be coerced or no base URL
    /// is available.
    pub fn from_env() -> ConfigResult<Self> {
        loader::from_env(&env::collect_env_vars())
    }
}

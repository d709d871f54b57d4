//! Prelude module - commonly used types for convenient import.
//!
//! Use `use infralens_telemetry::prelude::*;` to import all essential types.
//!
//! # Example
//!
//! ```rust,no_run
//! use infralens_telemetry::prelude::*;
//!
//! # fn main() -> TelemetryResult<()> {
//! setup_logging(&LogConfig::new("info").with_format(LogFormat::Compact))?;
//!
//! let _guard = ResolutionGuard::new(ResolutionContext::new("redis-toolset", "redis"));
//! tracing::info!("Resolving instance");
//! # Ok(())
//! # }
//! ```

// Errors
pub use crate::{TelemetryError, TelemetryResult};

// Logging configuration
pub use crate::{LogConfig, LogFormat, LogTarget};

// Setup functions
pub use crate::{setup_default_logging, setup_logging};

// Resolution context
pub use crate::{ResolutionContext, ResolutionGuard};

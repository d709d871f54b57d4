//! Logging and resolution tracing for infralens.
//!
//! This crate provides:
//! - Configurable subscriber setup (pretty, compact, JSON, full)
//! - A per-resolution context whose span ties registry calls together
//!
//! # Example
//!
//! ```rust,no_run
//! use infralens_telemetry::{LogConfig, LogFormat, ResolutionContext, setup_logging};
//!
//! # fn main() -> Result<(), infralens_telemetry::TelemetryError> {
//! let config = LogConfig::new("debug")
//!     .with_format(LogFormat::Json)
//!     .with_directive("infralens_registry=trace");
//!
//! setup_logging(&config)?;
//!
//! let ctx = ResolutionContext::new("elasticsearch-toolset", "elasticsearch");
//! let span = ctx.span();
//! let _guard = span.enter();
//! tracing::info!("Resolving instance");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod context;
mod error;
mod logging;

pub use context::{ResolutionContext, ResolutionGuard};
pub use error::{TelemetryError, TelemetryResult};
pub use logging::{LogConfig, LogFormat, LogTarget, setup_default_logging, setup_logging};

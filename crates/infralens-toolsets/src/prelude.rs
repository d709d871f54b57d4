//! Prelude module - commonly used types for convenient import.
//!
//! Use `use infralens_toolsets::prelude::*;` to import all essential types.
//!
//! # Example
//!
//! ```rust,no_run
//! use infralens_config::ResolverConfig;
//! use infralens_toolsets::prelude::*;
//!
//! # fn main() -> ToolsetResult<()> {
//! let toolset = Toolset::from_config("redis", &ResolverConfig::new("http://localhost:3000"))?;
//! let PreparedInstance { connection, .. } =
//!     toolset.prepare(&InstanceParams::new().with_instance_name("sessions"))?;
//! # let _ = connection;
//! # Ok(())
//! # }
//! ```

// Errors
pub use crate::{ToolsetError, ToolsetResult};

// Adapters
pub use crate::{AdapterRegistry, ConnectionSettings, Secret, VendorAdapter};

// Selection
pub use crate::{InstanceParams, InstanceSelector, PreparedInstance, Toolset};

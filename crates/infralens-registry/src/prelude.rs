//! Prelude module - commonly used types for convenient import.
//!
//! Use `use infralens_registry::prelude::*;` to import all essential types.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use infralens_config::ResolverConfig;
//! use infralens_registry::prelude::*;
//!
//! # fn main() -> RegistryResult<()> {
//! let client = Arc::new(RegistryClient::new(&ResolverConfig::new("http://localhost:3000"))?);
//! let resolver = InstanceResolver::new(client);
//! let found: Option<ServiceInstance> = resolver.resolve("kafka", "events", None);
//! # let _ = found;
//! # Ok(())
//! # }
//! ```

// Errors
pub use crate::{RegistryError, RegistryResult};

// Domain types
pub use crate::{InstanceSummary, ServiceInstance, ServiceInstanceConfig};

// Transport and cache
pub use crate::{ApiRequest, HttpTransport, InstanceCache, Transport};

// Client and resolution
pub use crate::{InstanceResolver, PromptExtractor, RegistryClient, Resolution, ResolutionStrategy};

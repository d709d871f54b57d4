//! Service-instance registry access and identifier resolution.
//!
//! This crate provides:
//! - A [`Transport`] seam with an HTTP implementation over `reqwest`
//! - A TTL-bounded [`InstanceCache`] for listings
//! - [`RegistryClient`] for health, listing and point lookups
//! - [`InstanceResolver`], which maps a free-form identifier or prompt to one
//!   concrete [`ServiceInstance`]
//!
//! Lookups never fail loudly. A registry that is down, slow, or returns
//! garbage shows up as "not found" plus a log line.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use infralens_config::ResolverConfig;
//! use infralens_registry::{InstanceResolver, RegistryClient};
//!
//! # fn main() -> Result<(), infralens_registry::RegistryError> {
//! let config = ResolverConfig::new("http://localhost:3000").with_api_key("token");
//! let client = Arc::new(RegistryClient::new(&config)?);
//! let resolver = InstanceResolver::new(client);
//!
//! if let Some(instance) =
//!     resolver.extract_and_resolve("why is my payments-es cluster red?", "elasticsearch", None)
//! {
//!     println!("{} ({})", instance.name, instance.instance_id);
//! }
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

mod cache;
mod client;
mod error;
mod extractor;
mod parse;
mod resolver;
mod transport;
mod types;

#[cfg(test)]
mod testing;

pub use cache::{CacheKey, DEFAULT_CACHE_TTL, InstanceCache};
pub use client::RegistryClient;
pub use error::{RegistryError, RegistryResult};
pub use extractor::{Candidate, DEFAULT_SERVICE_TYPES, PatternKind, PromptExtractor};
pub use resolver::{
    InstanceResolver, PromptResolution, Resolution, ResolutionStrategy, match_by_name,
};
pub use transport::{ApiRequest, HttpTransport, Transport};
pub use types::{
    DEFAULT_ENVIRONMENT, DEFAULT_STATUS, InstanceSummary, ServiceInstance, ServiceInstanceConfig,
};

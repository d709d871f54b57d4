//! Vendor adapters and instance selection for infralens tools.
//!
//! A tool call arrives with loose hints (`instance_name`, `cluster_name`, a
//! free-text prompt...). This crate turns those hints into one concrete
//! registry instance and then into typed connection settings for the
//! vendor that instance runs.
//!
//! - [`InstanceSelector`] walks the hints in a fixed order
//! - [`AdapterRegistry`] maps a service-type tag to its [`VendorAdapter`]
//! - [`Toolset`] binds one service type to both
//!
//! # Example
//!
//! ```rust,no_run
//! use infralens_config::ResolverConfig;
//! use infralens_toolsets::{InstanceParams, Toolset};
//!
//! # fn main() -> Result<(), infralens_toolsets::ToolsetError> {
//! let config = ResolverConfig::new("http://localhost:3000");
//! let toolset = Toolset::from_config("kafka", &config)?;
//!
//! let params = InstanceParams::new().with_prompt("consumer lag on the events kafka cluster");
//! let prepared = toolset.prepare(&params)?;
//! println!("{} -> {:?}", prepared.instance.name, prepared.connection);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod adapters;
mod connection;
mod error;
mod registry;
mod selector;
mod toolset;

pub use adapters::{
    DEFAULT_MONGO_DATABASE, DEFAULT_REDIS_PORT, DEFAULT_SASL_MECHANISM, DEFAULT_SECURITY_PROTOCOL,
    KafkaAdapter, KafkaConnectAdapter, KubernetesAdapter, MongoAdapter, RedisAdapter,
    SearchAdapter, VendorAdapter,
};
pub use connection::{
    ConnectionSettings, KafkaConnectConnection, KafkaConnection, KubernetesConnection,
    MongoConnection, RedisConnection, SaslSettings, SearchAuth, SearchConnection, SearchFlavor,
    Secret,
};
pub use error::{ToolsetError, ToolsetResult};
pub use registry::AdapterRegistry;
pub use selector::{InstanceParams, InstanceSelector, MAX_LISTED_INSTANCES};
pub use toolset::{PreparedInstance, Toolset};

//! Shared test utilities for infralens.
//!
//! This crate provides a scripted registry transport, record fixtures and
//! harness helpers, used across the workspace as a dev-dependency.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use infralens_registry::RegistryClient;
//! use infralens_test::{MockTransport, instance_record, listing, listing_path, test_config};
//!
//! #[test]
//! fn lists_from_mock() {
//!     let mock = MockTransport::new().with_json(
//!         listing_path("kafka"),
//!         listing(vec![instance_record("k-1", "kafka", "events")]),
//!     );
//!     let client = RegistryClient::with_transport(mock.transport(), &test_config());
//!
//!     assert_eq!(client.list_instances(Some("kafka"), None).len(), 1);
//!     assert_eq!(mock.total_calls(), 1);
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;

pub mod fixtures;
pub mod harness;
pub mod mocks;

pub use fixtures::*;
pub use harness::*;
pub use mocks::*;

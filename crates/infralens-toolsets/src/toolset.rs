//! A service type bound to its vendor adapter and the shared selector.

use std::fmt;
use std::sync::Arc;

use infralens_config::ResolverConfig;
use infralens_registry::{InstanceSummary, RegistryClient, ServiceInstance};
use tracing::{info, warn};

use crate::adapters::VendorAdapter;
use crate::connection::ConnectionSettings;
use crate::error::{ToolsetError, ToolsetResult};
use crate::registry::AdapterRegistry;
use crate::selector::{InstanceParams, InstanceSelector};

/// A selected instance together with its vendor connection settings.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedInstance {
    /// The instance the tool call is about.
    pub instance: ServiceInstance,
    /// How to reach it.
    pub connection: ConnectionSettings,
}

/// Everything a tool for one service type needs before it talks to a vendor.
#[derive(Clone)]
pub struct Toolset {
    service_type: String,
    adapter: Arc<dyn VendorAdapter>,
    selector: Arc<InstanceSelector>,
}

impl Toolset {
    /// Bind `service_type` to its adapter from `adapters`.
    ///
    /// # Errors
    ///
    /// Returns [`ToolsetError::UnknownServiceType`] if no adapter handles the
    /// type.
    pub fn new(
        service_type: impl Into<String>,
        adapters: &AdapterRegistry,
        selector: Arc<InstanceSelector>,
    ) -> ToolsetResult<Self> {
        let service_type = service_type.into();
        let adapter = adapters
            .get(&service_type)
            .ok_or_else(|| ToolsetError::UnknownServiceType(service_type.clone()))?;
        Ok(Self {
            service_type,
            adapter,
            selector,
        })
    }

    /// Build a toolset with its own HTTP registry client and the built-in
    /// adapters.
    ///
    /// # Errors
    ///
    /// Returns [`ToolsetError::Registry`] if the client cannot be built, or
    /// [`ToolsetError::UnknownServiceType`].
    pub fn from_config(
        service_type: impl Into<String>,
        config: &ResolverConfig,
    ) -> ToolsetResult<Self> {
        let client = Arc::new(RegistryClient::new(config)?);
        let selector = Arc::new(InstanceSelector::from_client(client));
        Self::new(service_type, &AdapterRegistry::with_defaults(), selector)
    }

    /// The bound service type.
    #[must_use]
    pub fn service_type(&self) -> &str {
        &self.service_type
    }

    /// The vendor adapter.
    #[must_use]
    pub fn adapter(&self) -> &Arc<dyn VendorAdapter> {
        &self.adapter
    }

    /// The instance selector.
    #[must_use]
    pub fn selector(&self) -> &Arc<InstanceSelector> {
        &self.selector
    }

    /// Select the instance `params` point at and derive its connection
    /// settings.
    ///
    /// # Errors
    ///
    /// Returns [`ToolsetError::NoInstance`] when nothing can be selected, or
    /// the adapter's error when the instance's config is unusable.
    pub fn prepare(&self, params: &InstanceParams) -> ToolsetResult<PreparedInstance> {
        let instance = self.selector.select(&self.service_type, params)?;
        let connection = self.adapter.connection(&instance)?;
        info!(
            service_type = %self.service_type,
            instance_id = %instance.instance_id,
            name = %instance.name,
            "Prepared instance"
        );
        Ok(PreparedInstance {
            instance,
            connection,
        })
    }

    /// Probe the registry.
    ///
    /// Returns whether it is healthy and a human-readable reason.
    #[must_use]
    pub fn check_connectivity(&self) -> (bool, String) {
        let client = self.selector.client();
        if client.health_check() {
            (true, "registry API accessible".to_owned())
        } else {
            warn!(base_url = %client.base_url(), "Registry connectivity check failed");
            (
                false,
                format!("registry health check failed at {}", client.base_url()),
            )
        }
    }

    /// Instances of this service type visible to `user_id`.
    #[must_use]
    pub fn available_instances(&self, user_id: Option<&str>) -> Vec<ServiceInstance> {
        self.selector
            .client()
            .list_instances(Some(&self.service_type), user_id)
    }

    /// Summary of this service type's instances.
    #[must_use]
    pub fn summary(&self) -> InstanceSummary {
        self.selector.client().summary(&self.service_type)
    }
}

impl fmt::Debug for Toolset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Toolset")
            .field("service_type", &self.service_type)
            .field("selector", &self.selector)
            .finish_non_exhaustive()
    }
}

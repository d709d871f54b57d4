//! Parameter-driven instance selection for tools.

use std::sync::Arc;

use infralens_registry::{InstanceResolver, RegistryClient, ServiceInstance};
use infralens_telemetry::{ResolutionContext, ResolutionGuard};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{ToolsetError, ToolsetResult};

/// How many known instance names a [`ToolsetError::NoInstance`] lists.
pub const MAX_LISTED_INSTANCES: usize = 5;

/// Instance hints carried in a tool call's parameters.
///
/// Every field is optional. Blank strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceParams {
    /// Registry ID.
    pub instance_id: Option<String>,
    /// Instance name.
    pub instance_name: Option<String>,
    /// Cluster name, treated as another spelling of the instance name.
    pub cluster_name: Option<String>,
    /// User scope for listings.
    pub user_id: Option<String>,
    /// The user's free-text request.
    pub prompt: Option<String>,
}

impl InstanceParams {
    /// Params with nothing set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the instance hints out of a tool call's JSON parameters.
    ///
    /// Unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ToolsetError::InvalidParams`] if a known key has the wrong
    /// type.
    pub fn from_json(params: &Value) -> ToolsetResult<Self> {
        Ok(Self::deserialize(params)?)
    }

    /// Set the instance ID.
    #[must_use]
    pub fn with_instance_id(mut self, id: impl Into<String>) -> Self {
        self.instance_id = Some(id.into());
        self
    }

    /// Set the instance name.
    #[must_use]
    pub fn with_instance_name(mut self, name: impl Into<String>) -> Self {
        self.instance_name = Some(name.into());
        self
    }

    /// Set the cluster name.
    #[must_use]
    pub fn with_cluster_name(mut self, name: impl Into<String>) -> Self {
        self.cluster_name = Some(name.into());
        self
    }

    /// Set the user scope.
    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Set the prompt.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    fn attempted(&self) -> Vec<String> {
        [
            ("ID", &self.instance_id),
            ("name", &self.instance_name),
            ("cluster", &self.cluster_name),
        ]
        .into_iter()
        .filter_map(|(label, value)| present(value.as_deref()).map(|v| format!("{label}: {v}")))
        .collect()
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Picks the instance a tool call is about.
#[derive(Debug, Clone)]
pub struct InstanceSelector {
    resolver: Arc<InstanceResolver>,
}

impl InstanceSelector {
    /// Selector over an existing resolver.
    #[must_use]
    pub fn new(resolver: Arc<InstanceResolver>) -> Self {
        Self { resolver }
    }

    /// Selector over a client, with the default prompt extractor.
    #[must_use]
    pub fn from_client(client: Arc<RegistryClient>) -> Self {
        Self::new(Arc::new(InstanceResolver::new(client)))
    }

    /// The resolver.
    #[must_use]
    pub fn resolver(&self) -> &Arc<InstanceResolver> {
        &self.resolver
    }

    /// The registry client behind the resolver.
    #[must_use]
    pub fn client(&self) -> &Arc<RegistryClient> {
        self.resolver.client()
    }

    /// Select the instance of `service_type` that `params` point at.
    ///
    /// Tried in order, first hit wins: `instance_id` (type must match),
    /// `instance_name`, `cluster_name`, `prompt`, then the first listed
    /// instance of the type.
    ///
    /// # Errors
    ///
    /// Returns [`ToolsetError::NoInstance`] when every step comes up empty.
    pub fn select(
        &self,
        service_type: &str,
        params: &InstanceParams,
    ) -> ToolsetResult<ServiceInstance> {
        let user_id = present(params.user_id.as_deref());
        let mut context = ResolutionContext::new("instance-selector", service_type);
        if let Some(user_id) = user_id {
            context = context.with_user_id(user_id);
        }
        let _guard = ResolutionGuard::new(context);

        let client = self.client();

        if let Some(id) = present(params.instance_id.as_deref()) {
            match client.get_by_id(id, true) {
                Some(instance) if instance.service_type == service_type => {
                    info!(instance_id = id, "Selected instance by ID");
                    return Ok(instance);
                },
                Some(instance) => warn!(
                    instance_id = id,
                    found_type = %instance.service_type,
                    "Instance ID belongs to another service type"
                ),
                None => debug!(instance_id = id, "no instance with that ID"),
            }
        }

        for (label, value) in [
            ("instance_name", params.instance_name.as_deref()),
            ("cluster_name", params.cluster_name.as_deref()),
        ] {
            if let Some(identifier) = present(value) {
                if let Some(instance) = self.resolver.resolve(service_type, identifier, user_id) {
                    info!(param = label, identifier, name = %instance.name, "Selected instance");
                    return Ok(instance);
                }
                debug!(param = label, identifier, "identifier did not resolve");
            }
        }

        if let Some(prompt) = present(params.prompt.as_deref()) {
            if let Some(instance) = self.resolver.extract_and_resolve(prompt, service_type, user_id)
            {
                info!(name = %instance.name, "Selected instance from prompt");
                return Ok(instance);
            }
            debug!("prompt named no known instance");
        }

        if let Some(instance) = client
            .list_instances(Some(service_type), user_id)
            .into_iter()
            .next()
        {
            info!(name = %instance.name, "Using first available instance");
            return Ok(instance);
        }

        Err(self.no_instance(service_type, params))
    }

    fn no_instance(&self, service_type: &str, params: &InstanceParams) -> ToolsetError {
        let client = self.client();
        let available = client
            .summary(service_type)
            .instance_names
            .into_iter()
            .take(MAX_LISTED_INSTANCES)
            .collect();
        warn!(service_type, "No instance could be selected");
        ToolsetError::NoInstance {
            service_type: service_type.to_owned(),
            attempted: params.attempted(),
            available,
            base_url: client.base_url().to_owned(),
            name_lookup: client.name_lookup_enabled(),
        }
    }
}

//! Service-instance registry client.
//!
//! Every public lookup here is best-effort: transport and parse failures are
//! logged and come back as `None`, an empty list, or `false`. Callers that
//! need to know *why* nothing came back read the logs.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use infralens_config::{HealthPolicy, ResolverConfig};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::cache::{CacheKey, InstanceCache};
use crate::error::RegistryResult;
use crate::parse::{self, RecordDefaults};
use crate::transport::{ApiRequest, HttpTransport, Transport};
use crate::types::{InstanceSummary, ServiceInstance};

/// Reads service instances from the registry, memoizing listings.
///
/// The cache belongs to this client; two clients never share entries.
pub struct RegistryClient {
    transport: Arc<dyn Transport>,
    cache: InstanceCache,
    base_url: String,
    name_lookup: bool,
    health_policy: HealthPolicy,
}

impl RegistryClient {
    /// Build a client that talks HTTP to `config.base_url`.
    ///
    /// # Errors
    ///
    /// Returns a [`RegistryError::Config`](crate::RegistryError::Config) if
    /// the HTTP transport cannot be built.
    pub fn new(config: &ResolverConfig) -> RegistryResult<Self> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::with_transport(Arc::new(transport), config))
    }

    /// Build a client over an arbitrary transport.
    #[must_use]
    pub fn with_transport(transport: Arc<dyn Transport>, config: &ResolverConfig) -> Self {
        Self {
            transport,
            cache: InstanceCache::default(),
            base_url: config.base_url.clone(),
            name_lookup: config.enable_name_lookup,
            health_policy: config.health_policy,
        }
    }

    /// Replace the listing cache with an empty one using `ttl`.
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache = InstanceCache::new(ttl);
        self
    }

    /// The registry base URL as configured.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether the by-name endpoint may be used.
    #[must_use]
    pub fn name_lookup_enabled(&self) -> bool {
        self.name_lookup
    }

    /// The listing cache.
    #[must_use]
    pub fn cache(&self) -> &InstanceCache {
        &self.cache
    }

    /// Drop every cached listing.
    pub fn invalidate_cache(&self) {
        self.cache.clear();
        debug!("instance cache cleared");
    }

    /// Probe `/api/health`.
    ///
    /// Under [`HealthPolicy::Strict`] the body must carry
    /// `status: "healthy"`; under [`HealthPolicy::Lenient`] any `status` key
    /// counts. Transport errors are `false`.
    #[must_use]
    pub fn health_check(&self) -> bool {
        let body = match self.transport.get(&ApiRequest::health()) {
            Ok(body) => body,
            Err(e) => {
                error!(error = %e, base_url = %self.base_url, "Registry health check failed");
                return false;
            },
        };

        let status = body.get("status");
        let healthy = match self.health_policy {
            HealthPolicy::Strict => status.and_then(Value::as_str) == Some("healthy"),
            HealthPolicy::Lenient => status.is_some(),
        };
        if !healthy {
            warn!(status = ?status, policy = ?self.health_policy, "Registry reports unhealthy");
        }
        healthy
    }

    /// List instances, optionally filtered by type and scoped to a user.
    ///
    /// Served from the cache when a fresh entry exists. Successful fetches
    /// overwrite the entry; failures are not cached and yield an empty list.
    #[must_use]
    pub fn list_instances(
        &self,
        service_type: Option<&str>,
        user_id: Option<&str>,
    ) -> Vec<ServiceInstance> {
        self.try_list_instances(service_type, user_id)
            .unwrap_or_else(|e| {
                error!(
                    service_type = service_type.unwrap_or("*"),
                    error = %e,
                    "Failed to list service instances"
                );
                Vec::new()
            })
    }

    /// Fetch one instance by its registry ID.
    ///
    /// `None` when the registry has no such ID or the request fails.
    #[must_use]
    pub fn get_by_id(&self, instance_id: &str, include_config: bool) -> Option<ServiceInstance> {
        if instance_id.trim().is_empty() {
            return None;
        }

        let mut request = ApiRequest::instance(instance_id);
        if include_config {
            request = request.with_query("includeConfig", "true");
        }
        self.point_lookup(&request, RecordDefaults::default())
    }

    /// Fetch one instance by type and name through the by-name endpoint.
    ///
    /// Always `None` when name lookup is disabled.
    #[must_use]
    pub fn get_by_name_and_type(
        &self,
        service_type: &str,
        name: &str,
        include_config: bool,
    ) -> Option<ServiceInstance> {
        if !self.name_lookup {
            debug!(service_type, name, "name-based lookup is disabled");
            return None;
        }
        if name.trim().is_empty() {
            return None;
        }

        let mut request = ApiRequest::instance_by_name(service_type, name);
        if include_config {
            request = request.with_query("includeConfig", "true");
        }
        let instance = self.point_lookup(&request, RecordDefaults { service_type, name })?;
        info!(name, instance_id = %instance.instance_id, "Found instance by name");
        Some(instance)
    }

    /// Counts, environments and names for one service type.
    #[must_use]
    pub fn summary(&self, service_type: &str) -> InstanceSummary {
        match self.try_list_instances(Some(service_type), None) {
            Ok(instances) => {
                InstanceSummary::from_instances(service_type, &instances, self.name_lookup)
            },
            Err(e) => {
                warn!(service_type, error = %e, "Registry unreachable while summarizing");
                InstanceSummary::unavailable(service_type, self.name_lookup, e.to_string())
            },
        }
    }

    fn try_list_instances(
        &self,
        service_type: Option<&str>,
        user_id: Option<&str>,
    ) -> RegistryResult<Vec<ServiceInstance>> {
        let service_type = service_type.filter(|s| !s.is_empty());
        let user_id = user_id.filter(|u| !u.is_empty());

        let key = CacheKey::new(service_type, user_id);
        if let Some(instances) = self.cache.get(&key) {
            return Ok(instances);
        }
        debug!(key = %key, "cache miss");

        let mut request = ApiRequest::instances(service_type);
        if let Some(user_id) = user_id {
            request = request.with_query("userId", user_id);
        }

        let body = self.transport.get(&request)?;
        let instances = parse::parse_listing(&body, service_type.unwrap_or_default())?;
        info!(
            count = instances.len(),
            service_type = service_type.unwrap_or("*"),
            "Retrieved service instances"
        );

        self.cache.put(key, instances.clone());
        Ok(instances)
    }

    fn point_lookup(
        &self,
        request: &ApiRequest,
        defaults: RecordDefaults<'_>,
    ) -> Option<ServiceInstance> {
        let result = self
            .transport
            .get(request)
            .and_then(|body| parse::parse_point(&body, defaults));

        match result {
            Ok(found) => found,
            Err(e) if e.is_not_found() => {
                debug!(path = %request, "instance not found");
                None
            },
            Err(e) => {
                warn!(path = %request, error = %e, "Instance lookup failed");
                None
            },
        }
    }
}

impl fmt::Debug for RegistryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryClient")
            .field("base_url", &self.base_url)
            .field("name_lookup", &self.name_lookup)
            .field("health_policy", &self.health_policy)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

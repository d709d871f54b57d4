//! Lookup table of vendor adapters keyed by service-type tag.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::adapters::{
    KafkaAdapter, KafkaConnectAdapter, KubernetesAdapter, MongoAdapter, RedisAdapter,
    SearchAdapter, VendorAdapter,
};

/// Registry of [`VendorAdapter`]s.
pub struct AdapterRegistry {
    adapters: HashMap<String, Arc<dyn VendorAdapter>>,
}

impl AdapterRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    /// Create a registry with every built-in vendor registered.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(SearchAdapter::elasticsearch()));
        registry.register(Arc::new(SearchAdapter::opensearch()));
        registry.register(Arc::new(KafkaAdapter));
        registry.register(Arc::new(KafkaConnectAdapter));
        registry.register(Arc::new(MongoAdapter));
        registry.register(Arc::new(RedisAdapter));
        registry.register(Arc::new(KubernetesAdapter));
        registry
    }

    /// Register an adapter, replacing any previous one for the same tag.
    pub fn register(&mut self, adapter: Arc<dyn VendorAdapter>) {
        self.adapters
            .insert(adapter.service_type().to_owned(), adapter);
    }

    /// Adapter for `service_type`.
    #[must_use]
    pub fn get(&self, service_type: &str) -> Option<Arc<dyn VendorAdapter>> {
        self.adapters.get(service_type).cloned()
    }

    /// Registered tags, sorted.
    #[must_use]
    pub fn service_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.adapters.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("service_types", &self.service_types())
            .finish()
    }
}

//! Service-instance domain types.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default `environment` for records that omit it.
pub const DEFAULT_ENVIRONMENT: &str = "production";

/// Default `status` for records that omit it.
pub const DEFAULT_STATUS: &str = "active";

/// Vendor connection settings attached to an instance.
///
/// The registry layer never interprets these; they are handed as-is to the
/// vendor adapter that knows the keys. `Debug` prints key names only, since
/// values routinely hold passwords and tokens.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceInstanceConfig(Map<String, Value>);

impl ServiceInstanceConfig {
    /// Create an empty config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// First non-empty string value among `keys`, tried in order.
    ///
    /// Registry records use both camelCase and snake_case spellings for the
    /// same setting, so callers pass every accepted alias.
    #[must_use]
    pub fn get_str(&self, keys: &[&str]) -> Option<&str> {
        keys.iter()
            .filter_map(|k| self.0.get(*k).and_then(Value::as_str))
            .find(|v| !v.is_empty())
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Whether no settings are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of settings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over setting names.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl From<Map<String, Value>> for ServiceInstanceConfig {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl std::fmt::Debug for ServiceInstanceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceInstanceConfig")
            .field("keys", &self.0.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// One managed deployment (cluster, database, broker) known to the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInstance {
    /// Stable identifier assigned by the registry.
    pub instance_id: String,
    /// Service-type tag (`elasticsearch`, `kafka`, ...).
    pub service_type: String,
    /// Human-readable name; expected but not guaranteed to be unique per type.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Deployment environment.
    pub environment: String,
    /// Lifecycle status.
    pub status: String,
    /// Tags.
    pub tags: BTreeSet<String>,
    /// Owning user.
    pub owner_id: String,
    /// Connection settings, absent when the registry omitted them.
    pub config: Option<ServiceInstanceConfig>,
    /// Last health probe reported by the registry, carried through untouched.
    pub health_check: Option<Value>,
    /// Creation timestamp as reported upstream.
    pub created_at: Option<String>,
    /// Last-update timestamp as reported upstream.
    pub updated_at: Option<String>,
}

impl ServiceInstance {
    /// Create an instance with default metadata and no config.
    #[must_use]
    pub fn new(
        instance_id: impl Into<String>,
        service_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            instance_id: instance_id.into(),
            service_type: service_type.into(),
            name: name.into(),
            description: String::new(),
            environment: DEFAULT_ENVIRONMENT.to_owned(),
            status: DEFAULT_STATUS.to_owned(),
            tags: BTreeSet::new(),
            owner_id: String::new(),
            config: None,
            health_check: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Attach connection settings.
    #[must_use]
    pub fn with_config(mut self, config: ServiceInstanceConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the environment.
    #[must_use]
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    /// Set the status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Whether non-empty connection settings are attached.
    #[must_use]
    pub fn has_config(&self) -> bool {
        self.config.as_ref().is_some_and(|c| !c.is_empty())
    }

    /// Whether the registry marks this instance as active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == DEFAULT_STATUS
    }
}

/// Aggregate view over the instances of one service type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceSummary {
    /// Service type summarized.
    pub service_type: String,
    /// Number of instances listed.
    pub total_instances: usize,
    /// Instances whose status is `active`.
    pub active_instances: usize,
    /// Distinct non-empty environments, sorted.
    pub environments: Vec<String>,
    /// Instance names in listing order.
    pub instance_names: Vec<String>,
    /// Whether the listing request succeeded.
    pub api_accessible: bool,
    /// Whether by-name lookup is enabled on the client.
    pub name_lookup_enabled: bool,
    /// Failure description when the listing request failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InstanceSummary {
    pub(crate) fn from_instances(
        service_type: &str,
        instances: &[ServiceInstance],
        name_lookup_enabled: bool,
    ) -> Self {
        let environments: BTreeSet<&str> = instances
            .iter()
            .map(|i| i.environment.as_str())
            .filter(|e| !e.is_empty())
            .collect();

        Self {
            service_type: service_type.to_owned(),
            total_instances: instances.len(),
            active_instances: instances.iter().filter(|i| i.is_active()).count(),
            environments: environments.into_iter().map(str::to_owned).collect(),
            instance_names: instances.iter().map(|i| i.name.clone()).collect(),
            api_accessible: true,
            name_lookup_enabled,
            error: None,
        }
    }

    pub(crate) fn unavailable(
        service_type: &str,
        name_lookup_enabled: bool,
        error: String,
    ) -> Self {
        Self {
            service_type: service_type.to_owned(),
            total_instances: 0,
            active_instances: 0,
            environments: Vec::new(),
            instance_names: Vec::new(),
            api_accessible: false,
            name_lookup_enabled,
            error: Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(value: Value) -> ServiceInstanceConfig {
        match value {
            Value::Object(map) => map.into(),
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_new_defaults() {
        let instance = ServiceInstance::new("i-1", "kafka", "events");
        assert_eq!(instance.environment, "production");
        assert_eq!(instance.status, "active");
        assert!(instance.is_active());
        assert!(!instance.has_config());
    }

    #[test]
    fn test_has_config_ignores_empty_map() {
        let instance =
            ServiceInstance::new("i-1", "kafka", "events").with_config(ServiceInstanceConfig::new());
        assert!(!instance.has_config());
    }

    #[test]
    fn test_get_str_tries_aliases_in_order() {
        let cfg = config(json!({
            "elasticsearch_url": "http://snake:9200",
            "elasticsearchUrl": "",
        }));
        assert_eq!(
            cfg.get_str(&["elasticsearchUrl", "elasticsearch_url"]),
            Some("http://snake:9200")
        );
        assert_eq!(cfg.get_str(&["missing"]), None);
    }

    #[test]
    fn test_config_debug_hides_values() {
        let cfg = config(json!({"password": "hunter2"}));
        let rendered = format!("{cfg:?}");
        assert!(rendered.contains("password"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_summary_from_instances() {
        let instances = vec![
            ServiceInstance::new("1", "redis", "cache-a").with_environment("staging"),
            ServiceInstance::new("2", "redis", "cache-b").with_status("inactive"),
            ServiceInstance::new("3", "redis", "cache-c").with_environment("staging"),
        ];
        let summary = InstanceSummary::from_instances("redis", &instances, true);
        assert_eq!(summary.total_instances, 3);
        assert_eq!(summary.active_instances, 2);
        assert_eq!(summary.environments, vec!["production", "staging"]);
        assert_eq!(summary.instance_names, vec!["cache-a", "cache-b", "cache-c"]);
        assert!(summary.api_accessible);
    }

    #[test]
    fn test_summary_unavailable_serializes_error() {
        let summary = InstanceSummary::unavailable("redis", false, "connection refused".into());
        let rendered = serde_json::to_value(&summary).unwrap();
        assert_eq!(rendered["api_accessible"], json!(false));
        assert_eq!(rendered["error"], json!("connection refused"));
    }
}

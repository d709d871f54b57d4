//! Test fixtures for registry records and configs.

use infralens_config::ResolverConfig;
use infralens_registry::ServiceInstance;
use serde_json::{Map, Value, json};

/// Base URL used by fixture configs. Never dialled; pair it with a mock.
pub const TEST_BASE_URL: &str = "http://registry.test";

/// A resolver config pointing at [`TEST_BASE_URL`].
#[must_use]
pub fn test_config() -> ResolverConfig {
    ResolverConfig::new(TEST_BASE_URL)
}

/// A registry record as the API returns it.
#[must_use]
pub fn instance_record(instance_id: &str, service_type: &str, name: &str) -> Value {
    json!({
        "instanceId": instance_id,
        "serviceType": service_type,
        "name": name,
        "environment": "production",
        "status": "active",
    })
}

/// A registry record carrying connection settings.
#[must_use]
pub fn instance_record_with_config(
    instance_id: &str,
    service_type: &str,
    name: &str,
    config: Value,
) -> Value {
    let mut record = instance_record(instance_id, service_type, name);
    if let Some(obj) = record.as_object_mut() {
        obj.insert("config".to_owned(), config);
    }
    record
}

/// Wrap records in the `{data: [...]}` listing envelope.
#[must_use]
pub fn listing(records: Vec<Value>) -> Value {
    json!({ "data": records })
}

/// Wrap a record in the `{data: {...}}` point-lookup envelope.
#[must_use]
pub fn point(record: Value) -> Value {
    json!({ "data": record })
}

/// Listing path for a service type, as the mock transport keys it.
#[must_use]
pub fn listing_path(service_type: &str) -> String {
    format!("/api/service-instances/{service_type}")
}

/// By-ID path with `includeConfig=true`.
#[must_use]
pub fn by_id_path(instance_id: &str) -> String {
    format!("/api/service-instances/{instance_id}?includeConfig=true")
}

/// By-name path with `includeConfig=true`.
///
/// Only valid for names that need no percent-encoding.
#[must_use]
pub fn by_name_path(service_type: &str, name: &str) -> String {
    format!("/api/service-instances/{service_type}/{name}?includeConfig=true")
}

/// A parsed instance with connection settings built from a JSON object.
#[must_use]
pub fn test_instance_with_config(
    instance_id: &str,
    service_type: &str,
    name: &str,
    config: Value,
) -> ServiceInstance {
    let map = match config {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    ServiceInstance::new(instance_id, service_type, name).with_config(map.into())
}

//! Registry JSON → [`ServiceInstance`] conversion.
//!
//! Records are parsed one at a time so a malformed record costs only itself.

use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{RegistryError, RegistryResult};
use crate::types::{DEFAULT_ENVIRONMENT, DEFAULT_STATUS, ServiceInstance};

/// Values used when a record omits `serviceType` or `name`.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct RecordDefaults<'a> {
    pub(crate) service_type: &'a str,
    pub(crate) name: &'a str,
}

impl<'a> RecordDefaults<'a> {
    pub(crate) fn service_type(service_type: &'a str) -> Self {
        Self {
            service_type,
            name: "",
        }
    }
}

/// Parse a listing body (`{data: [...]}`, `{instances: [...]}` or a bare
/// array), skipping records that fail to parse.
///
/// A body with no instance array at all is an error for the whole listing.
pub(crate) fn parse_listing(
    body: &Value,
    service_type: &str,
) -> RegistryResult<Vec<ServiceInstance>> {
    let records = match body {
        Value::Array(items) => Some(items),
        Value::Object(obj) => obj
            .get("data")
            .or_else(|| obj.get("instances"))
            .and_then(Value::as_array),
        _ => None,
    };

    let Some(records) = records else {
        return Err(RegistryError::InvalidResponse(format!(
            "listing response carried no instance array (got {})",
            kind(body)
        )));
    };

    let defaults = RecordDefaults::service_type(service_type);
    Ok(records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| match parse_instance(record, defaults) {
            Ok(instance) => Some(instance),
            Err(e) => {
                warn!(service_type, index, error = %e, "Skipping unparseable service instance");
                None
            },
        })
        .collect())
}

/// Parse a point-lookup body (`{data: {...}}` or the record itself).
///
/// `null` or an empty object means the registry has no such instance.
pub(crate) fn parse_point(
    body: &Value,
    defaults: RecordDefaults<'_>,
) -> RegistryResult<Option<ServiceInstance>> {
    let record = body.get("data").unwrap_or(body);

    match record {
        Value::Null => Ok(None),
        Value::Object(obj) if obj.is_empty() => Ok(None),
        _ => parse_instance(record, defaults).map(Some),
    }
}

/// Parse one instance record.
pub(crate) fn parse_instance(
    record: &Value,
    defaults: RecordDefaults<'_>,
) -> RegistryResult<ServiceInstance> {
    let obj = record
        .as_object()
        .ok_or_else(|| RegistryError::Parse(format!("expected an object, got {}", kind(record))))?;

    let instance_id = identity(obj)?;
    let service_type =
        optional_string(obj, "serviceType")?.unwrap_or_else(|| defaults.service_type.to_owned());
    let name = optional_string(obj, "name")?.unwrap_or_else(|| defaults.name.to_owned());

    let mut instance = ServiceInstance::new(instance_id, service_type, name);
    instance.description = optional_string(obj, "description")?.unwrap_or_default();
    instance.environment =
        optional_string(obj, "environment")?.unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_owned());
    instance.status = optional_string(obj, "status")?.unwrap_or_else(|| DEFAULT_STATUS.to_owned());
    instance.owner_id = optional_string(obj, "ownerId")?.unwrap_or_default();
    instance.created_at = optional_string(obj, "createdAt")?;
    instance.updated_at = optional_string(obj, "updatedAt")?;

    match obj.get("tags") {
        None | Some(Value::Null) => {},
        Some(Value::Array(items)) => {
            for item in items {
                let tag = item.as_str().ok_or_else(|| {
                    RegistryError::Parse(format!("tag must be a string, got {}", kind(item)))
                })?;
                instance.tags.insert(tag.to_owned());
            }
        },
        Some(other) => {
            return Err(RegistryError::Parse(format!(
                "'tags' must be an array, got {}",
                kind(other)
            )));
        },
    }

    match obj.get("config") {
        None | Some(Value::Null) => {},
        Some(Value::Object(map)) => instance.config = Some(map.clone().into()),
        Some(other) => {
            return Err(RegistryError::Parse(format!(
                "'config' must be an object, got {}",
                kind(other)
            )));
        },
    }

    instance.health_check = obj.get("healthCheck").filter(|v| !v.is_null()).cloned();

    Ok(instance)
}

fn identity(obj: &Map<String, Value>) -> RegistryResult<String> {
    for key in ["instanceId", "id"] {
        let id = match obj.get(key) {
            Some(Value::String(s)) => s.trim().to_owned(),
            Some(Value::Number(n)) => n.to_string(),
            _ => continue,
        };
        if !id.is_empty() {
            return Ok(id);
        }
    }
    Err(RegistryError::Parse(
        "record has no 'instanceId' or 'id'".to_owned(),
    ))
}

fn optional_string(obj: &Map<String, Value>, key: &str) -> RegistryResult<Option<String>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(RegistryError::Parse(format!(
            "'{key}' must be a string, got {}",
            kind(other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

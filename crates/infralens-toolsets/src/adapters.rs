//! Vendor adapters: turn an instance's opaque config bag into typed
//! connection settings.

use infralens_registry::{ServiceInstance, ServiceInstanceConfig};
use serde_json::Value;

use crate::connection::{
    ConnectionSettings, KafkaConnectConnection, KafkaConnection, KubernetesConnection,
    MongoConnection, RedisConnection, SaslSettings, SearchAuth, SearchConnection, SearchFlavor,
    Secret,
};
use crate::error::{ToolsetError, ToolsetResult};

/// Default Redis port.
pub const DEFAULT_REDIS_PORT: u16 = 6379;

/// Default MongoDB database.
pub const DEFAULT_MONGO_DATABASE: &str = "admin";

/// Default Kafka security protocol.
pub const DEFAULT_SECURITY_PROTOCOL: &str = "PLAINTEXT";

/// Default SASL mechanism.
pub const DEFAULT_SASL_MECHANISM: &str = "PLAIN";

/// Vendor-specific knowledge keyed by a service-type tag.
pub trait VendorAdapter: Send + Sync {
    /// The service-type tag this adapter handles.
    fn service_type(&self) -> &'static str;

    /// Build connection settings from the instance's config.
    ///
    /// # Errors
    ///
    /// [`ToolsetError::MissingConfig`] when the instance has no config,
    /// [`ToolsetError::MissingField`] or [`ToolsetError::InvalidField`] when a
    /// setting the vendor needs is absent or malformed.
    fn connection(&self, instance: &ServiceInstance) -> ToolsetResult<ConnectionSettings>;
}

/// Reads settings out of one instance's config on behalf of one adapter.
struct Settings<'a> {
    service_type: &'static str,
    instance: &'a ServiceInstance,
    config: &'a ServiceInstanceConfig,
}

impl<'a> Settings<'a> {
    fn of(service_type: &'static str, instance: &'a ServiceInstance) -> ToolsetResult<Self> {
        match instance.config.as_ref() {
            Some(config) if !config.is_empty() => Ok(Self {
                service_type,
                instance,
                config,
            }),
            _ => Err(ToolsetError::MissingConfig {
                instance: instance.name.clone(),
            }),
        }
    }

    fn optional(&self, keys: &[&str]) -> Option<&'a str> {
        self.config.get_str(keys)
    }

    fn required(&self, keys: &[&str]) -> ToolsetResult<&'a str> {
        self.optional(keys).ok_or_else(|| ToolsetError::MissingField {
            service_type: self.service_type.to_owned(),
            instance: self.instance.name.clone(),
            field: keys.first().copied().unwrap_or_default().to_owned(),
        })
    }

    fn raw(&self, key: &str) -> Option<&'a Value> {
        self.config.get(key).filter(|v| !v.is_null())
    }

    fn invalid(&self, field: &str, message: impl Into<String>) -> ToolsetError {
        ToolsetError::InvalidField {
            service_type: self.service_type.to_owned(),
            instance: self.instance.name.clone(),
            field: field.to_owned(),
            message: message.into(),
        }
    }

    /// Integer setting given either as a number or a numeric string.
    fn integer<T: TryFrom<u64>>(&self, key: &str) -> ToolsetResult<Option<T>> {
        let parsed = match self.raw(key) {
            None => return Ok(None),
            Some(Value::Number(n)) => n.as_u64(),
            Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
            Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
            Some(_) => None,
        };
        parsed
            .and_then(|n| T::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| self.invalid(key, "expected a non-negative integer in range"))
    }
}

/// Elasticsearch and OpenSearch.
#[derive(Debug, Clone, Copy)]
pub struct SearchAdapter {
    service_type: &'static str,
    flavor: SearchFlavor,
}

impl SearchAdapter {
    /// Adapter registered under `elasticsearch`.
    #[must_use]
    pub fn elasticsearch() -> Self {
        Self {
            service_type: "elasticsearch",
            flavor: SearchFlavor::Elasticsearch,
        }
    }

    /// Adapter registered under `opensearch`.
    #[must_use]
    pub fn opensearch() -> Self {
        Self {
            service_type: "opensearch",
            flavor: SearchFlavor::OpenSearch,
        }
    }
}

impl VendorAdapter for SearchAdapter {
    fn service_type(&self) -> &'static str {
        self.service_type
    }

    fn connection(&self, instance: &ServiceInstance) -> ToolsetResult<ConnectionSettings> {
        let settings = Settings::of(self.service_type, instance)?;
        let url = settings.required(&["elasticsearchUrl", "elasticsearch_url"])?;

        let flavor = match settings.optional(&["type"]) {
            Some(kind) if kind.eq_ignore_ascii_case("opensearch") => SearchFlavor::OpenSearch,
            _ => self.flavor,
        };

        let auth = if let Some(key) = settings.optional(&["apiKey", "api_key"]) {
            SearchAuth::ApiKey(Secret::new(key))
        } else if let Some(username) = settings.optional(&["username"]) {
            SearchAuth::Basic {
                username: username.to_owned(),
                password: Secret::new(settings.optional(&["password"]).unwrap_or_default()),
            }
        } else {
            SearchAuth::None
        };

        Ok(ConnectionSettings::Search(SearchConnection {
            flavor,
            url: url.to_owned(),
            auth,
        }))
    }
}

/// Kafka brokers.
#[derive(Debug, Clone, Copy, Default)]
pub struct KafkaAdapter;

impl VendorAdapter for KafkaAdapter {
    fn service_type(&self) -> &'static str {
        "kafka"
    }

    fn connection(&self, instance: &ServiceInstance) -> ToolsetResult<ConnectionSettings> {
        let settings = Settings::of(self.service_type(), instance)?;

        let brokers: Vec<String> = match settings.raw("brokers") {
            None => Vec::new(),
            Some(Value::String(list)) => list
                .split(',')
                .map(str::trim)
                .filter(|b| !b.is_empty())
                .map(str::to_owned)
                .collect(),
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|b| !b.is_empty())
                .map(str::to_owned)
                .collect(),
            Some(_) => {
                return Err(settings.invalid("brokers", "expected an array or comma-separated string"));
            },
        };
        if brokers.is_empty() {
            return Err(ToolsetError::MissingField {
                service_type: self.service_type().to_owned(),
                instance: instance.name.clone(),
                field: "brokers".to_owned(),
            });
        }

        let security_protocol = settings
            .optional(&["securityProtocol", "security_protocol"])
            .unwrap_or(DEFAULT_SECURITY_PROTOCOL)
            .to_owned();

        let sasl = if security_protocol.starts_with("SASL_") {
            let sasl = settings.raw("sasl");
            let field = |key: &str| {
                sasl.and_then(|s| s.get(key))
                    .and_then(Value::as_str)
                    .filter(|v| !v.is_empty())
            };
            Some(SaslSettings {
                mechanism: field("mechanism")
                    .unwrap_or(DEFAULT_SASL_MECHANISM)
                    .to_owned(),
                username: field("username").map(str::to_owned),
                password: field("password").map(Secret::new),
            })
        } else {
            None
        };

        Ok(ConnectionSettings::Kafka(KafkaConnection {
            brokers,
            security_protocol,
            sasl,
        }))
    }
}

/// Kafka Connect REST API.
#[derive(Debug, Clone, Copy, Default)]
pub struct KafkaConnectAdapter;

impl VendorAdapter for KafkaConnectAdapter {
    fn service_type(&self) -> &'static str {
        "kafka-connect"
    }

    fn connection(&self, instance: &ServiceInstance) -> ToolsetResult<ConnectionSettings> {
        let settings = Settings::of(self.service_type(), instance)?;
        let rest_url = settings.required(&["restUrl", "rest_url"])?;
        Ok(ConnectionSettings::KafkaConnect(KafkaConnectConnection {
            rest_url: rest_url.trim_end_matches('/').to_owned(),
        }))
    }
}

/// MongoDB.
#[derive(Debug, Clone, Copy, Default)]
pub struct MongoAdapter;

impl VendorAdapter for MongoAdapter {
    fn service_type(&self) -> &'static str {
        "mongodb"
    }

    fn connection(&self, instance: &ServiceInstance) -> ToolsetResult<ConnectionSettings> {
        let settings = Settings::of(self.service_type(), instance)?;
        let connection_string = settings.required(&["connectionString", "connection_string"])?;
        let database = settings
            .optional(&["database"])
            .unwrap_or(DEFAULT_MONGO_DATABASE);
        Ok(ConnectionSettings::MongoDb(MongoConnection {
            connection_string: Secret::new(connection_string),
            database: database.to_owned(),
        }))
    }
}

/// Redis.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedisAdapter;

impl VendorAdapter for RedisAdapter {
    fn service_type(&self) -> &'static str {
        "redis"
    }

    fn connection(&self, instance: &ServiceInstance) -> ToolsetResult<ConnectionSettings> {
        let settings = Settings::of(self.service_type(), instance)?;
        let host = settings.required(&["host"])?;
        Ok(ConnectionSettings::Redis(RedisConnection {
            host: host.to_owned(),
            port: settings.integer("port")?.unwrap_or(DEFAULT_REDIS_PORT),
            password: settings.optional(&["password"]).map(Secret::new),
            database: settings.integer("database")?.unwrap_or(0),
        }))
    }
}

/// Kubernetes clusters.
#[derive(Debug, Clone, Copy, Default)]
pub struct KubernetesAdapter;

impl VendorAdapter for KubernetesAdapter {
    fn service_type(&self) -> &'static str {
        "kubernetes"
    }

    fn connection(&self, instance: &ServiceInstance) -> ToolsetResult<ConnectionSettings> {
        let settings = Settings::of(self.service_type(), instance)?;
        let kubeconfig = settings.required(&["kubeconfig"])?;
        Ok(ConnectionSettings::Kubernetes(KubernetesConnection {
            kubeconfig: Secret::new(kubeconfig),
        }))
    }
}

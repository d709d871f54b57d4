//! Typed connection settings, one shape per vendor.
//!
//! Secrets are wrapped in [`Secret`] so that `Debug` output and logs never
//! carry them.

use std::fmt;

use serde::Serialize;

/// A credential that prints as `***`.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    /// Wrap a credential.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw credential, for handing to a vendor client.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

impl Serialize for Secret {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("***")
    }
}

/// Which search engine a search instance runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchFlavor {
    /// Elasticsearch.
    Elasticsearch,
    /// OpenSearch.
    OpenSearch,
}

/// Credentials for a search cluster. An API key wins over basic auth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchAuth {
    /// Anonymous.
    None,
    /// `Authorization: ApiKey ...`.
    ApiKey(Secret),
    /// HTTP basic auth.
    Basic {
        /// User name.
        username: String,
        /// Password, possibly empty.
        password: Secret,
    },
}

/// Elasticsearch / OpenSearch endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchConnection {
    /// Engine flavor.
    pub flavor: SearchFlavor,
    /// Cluster URL.
    pub url: String,
    /// Credentials.
    pub auth: SearchAuth,
}

/// SASL credentials for a Kafka cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaslSettings {
    /// SASL mechanism, `PLAIN` unless configured.
    pub mechanism: String,
    /// SASL user.
    pub username: Option<String>,
    /// SASL password.
    pub password: Option<Secret>,
}

/// Kafka bootstrap settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KafkaConnection {
    /// Bootstrap brokers, never empty.
    pub brokers: Vec<String>,
    /// `security.protocol`, `PLAINTEXT` unless configured.
    pub security_protocol: String,
    /// Present only for the SASL protocols.
    pub sasl: Option<SaslSettings>,
}

impl KafkaConnection {
    /// Brokers joined the way client libraries expect (`a:9092,b:9092`).
    #[must_use]
    pub fn bootstrap_servers(&self) -> String {
        self.brokers.join(",")
    }
}

/// Kafka Connect REST endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KafkaConnectConnection {
    /// REST base URL.
    pub rest_url: String,
}

/// MongoDB connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MongoConnection {
    /// Connection string. Usually embeds credentials, so it is a secret.
    pub connection_string: Secret,
    /// Database, `admin` unless configured.
    pub database: String,
}

/// Redis connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedisConnection {
    /// Host name.
    pub host: String,
    /// Port, 6379 unless configured.
    pub port: u16,
    /// `AUTH` password.
    pub password: Option<Secret>,
    /// Logical database, 0 unless configured.
    pub database: u32,
}

/// Kubernetes API access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KubernetesConnection {
    /// Kubeconfig document.
    pub kubeconfig: Secret,
}

/// Connection settings for one instance, by vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConnectionSettings {
    /// Elasticsearch or OpenSearch.
    Search(SearchConnection),
    /// Kafka brokers.
    Kafka(KafkaConnection),
    /// Kafka Connect.
    KafkaConnect(KafkaConnectConnection),
    /// MongoDB.
    MongoDb(MongoConnection),
    /// Redis.
    Redis(RedisConnection),
    /// Kubernetes.
    Kubernetes(KubernetesConnection),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_is_redacted() {
        let conn = RedisConnection {
            host: "cache.internal".to_owned(),
            port: 6379,
            password: Some(Secret::new("hunter2-redis")),
            database: 0,
        };
        let debug = format!("{conn:?}");
        assert!(debug.contains("cache.internal"));
        assert!(!debug.contains("hunter2-redis"));

        let json = serde_json::to_string(&ConnectionSettings::Redis(conn)).unwrap();
        assert!(!json.contains("hunter2-redis"));
        assert!(json.contains("\"kind\":\"redis\""));
    }

    #[test]
    fn test_bootstrap_servers() {
        let conn = KafkaConnection {
            brokers: vec!["a:9092".to_owned(), "b:9092".to_owned()],
            security_protocol: "PLAINTEXT".to_owned(),
            sasl: None,
        };
        assert_eq!(conn.bootstrap_servers(), "a:9092,b:9092");
    }

    #[test]
    fn test_expose() {
        assert_eq!(Secret::new("k").expose(), "k");
    }
}

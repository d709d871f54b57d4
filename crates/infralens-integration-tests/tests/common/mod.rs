//! Shared wiring for integration tests.

use std::sync::Arc;
use std::time::Duration;

use infralens_config::ResolverConfig;
use infralens_registry::{InstanceResolver, RegistryClient};
use infralens_test::{MockTransport, setup_test_logging, test_config};

/// A resolver over a mock registry.
#[allow(dead_code)]
pub struct Stack {
    /// The scripted registry.
    pub mock: MockTransport,
    /// Client shared by the resolver.
    pub client: Arc<RegistryClient>,
    /// Resolver under test.
    pub resolver: InstanceResolver,
}

impl Stack {
    /// Default config (name lookup on, strict health).
    pub fn new(mock: MockTransport) -> Self {
        Self::with_config(mock, &test_config())
    }

    /// Name lookup switched off.
    #[allow(dead_code)]
    pub fn without_name_lookup(mock: MockTransport) -> Self {
        Self::with_config(mock, &test_config().with_name_lookup(false))
    }

    /// Custom config.
    pub fn with_config(mock: MockTransport, config: &ResolverConfig) -> Self {
        setup_test_logging("warn");
        let client = Arc::new(RegistryClient::with_transport(mock.transport(), config));
        let resolver = InstanceResolver::new(Arc::clone(&client));
        Self {
            mock,
            client,
            resolver,
        }
    }

    /// Custom cache TTL, name lookup off.
    #[allow(dead_code)]
    pub fn with_ttl(mock: MockTransport, ttl: Duration) -> Self {
        setup_test_logging("warn");
        let config = test_config().with_name_lookup(false);
        let client = Arc::new(
            RegistryClient::with_transport(mock.transport(), &config).with_cache_ttl(ttl),
        );
        let resolver = InstanceResolver::new(Arc::clone(&client));
        Self {
            mock,
            client,
            resolver,
        }
    }
}

//! Mock implementations for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use infralens_registry::{ApiRequest, RegistryError, RegistryResult, Transport};
use serde_json::Value;

/// Scripted reply for one request path.
#[derive(Debug, Clone, PartialEq)]
pub enum MockReply {
    /// 2xx with this JSON body.
    Json(Value),
    /// Non-success HTTP status. 404 surfaces as `RegistryError::NotFound`.
    Status(u16),
    /// The request never reached the registry.
    Unreachable(String),
}

#[derive(Debug, Default)]
struct State {
    calls: HashMap<String, usize>,
    requests: Vec<String>,
}

/// Mock implementation of the registry [`Transport`].
///
/// Routes are keyed by the rendered request path including the query
/// string, e.g. `/api/service-instances/kafka?userId=u-1`. Unrouted paths
/// answer 404. Clones share routes and counters, so a test can keep one
/// handle and give the other to a client.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    routes: Arc<Mutex<HashMap<String, MockReply>>>,
    state: Arc<Mutex<State>>,
    total: Arc<AtomicUsize>,
}

impl MockTransport {
    /// Create a mock with no routes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `path` with `body`.
    #[must_use]
    pub fn with_json(self, path: impl Into<String>, body: Value) -> Self {
        self.set(path, MockReply::Json(body));
        self
    }

    /// Answer `path` with an HTTP error status.
    #[must_use]
    pub fn with_status(self, path: impl Into<String>, status: u16) -> Self {
        self.set(path, MockReply::Status(status));
        self
    }

    /// Fail `path` as if the registry were unreachable.
    #[must_use]
    pub fn with_unreachable(self, path: impl Into<String>) -> Self {
        self.set(path, MockReply::Unreachable("connection refused".to_owned()));
        self
    }

    /// Replace the reply for `path` after construction.
    pub fn set(&self, path: impl Into<String>, reply: MockReply) {
        if let Ok(mut routes) = self.routes.lock() {
            routes.insert(path.into(), reply);
        }
    }

    /// This mock as a shareable transport handle.
    #[must_use]
    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::new(self.clone())
    }

    /// Requests seen for `path`.
    #[must_use]
    pub fn calls(&self, path: &str) -> usize {
        self.state
            .lock()
            .map(|s| s.calls.get(path).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Requests seen across all paths.
    #[must_use]
    pub fn total_calls(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    /// Every request path in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|s| s.requests.clone())
            .unwrap_or_default()
    }

    /// Forget recorded requests; routes are kept.
    pub fn reset_calls(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.calls.clear();
            state.requests.clear();
        }
        self.total.store(0, Ordering::SeqCst);
    }

    fn record(&self, path: &str) {
        self.total.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut state) = self.state.lock() {
            let count = state.calls.entry(path.to_owned()).or_insert(0);
            *count = count.saturating_add(1);
            state.requests.push(path.to_owned());
        }
    }
}

impl Transport for MockTransport {
    fn get(&self, request: &ApiRequest) -> RegistryResult<Value> {
        let path = request.to_string();
        self.record(&path);
        tracing::trace!(path = %path, "mock transport request");

        let reply = self
            .routes
            .lock()
            .ok()
            .and_then(|routes| routes.get(&path).cloned());

        match reply {
            Some(MockReply::Json(body)) => Ok(body),
            Some(MockReply::Status(404)) | None => Err(RegistryError::NotFound { path }),
            Some(MockReply::Status(status)) => Err(RegistryError::Status { status, url: path }),
            Some(MockReply::Unreachable(message)) => Err(RegistryError::Transport(message)),
        }
    }
}

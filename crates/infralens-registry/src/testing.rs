//! In-crate transport double for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

use crate::error::{RegistryError, RegistryResult};
use crate::transport::{ApiRequest, Transport};

/// Answers from a fixed route table keyed by rendered request path; anything
/// unrouted is a 404. Records every request it sees.
#[derive(Default)]
pub(crate) struct RouteTransport {
    routes: HashMap<String, Value>,
    failing: Vec<String>,
    seen: Mutex<Vec<String>>,
}

impl RouteTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn route(mut self, path: &str, body: Value) -> Self {
        self.routes.insert(path.to_owned(), body);
        self
    }

    pub(crate) fn fail(mut self, path: &str) -> Self {
        self.failing.push(path.to_owned());
        self
    }

    pub(crate) fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, path: &str) -> usize {
        self.seen().iter().filter(|p| *p == path).count()
    }
}

impl Transport for RouteTransport {
    fn get(&self, request: &ApiRequest) -> RegistryResult<Value> {
        let path = request.to_string();
        self.seen.lock().unwrap().push(path.clone());

        if self.failing.contains(&path) {
            return Err(RegistryError::Transport("connection refused".to_owned()));
        }
        self.routes
            .get(&path)
            .cloned()
            .ok_or(RegistryError::NotFound { path })
    }
}

//! Identifier → service-instance resolution.
//!
//! Strategies run strictly in order and the first hit wins:
//!
//! 1. direct ID lookup, accepted only when the service type matches
//! 2. by-name lookup (when enabled on the client)
//! 3. scan of the cached/fetched listing: exact name, then case-insensitive
//!    name, then substring
//!
//! A failing strategy is just a miss; nothing here returns an error.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::client::RegistryClient;
use crate::extractor::{PatternKind, PromptExtractor};
use crate::types::ServiceInstance;

/// Which strategy produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStrategy {
    /// The identifier was the instance ID.
    DirectId,
    /// The by-name endpoint returned the instance.
    NameLookup,
    /// A listed instance's name equals the identifier exactly.
    ExactName,
    /// A listed instance's name equals the identifier ignoring case.
    CaseInsensitiveName,
    /// A listed instance's name contains the identifier, ignoring case.
    PartialName,
}

impl ResolutionStrategy {
    /// Short label used in logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DirectId => "direct_id",
            Self::NameLookup => "name_lookup",
            Self::ExactName => "exact_name",
            Self::CaseInsensitiveName => "case_insensitive_name",
            Self::PartialName => "partial_name",
        }
    }
}

impl fmt::Display for ResolutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved instance and how it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The instance.
    pub instance: ServiceInstance,
    /// The winning strategy.
    pub strategy: ResolutionStrategy,
}

/// A resolution reached from a prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptResolution {
    /// Token that resolved.
    pub token: String,
    /// Pattern family that produced the token.
    pub pattern: PatternKind,
    /// The resolution for `token`.
    pub resolution: Resolution,
}

/// Runs the resolution cascade against one [`RegistryClient`].
#[derive(Debug, Clone)]
pub struct InstanceResolver {
    client: Arc<RegistryClient>,
    extractor: PromptExtractor,
}

impl InstanceResolver {
    /// Resolver over `client` with the default prompt extractor.
    #[must_use]
    pub fn new(client: Arc<RegistryClient>) -> Self {
        Self {
            client,
            extractor: PromptExtractor::new(),
        }
    }

    /// Use a custom prompt extractor.
    #[must_use]
    pub fn with_extractor(mut self, extractor: PromptExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// The underlying registry client.
    #[must_use]
    pub fn client(&self) -> &Arc<RegistryClient> {
        &self.client
    }

    /// The prompt extractor.
    #[must_use]
    pub fn extractor(&self) -> &PromptExtractor {
        &self.extractor
    }

    /// Resolve `identifier` to an instance of `service_type`.
    #[must_use]
    pub fn resolve(
        &self,
        service_type: &str,
        identifier: &str,
        user_id: Option<&str>,
    ) -> Option<ServiceInstance> {
        self.resolve_detailed(service_type, identifier, user_id)
            .map(|r| r.instance)
    }

    /// Like [`resolve`](Self::resolve), also reporting the winning strategy.
    #[must_use]
    pub fn resolve_detailed(
        &self,
        service_type: &str,
        identifier: &str,
        user_id: Option<&str>,
    ) -> Option<Resolution> {
        if identifier.trim().is_empty() {
            debug!(service_type, "empty identifier; nothing to resolve");
            return None;
        }
        debug!(service_type, identifier, "Resolving instance");

        match self.client.get_by_id(identifier, true) {
            Some(instance) if instance.service_type == service_type => {
                return Some(hit(identifier, instance, ResolutionStrategy::DirectId));
            },
            Some(instance) => debug!(
                identifier,
                found_type = %instance.service_type,
                "ID belongs to another service type"
            ),
            None => debug!(identifier, "no instance with that ID"),
        }

        if self.client.name_lookup_enabled() {
            if let Some(instance) = self.client.get_by_name_and_type(service_type, identifier, true)
            {
                return Some(hit(identifier, instance, ResolutionStrategy::NameLookup));
            }
            debug!(identifier, "by-name lookup missed");
        }

        let instances = self.client.list_instances(Some(service_type), user_id);
        if let Some((instance, strategy)) = match_by_name(&instances, identifier) {
            return Some(hit(identifier, instance.clone(), strategy));
        }

        warn!(service_type, identifier, "Could not resolve instance");
        None
    }

    /// Resolve the first candidate in `prompt` that names an instance.
    ///
    /// An empty prompt returns `None` without touching the registry.
    #[must_use]
    pub fn extract_and_resolve(
        &self,
        prompt: &str,
        service_type: &str,
        user_id: Option<&str>,
    ) -> Option<ServiceInstance> {
        self.extract_and_resolve_detailed(prompt, service_type, user_id)
            .map(|r| r.resolution.instance)
    }

    /// Like [`extract_and_resolve`](Self::extract_and_resolve), also
    /// reporting the token and pattern that won.
    #[must_use]
    pub fn extract_and_resolve_detailed(
        &self,
        prompt: &str,
        service_type: &str,
        user_id: Option<&str>,
    ) -> Option<PromptResolution> {
        let candidates = self.extractor.candidates(prompt);
        if candidates.is_empty() {
            debug!(service_type, "no candidate identifiers in prompt");
            return None;
        }

        for candidate in candidates {
            debug!(token = %candidate.token, pattern = ?candidate.kind, "trying prompt candidate");
            if let Some(resolution) = self.resolve_detailed(service_type, &candidate.token, user_id)
            {
                info!(
                    token = %candidate.token,
                    pattern = ?candidate.kind,
                    instance = %resolution.instance.name,
                    "Identified instance from prompt"
                );
                return Some(PromptResolution {
                    token: candidate.token,
                    pattern: candidate.kind,
                    resolution,
                });
            }
        }
        None
    }
}

fn hit(identifier: &str, instance: ServiceInstance, strategy: ResolutionStrategy) -> Resolution {
    info!(
        identifier,
        instance_id = %instance.instance_id,
        name = %instance.name,
        strategy = %strategy,
        "Resolved instance"
    );
    Resolution { instance, strategy }
}

/// Three-pass name match over a listing.
///
/// 1. exact, case-sensitive
/// 2. case-insensitive; when several names qualify, the one spelled in
///    lower case wins, otherwise the first in listing order
/// 3. case-insensitive substring, first in listing order
#[must_use]
pub fn match_by_name<'a>(
    instances: &'a [ServiceInstance],
    identifier: &str,
) -> Option<(&'a ServiceInstance, ResolutionStrategy)> {
    if let Some(instance) = instances.iter().find(|i| i.name == identifier) {
        return Some((instance, ResolutionStrategy::ExactName));
    }

    let needle = identifier.to_lowercase();
    let mut folded = instances
        .iter()
        .filter(|i| i.name.to_lowercase() == needle)
        .peekable();
    if let Some(first) = folded.peek().copied() {
        let chosen = folded.find(|i| i.name == needle).unwrap_or(first);
        return Some((chosen, ResolutionStrategy::CaseInsensitiveName));
    }

    instances
        .iter()
        .find(|i| i.name.to_lowercase().contains(&needle))
        .map(|i| (i, ResolutionStrategy::PartialName))
}

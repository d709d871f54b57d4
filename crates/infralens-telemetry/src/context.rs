//! Per-resolution context for log correlation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies one attempt to turn tool parameters into a service instance.
///
/// Every registry call made while the context's span is entered carries the
/// same `resolution_id`, so a single log query shows the whole cascade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionContext {
    /// Unique identifier for this resolution.
    pub resolution_id: Uuid,
    /// Service type being resolved (e.g. `elasticsearch`).
    pub service_type: String,
    /// User on whose behalf the registry is queried.
    pub user_id: Option<String>,
    /// Toolset or component that started the resolution.
    pub source: String,
    /// When the resolution started.
    pub started_at: DateTime<Utc>,
}

impl ResolutionContext {
    /// Create a context for resolving an instance of `service_type`.
    #[must_use]
    pub fn new(source: impl Into<String>, service_type: impl Into<String>) -> Self {
        Self {
            resolution_id: Uuid::new_v4(),
            service_type: service_type.into(),
            user_id: None,
            source: source.into(),
            started_at: Utc::now(),
        }
    }

    /// Set the user ID.
    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Time since the resolution started.
    #[must_use]
    pub fn elapsed(&self) -> chrono::Duration {
        // started_at is set at construction, so now() is never earlier
        #[allow(clippy::arithmetic_side_effects)]
        let elapsed = Utc::now() - self.started_at;
        elapsed
    }

    /// Elapsed time in milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> i64 {
        self.elapsed().num_milliseconds()
    }

    /// Create a tracing span carrying this context.
    #[must_use]
    pub fn span(&self) -> tracing::Span {
        tracing::info_span!(
            "resolve",
            resolution_id = %self.resolution_id,
            service_type = %self.service_type,
            user_id = self.user_id.as_deref(),
            source = %self.source,
        )
    }

    /// First eight characters of the resolution ID.
    #[must_use]
    pub fn short_id(&self) -> String {
        self.resolution_id.simple().to_string().chars().take(8).collect()
    }
}

/// Keeps a [`ResolutionContext`] span entered and logs the elapsed time when
/// dropped.
pub struct ResolutionGuard {
    context: ResolutionContext,
    /// Held to keep the span active until the guard is dropped.
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl ResolutionGuard {
    /// Enter the context's span.
    #[must_use]
    pub fn new(context: ResolutionContext) -> Self {
        let span = context.span().entered();
        tracing::debug!("Resolution started");
        Self { context, span }
    }

    /// The guarded context.
    #[must_use]
    pub fn context(&self) -> &ResolutionContext {
        &self.context
    }
}

impl Drop for ResolutionGuard {
    fn drop(&mut self) {
        tracing::debug!(elapsed_ms = self.context.elapsed_ms(), "Resolution finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_creation() {
        let ctx = ResolutionContext::new("elasticsearch-toolset", "elasticsearch");
        assert_eq!(ctx.source, "elasticsearch-toolset");
        assert_eq!(ctx.service_type, "elasticsearch");
        assert!(ctx.user_id.is_none());
    }

    #[test]
    fn test_with_user_id() {
        let ctx = ResolutionContext::new("kafka-toolset", "kafka").with_user_id("u-42");
        assert_eq!(ctx.user_id.as_deref(), Some("u-42"));
    }

    #[test]
    fn test_distinct_ids() {
        let a = ResolutionContext::new("t", "redis");
        let b = ResolutionContext::new("t", "redis");
        assert_ne!(a.resolution_id, b.resolution_id);
    }

    #[test]
    fn test_elapsed() {
        let ctx = ResolutionContext::new("t", "mongodb");
        std::thread::sleep(std::time::Duration::from_millis(10));
        assert!(ctx.elapsed_ms() >= 10);
    }

    #[test]
    fn test_short_id() {
        let ctx = ResolutionContext::new("t", "mongodb");
        assert_eq!(ctx.short_id().len(), 8);
    }

    #[test]
    fn test_guard_exposes_context() {
        let ctx = ResolutionContext::new("t", "kubernetes");
        let id = ctx.resolution_id;
        let guard = ResolutionGuard::new(ctx);
        assert_eq!(guard.context().resolution_id, id);
    }

    #[test]
    fn test_serialization() {
        let ctx = ResolutionContext::new("t", "elasticsearch").with_user_id("u-1");
        let json = serde_json::to_string(&ctx).unwrap();
        assert!(json.contains("\"service_type\":\"elasticsearch\""));

        let parsed: ResolutionContext = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.user_id.as_deref(), Some("u-1"));
    }
}

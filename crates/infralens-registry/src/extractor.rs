//! Candidate-identifier extraction from free-text prompts.
//!
//! Patterns are evaluated in a fixed order, most specific first. Every match
//! of an earlier pattern is tried before any match of a later one, so an
//! explicit `cluster_name: foo` always beats `bar elasticsearch` elsewhere in
//! the same prompt.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::warn;

/// Service types recognised by the `<token> <service type>` patterns unless
/// overridden with [`PromptExtractor::with_service_types`].
pub const DEFAULT_SERVICE_TYPES: &[&str] =
    &["elasticsearch", "kafka", "mongodb", "redis", "kubernetes"];

/// Tokens this short are never tried.
const MAX_IGNORED_TOKEN_LEN: usize = 2;

const TOKEN: &str = "[a-z0-9_-]";

static ANNOTATIONS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    ["cluster_name", "instance_name", "service_name"]
        .map(|key| Regex::new(&format!(r"{key}:\s*({TOKEN}+)")).expect("invalid regex"))
});
static POSSESSIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"my\s+({TOKEN}+)(?:\s+(?:instance|cluster|service))?"
    ))
    .expect("invalid regex")
});
static GENERIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?:instance|cluster|service)\s+({TOKEN}+)")).expect("invalid regex")
});
static GENERIC_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"({TOKEN}{{3,}})(?:\s+(?:instance|cluster|service))"))
        .expect("invalid regex")
});

/// Which family of pattern produced a candidate, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// `cluster_name: x`, `instance_name: x`, `service_name: x`.
    Annotation,
    /// `x elasticsearch`, `x kafka`, ...
    ServiceType,
    /// `my x`.
    Possessive,
    /// `cluster x`, `instance x`, `service x`.
    Generic,
    /// `x cluster`, `x instance`, `x service`.
    GenericSuffix,
}

/// A token pulled out of a prompt, with the pattern that found it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Lower-cased identifier to resolve.
    pub token: String,
    /// Pattern family that matched.
    pub kind: PatternKind,
}

#[derive(Debug, Clone)]
struct PromptPattern {
    kind: PatternKind,
    regex: Regex,
}

/// Ordered regex cascade over lower-cased prompts.
#[derive(Debug, Clone)]
pub struct PromptExtractor {
    patterns: Vec<PromptPattern>,
}

impl PromptExtractor {
    /// Extractor recognising [`DEFAULT_SERVICE_TYPES`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            patterns: build_patterns(DEFAULT_SERVICE_TYPES),
        }
    }

    /// Replace the service-type words used by the `<token> <type>` patterns.
    #[must_use]
    pub fn with_service_types<I, S>(mut self, service_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let types: Vec<S> = service_types.into_iter().collect();
        self.patterns = build_patterns(&types);
        self
    }

    /// The pattern families in evaluation order, one entry per pattern.
    #[must_use]
    pub fn pattern_kinds(&self) -> Vec<PatternKind> {
        self.patterns.iter().map(|p| p.kind).collect()
    }

    /// Ordered, de-duplicated candidates for `prompt`.
    ///
    /// Pattern order dominates: every match of pattern *n* precedes every
    /// match of pattern *n+1*. Within a pattern, matches keep their position
    /// in the prompt. Tokens of two characters or fewer are dropped, and a
    /// token already produced by an earlier pattern is not repeated.
    #[must_use]
    pub fn candidates(&self, prompt: &str) -> Vec<Candidate> {
        if prompt.trim().is_empty() {
            return Vec::new();
        }
        let lowered = prompt.to_lowercase();

        let mut out: Vec<Candidate> = Vec::new();
        for pattern in &self.patterns {
            for captures in pattern.regex.captures_iter(&lowered) {
                let Some(token) = captures.get(1).map(|m| m.as_str()) else {
                    continue;
                };
                if token.chars().count() <= MAX_IGNORED_TOKEN_LEN {
                    continue;
                }
                if out.iter().any(|c| c.token == token) {
                    continue;
                }
                out.push(Candidate {
                    token: token.to_owned(),
                    kind: pattern.kind,
                });
            }
        }
        out
    }
}

impl Default for PromptExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn build_patterns<S: AsRef<str>>(service_types: &[S]) -> Vec<PromptPattern> {
    let mut patterns: Vec<PromptPattern> = ANNOTATIONS
        .iter()
        .map(|regex| PromptPattern {
            kind: PatternKind::Annotation,
            regex: regex.clone(),
        })
        .collect();

    for service_type in service_types {
        let word = service_type.as_ref().trim().to_lowercase();
        if word.is_empty() {
            continue;
        }
        let source = format!(r"({TOKEN}+)\s+{}(?:\s+cluster)?", regex::escape(&word));
        match Regex::new(&source) {
            Ok(regex) => patterns.push(PromptPattern {
                kind: PatternKind::ServiceType,
                regex,
            }),
            Err(e) => warn!(service_type = %word, error = %e, "Skipping service-type pattern"),
        }
    }

    for (kind, regex) in [
        (PatternKind::Possessive, &*POSSESSIVE),
        (PatternKind::Generic, &*GENERIC),
        (PatternKind::GenericSuffix, &*GENERIC_SUFFIX),
    ] {
        patterns.push(PromptPattern {
            kind,
            regex: regex.clone(),
        });
    }

    patterns
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(prompt: &str) -> Vec<String> {
        PromptExtractor::new()
            .candidates(prompt)
            .into_iter()
            .map(|c| c.token)
            .collect()
    }

    #[test]
    fn test_pattern_order() {
        let kinds = PromptExtractor::new().pattern_kinds();
        assert_eq!(kinds.len(), 3 + DEFAULT_SERVICE_TYPES.len() + 3);
        assert!(kinds.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(kinds[0], PatternKind::Annotation);
        assert_eq!(kinds[kinds.len() - 1], PatternKind::GenericSuffix);
    }

    #[test]
    fn test_annotation_beats_service_type() {
        let candidates =
            PromptExtractor::new().candidates("cluster_name: payments-es elasticsearch cluster");
        assert_eq!(candidates[0].token, "payments-es");
        assert_eq!(candidates[0].kind, PatternKind::Annotation);
    }

    #[test]
    fn test_annotation_order_across_keys() {
        let toks = tokens("service_name: svc-a instance_name: inst-b cluster_name: clu-c");
        assert_eq!(toks[..3], ["clu-c", "inst-b", "svc-a"]);
    }

    #[test]
    fn test_service_type_adjacency() {
        let candidates = PromptExtractor::new().candidates("Check the Orders MongoDB health");
        assert_eq!(candidates[0].token, "orders");
        assert_eq!(candidates[0].kind, PatternKind::ServiceType);
    }

    #[test]
    fn test_possessive() {
        let candidates = PromptExtractor::new().candidates("is my billing-db ok?");
        assert_eq!(
            candidates[0],
            Candidate {
                token: "billing-db".to_owned(),
                kind: PatternKind::Possessive,
            }
        );
    }

    #[test]
    fn test_generic_and_suffix() {
        let candidates = PromptExtractor::new().candidates("look at cluster alpha1 and beta2 instance");
        let kinds: Vec<_> = candidates.iter().map(|c| (c.token.as_str(), c.kind)).collect();
        assert!(kinds.contains(&("alpha1", PatternKind::Generic)));
        assert!(kinds.contains(&("beta2", PatternKind::GenericSuffix)));
    }

    #[test]
    fn test_short_tokens_dropped() {
        assert!(tokens("my es cluster").iter().all(|t| t.len() > 2));
        assert!(!tokens("cluster_name: ab").contains(&"ab".to_owned()));
    }

    #[test]
    fn test_duplicates_collapsed() {
        let candidates = PromptExtractor::new().candidates("cluster_name: events events kafka");
        let events: Vec<_> = candidates.iter().filter(|c| c.token == "events").collect();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, PatternKind::Annotation);
    }

    #[test]
    fn test_empty_prompt() {
        assert!(tokens("").is_empty());
        assert!(tokens("   ").is_empty());
    }

    #[test]
    fn test_custom_service_types() {
        let extractor = PromptExtractor::new().with_service_types(["opensearch"]);
        let candidates = extractor.candidates("search-prod opensearch is slow");
        assert_eq!(candidates[0].token, "search-prod");
        assert_eq!(candidates[0].kind, PatternKind::ServiceType);

        // The default words are gone.
        let candidates = extractor.candidates("events kafka");
        assert!(candidates.iter().all(|c| c.kind != PatternKind::ServiceType));
    }
}

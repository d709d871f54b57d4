//! Integration tests for the identifier resolution cascade.
//!
//! Every test drives a real `RegistryClient` + `InstanceResolver` against a
//! scripted transport and asserts both the winner and the requests issued.

mod common;

use common::Stack;
use infralens_registry::ResolutionStrategy;
use infralens_test::{
    MockTransport, by_id_path, by_name_path, instance_record, listing, listing_path, point,
};

#[test]
fn id_match_wins_regardless_of_name() {
    let mock = MockTransport::new()
        .with_json(
            by_id_path("payments"),
            point(instance_record("payments", "elasticsearch", "logs-cluster")),
        )
        .with_json(
            by_name_path("elasticsearch", "payments"),
            point(instance_record("es-2", "elasticsearch", "payments")),
        )
        .with_json(
            listing_path("elasticsearch"),
            listing(vec![instance_record("es-2", "elasticsearch", "payments")]),
        );
    let stack = Stack::new(mock);

    let resolution = stack
        .resolver
        .resolve_detailed("elasticsearch", "payments", None)
        .unwrap();
    assert_eq!(resolution.strategy, ResolutionStrategy::DirectId);
    assert_eq!(resolution.instance.name, "logs-cluster");
    assert_eq!(stack.mock.total_calls(), 1);
}

#[test]
fn id_match_of_other_type_is_not_a_match() {
    let mock = MockTransport::new()
        .with_json(
            by_id_path("shared-1"),
            point(instance_record("shared-1", "kafka", "shared-1")),
        )
        .with_json(
            listing_path("redis"),
            listing(vec![instance_record("r-7", "redis", "shared-1")]),
        );
    let stack = Stack::without_name_lookup(mock);

    let resolution = stack.resolver.resolve_detailed("redis", "shared-1", None).unwrap();
    assert_eq!(resolution.instance.instance_id, "r-7");
    assert_eq!(resolution.strategy, ResolutionStrategy::ExactName);
}

#[test]
fn name_match_via_lookup_when_enabled() {
    let mock = MockTransport::new()
        .with_json(
            by_name_path("kafka", "events"),
            point(instance_record("k-1", "kafka", "events")),
        )
        .with_json(
            listing_path("kafka"),
            listing(vec![instance_record("k-1", "kafka", "events")]),
        );
    let stack = Stack::new(mock);

    let resolution = stack.resolver.resolve_detailed("kafka", "events", None).unwrap();
    assert_eq!(resolution.strategy, ResolutionStrategy::NameLookup);
    assert_eq!(stack.mock.calls(&listing_path("kafka")), 0);
    assert_eq!(
        stack.mock.requests(),
        vec![by_id_path("events"), by_name_path("kafka", "events")]
    );
}

#[test]
fn name_match_via_listing_when_disabled() {
    let mock = MockTransport::new().with_json(
        listing_path("kafka"),
        listing(vec![instance_record("k-1", "kafka", "events")]),
    );
    let stack = Stack::without_name_lookup(mock);

    let resolution = stack.resolver.resolve_detailed("kafka", "events", None).unwrap();
    assert_eq!(resolution.strategy, ResolutionStrategy::ExactName);
    assert_eq!(stack.mock.calls(&by_name_path("kafka", "events")), 0);
}

#[test]
fn case_insensitive_prefers_lowercase_spelling() {
    let mock = MockTransport::new().with_json(
        listing_path("redis"),
        listing(vec![
            instance_record("r-1", "redis", "Foo"),
            instance_record("r-2", "redis", "foo"),
        ]),
    );
    let stack = Stack::without_name_lookup(mock);

    let resolution = stack.resolver.resolve_detailed("redis", "FOO", None).unwrap();
    assert_eq!(resolution.instance.name, "foo");
    assert_eq!(resolution.strategy, ResolutionStrategy::CaseInsensitiveName);
}

#[test]
fn exact_case_beats_case_insensitive() {
    let mock = MockTransport::new().with_json(
        listing_path("redis"),
        listing(vec![
            instance_record("r-1", "redis", "FOO"),
            instance_record("r-2", "redis", "foo"),
        ]),
    );
    let stack = Stack::without_name_lookup(mock);

    let resolution = stack.resolver.resolve_detailed("redis", "foo", None).unwrap();
    assert_eq!(resolution.instance.instance_id, "r-2");
    assert_eq!(resolution.strategy, ResolutionStrategy::ExactName);
}

#[test]
fn substring_picks_first_in_listing_order() {
    let mock = MockTransport::new().with_json(
        listing_path("mongodb"),
        listing(vec![
            instance_record("m-1", "mongodb", "analytics"),
            instance_record("m-2", "mongodb", "eu-orders-primary"),
            instance_record("m-3", "mongodb", "us-orders-primary"),
        ]),
    );
    let stack = Stack::without_name_lookup(mock);

    let resolution = stack.resolver.resolve_detailed("mongodb", "ORDERS", None).unwrap();
    assert_eq!(resolution.instance.instance_id, "m-2");
    assert_eq!(resolution.strategy, ResolutionStrategy::PartialName);
}

#[test]
fn listing_is_user_scoped() {
    let mock = MockTransport::new().with_json(
        "/api/service-instances/kafka?userId=u-42",
        listing(vec![instance_record("k-9", "kafka", "private-events")]),
    );
    let stack = Stack::without_name_lookup(mock);

    let found = stack.resolver.resolve("kafka", "private", Some("u-42")).unwrap();
    assert_eq!(found.instance_id, "k-9");
    assert!(stack.resolver.resolve("kafka", "private", None).is_none());
}

#[test]
fn every_failure_degrades_to_absent() {
    let mock = MockTransport::new()
        .with_status(by_id_path("events"), 500)
        .with_unreachable(by_name_path("kafka", "events"))
        .with_json(listing_path("kafka"), serde_json::json!({"unexpected": true}));
    let stack = Stack::new(mock);

    assert!(stack.resolver.resolve("kafka", "events", None).is_none());
    assert_eq!(stack.mock.total_calls(), 3);
    // A broken listing is not cached.
    assert!(stack.client.cache().is_empty());
}

#[test]
fn short_identifiers_are_resolved_directly() {
    let mock = MockTransport::new()
        .with_json(by_id_path("es"), point(instance_record("es", "elasticsearch", "main")))
        .with_json(
            listing_path("elasticsearch"),
            listing(vec![instance_record("es", "elasticsearch", "main")]),
        );
    let stack = Stack::new(mock);

    // Two characters: strategy 1 still runs for a direct call.
    let found = stack.resolver.resolve("elasticsearch", "es", None).unwrap();
    assert_eq!(found.name, "main");

    // From a prompt the same token is filtered out before any lookup.
    stack.mock.reset_calls();
    assert!(stack
        .resolver
        .extract_and_resolve("check my es cluster", "elasticsearch", None)
        .is_none());
    assert_eq!(stack.mock.calls(&by_id_path("es")), 0);
}

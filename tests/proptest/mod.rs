// Test code is allowed to panic on failure
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

//! Property-based tests for rabbitmq-admission.
//!
//! Uses proptest to generate random inputs and verify invariants.

#[path = "../common/mod.rs"]
mod common;

use proptest::prelude::*;

use common::fixtures::{TriggerBuilder, full_source_spec, source, with_prefetch};
use rabbitmq_admission::webhooks::policies::annotations::{
    CPU_REQUEST_ANNOTATION, MEMORY_LIMIT_ANNOTATION, PARALLELISM_ANNOTATION, annotation_path,
};
use rabbitmq_admission::webhooks::policies::quantity::Quantity;
use rabbitmq_admission::{FieldErrorKind, ValidationContext, validate};

/// Strategy for generating parallelism values, in and around the valid range.
fn any_parallelism() -> impl Strategy<Value = i64> {
    prop_oneof![-10..=10i64, 990..=1010i64, any::<i64>()]
}

/// Strategy for generating well-formed quantities.
fn valid_quantity() -> impl Strategy<Value = String> {
    (
        1..=4096u32,
        prop_oneof![
            Just(""),
            Just("m"),
            Just("k"),
            Just("M"),
            Just("G"),
            Just("Ki"),
            Just("Mi"),
            Just("Gi"),
            Just("e3"),
        ],
    )
        .prop_map(|(n, suffix)| format!("{}{}", n, suffix))
}

proptest! {
    /// Property: Parallelism is accepted exactly when it lies in [1, 1000].
    #[test]
    fn parallelism_accepted_iff_in_bounds(value in any_parallelism()) {
        let trigger = TriggerBuilder::new("t")
            .broker("foo")
            .annotation(PARALLELISM_ANNOTATION, value.to_string())
            .build();
        let result = validate(&trigger, &ValidationContext::create());

        if (1..=1000).contains(&value) {
            prop_assert!(result.is_ok());
        } else {
            let err = result.unwrap_err();
            prop_assert!(err.has(FieldErrorKind::OutOfBounds, &annotation_path(PARALLELISM_ANNOTATION)));
            let expected = format!("expected 1 <= {} <= 1000", value);
            prop_assert_eq!(&err.flatten()[0].message, &expected);
        }
    }

    /// Property: Prefetch count on create is accepted exactly when it lies in [1, 1000].
    #[test]
    fn prefetch_accepted_iff_in_bounds(count in -5..=1005i32) {
        let resource = source(with_prefetch(full_source_spec(), count));
        let result = validate(&resource, &ValidationContext::create());
        prop_assert_eq!(result.is_ok(), (1..=1000).contains(&count));
    }

    /// Property: Arbitrary annotation values never panic and only yield parse or bounds errors.
    #[test]
    fn arbitrary_annotations_never_panic(
        parallelism in ".*",
        cpu in ".*",
        memory in ".*",
    ) {
        let trigger = TriggerBuilder::new("t")
            .broker("foo")
            .annotation(PARALLELISM_ANNOTATION, parallelism)
            .annotation(CPU_REQUEST_ANNOTATION, cpu)
            .annotation(MEMORY_LIMIT_ANNOTATION, memory)
            .build();

        if let Err(err) = validate(&trigger, &ValidationContext::create()) {
            for kind in err.kinds() {
                prop_assert!(matches!(kind, FieldErrorKind::Parse | FieldErrorKind::OutOfBounds));
            }
        }
    }

    /// Property: Well-formed quantities always parse and keep their text.
    #[test]
    fn valid_quantities_parse(raw in valid_quantity()) {
        let quantity = Quantity::parse(&raw).unwrap();
        prop_assert_eq!(quantity.as_str(), raw.as_str());
        prop_assert!(quantity.as_f64() > 0.0);
    }

    /// Property: Changing a mutable field never trips immutability.
    #[test]
    fn subscriber_changes_accepted(uri in "https?://[a-z]{1,12}\\.example\\.com") {
        let original = TriggerBuilder::new("t").broker("foo").filter("type", "ping").build();
        let mut updated = original.clone();
        updated.spec.subscriber.uri = Some(uri);
        prop_assert!(validate(&updated, &ValidationContext::update(&original)).is_ok());
    }

    /// Property: Changing an immutable field is rejected with both values in the diff.
    #[test]
    fn topic_changes_rejected(topic in "[a-z_]{1,20}") {
        prop_assume!(topic != "logs_topic");
        let original = source(full_source_spec());
        let mut spec = full_source_spec();
        spec.topic = topic.clone();
        let updated = source(spec);

        let err = validate(&updated, &ValidationContext::update(&original)).unwrap_err();
        prop_assert!(err.has(FieldErrorKind::ImmutableField, "spec.topic"));
        let details = &err.flatten()[0].details;
        prop_assert!(details.contains("\"logs_topic\""));
        let quoted_topic = format!("\"{}\"", topic);
        prop_assert!(details.contains(&quoted_topic));
    }

    /// Property: Validation outcome does not depend on annotation insertion order.
    #[test]
    fn annotation_order_irrelevant(a in -2..=1002i64, b in "[0-9]{0,3}[mkMGi]{0,2}") {
        let first = TriggerBuilder::new("t")
            .broker("foo")
            .annotation(PARALLELISM_ANNOTATION, a.to_string())
            .annotation(CPU_REQUEST_ANNOTATION, b.clone())
            .build();
        let second = TriggerBuilder::new("t")
            .broker("foo")
            .annotation(CPU_REQUEST_ANNOTATION, b)
            .annotation(PARALLELISM_ANNOTATION, a.to_string())
            .build();
        prop_assert_eq!(
            validate(&first, &ValidationContext::create()),
            validate(&second, &ValidationContext::create())
        );
    }
}

#[test]
fn create_without_annotations_accepted() {
    let trigger = TriggerBuilder::new("t").broker("foo").build();
    assert!(validate(&trigger, &ValidationContext::create()).is_ok());
}

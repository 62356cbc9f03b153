//! Trigger validation policy.
//!
//! Only triggers on a broker of the RabbitMQ class are validated. A trigger
//! whose broker does not exist yet, or belongs to another implementation, is
//! accepted untouched.
//!
//! Validates:
//! - `spec.broker` and `spec.filter` do not change on update
//! - Parallelism annotation is an integer in [1, 1000] (default 1)
//! - Resource annotations parse as quantities

use std::collections::BTreeMap;
use std::sync::LazyLock;

use super::annotations::{PARALLELISM_RULE, RESOURCE_ANNOTATIONS};
use super::immutability::FieldSelector;
use super::{KindPolicy, Validated, ValidationContext, ValidationResult, validate};
use crate::config::AdmissionConfig;
use crate::crd::{BROKER_CLASS_ANNOTATION, Trigger, TriggerSpec};

static TRIGGER_POLICY: LazyLock<KindPolicy<TriggerSpec>> = LazyLock::new(|| KindPolicy {
    kind: "Trigger",
    immutable_fields: vec![
        FieldSelector::new("spec.broker", |spec: &TriggerSpec| {
            serde_json::to_value(&spec.broker)
        }),
        FieldSelector::new("spec.filter", |spec: &TriggerSpec| {
            serde_json::to_value(&spec.filter)
        }),
    ],
    int_annotations: vec![PARALLELISM_RULE],
    quantity_annotations: RESOURCE_ANNOTATIONS.to_vec(),
});

impl Validated for Trigger {
    type Spec = TriggerSpec;

    fn spec(&self) -> &TriggerSpec {
        &self.spec
    }

    fn policy() -> &'static KindPolicy<TriggerSpec> {
        LazyLock::force(&TRIGGER_POLICY)
    }
}

/// The broker a trigger points at, as found by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerRef {
    pub name: String,
    /// Value of the broker class annotation, if any
    pub class: Option<String>,
}

impl BrokerRef {
    pub fn new(name: impl Into<String>, class: Option<&str>) -> Self {
        Self {
            name: name.into(),
            class: class.map(str::to_string),
        }
    }

    /// Build from a broker's metadata annotations.
    pub fn from_annotations(name: impl Into<String>, annotations: &BTreeMap<String, String>) -> Self {
        Self::new(
            name,
            annotations.get(BROKER_CLASS_ANNOTATION).map(String::as_str),
        )
    }

    fn is_class(&self, class: &str) -> bool {
        self.class.as_deref() == Some(class)
    }
}

/// Validate a trigger served by the configured broker class.
///
/// `broker` is `None` when the referenced broker could not be found.
pub fn validate_trigger(
    trigger: &Trigger,
    ctx: &ValidationContext<'_, Trigger>,
    broker: Option<&BrokerRef>,
    config: &AdmissionConfig,
) -> ValidationResult {
    match broker {
        Some(broker) if broker.is_class(&config.broker_class) => validate(trigger, ctx),
        _ => Ok(()),
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::get_unwrap
)]
mod tests {
    use super::*;
    use crate::crd::{RABBITMQ_BROKER_CLASS, TriggerFilter};
    use crate::webhooks::policies::FieldErrorKind;
    use crate::webhooks::policies::annotations::{
        CPU_REQUEST_ANNOTATION, PARALLELISM_ANNOTATION, annotation_path,
    };
    use crate::webhooks::policies::immutability::IMMUTABLE_FIELDS_MESSAGE;

    fn create_trigger(broker: &str) -> Trigger {
        Trigger::new(
            "test",
            TriggerSpec {
                broker: broker.to_string(),
                ..Default::default()
            },
        )
    }

    fn with_filter(mut trigger: Trigger, key: &str, value: &str) -> Trigger {
        trigger
            .spec
            .filter
            .get_or_insert_with(TriggerFilter::default)
            .attributes
            .insert(key.to_string(), value.to_string());
        trigger
    }

    fn with_annotation(mut trigger: Trigger, key: &str, value: &str) -> Trigger {
        trigger
            .metadata
            .annotations
            .get_or_insert_with(BTreeMap::new)
            .insert(key.to_string(), value.to_string());
        trigger
    }

    fn rabbit_broker() -> BrokerRef {
        BrokerRef::new("foo", Some(RABBITMQ_BROKER_CLASS))
    }

    #[test]
    fn test_missing_broker_is_ignored() {
        let trigger = with_annotation(create_trigger("foo"), PARALLELISM_ANNOTATION, "0");
        let ctx = ValidationContext::create();
        assert!(validate_trigger(&trigger, &ctx, None, &AdmissionConfig::default()).is_ok());
    }

    #[test]
    fn test_other_broker_class_is_ignored() {
        let trigger = with_annotation(create_trigger("foo"), PARALLELISM_ANNOTATION, "0");
        let broker = BrokerRef::new("foo", Some("some-other-broker"));
        let ctx = ValidationContext::create();
        assert!(
            validate_trigger(&trigger, &ctx, Some(&broker), &AdmissionConfig::default()).is_ok()
        );
    }

    #[test]
    fn test_unannotated_broker_is_ignored() {
        let trigger = with_annotation(create_trigger("foo"), PARALLELISM_ANNOTATION, "0");
        let broker = BrokerRef::from_annotations("foo", &BTreeMap::new());
        let ctx = ValidationContext::create();
        assert!(
            validate_trigger(&trigger, &ctx, Some(&broker), &AdmissionConfig::default()).is_ok()
        );
    }

    #[test]
    fn test_filters_are_immutable() {
        let original = with_filter(create_trigger("foo"), "x", "y");
        let updated = create_trigger("foo");
        let ctx = ValidationContext::update(&original);

        let err = validate_trigger(
            &updated,
            &ctx,
            Some(&rabbit_broker()),
            &AdmissionConfig::default(),
        )
        .unwrap_err();

        let flat = err.flatten();
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].kind, FieldErrorKind::ImmutableField);
        assert_eq!(flat[0].message, IMMUTABLE_FIELDS_MESSAGE);
        assert_eq!(flat[0].paths, vec!["spec.filter"]);
        assert_eq!(
            flat[0].details,
            "spec.filter:\n\t-: {\"attributes\":{\"x\":\"y\"}}\n\t+: null\n"
        );
    }

    #[test]
    fn test_broker_is_immutable() {
        let original = create_trigger("foo");
        let updated = create_trigger("bar");
        let ctx = ValidationContext::update(&original);
        let err = validate(&updated, &ctx).unwrap_err();
        assert!(err.has(FieldErrorKind::ImmutableField, "spec.broker"));
    }

    #[test]
    fn test_subscriber_may_change() {
        let original = create_trigger("foo");
        let mut updated = create_trigger("foo");
        updated.spec.subscriber.uri = Some("http://example.com".to_string());
        let ctx = ValidationContext::update(&original);
        assert!(validate(&updated, &ctx).is_ok());
    }

    #[test]
    fn test_update_parallelism_allowed() {
        let original = create_trigger("foo");
        let updated = with_annotation(create_trigger("foo"), PARALLELISM_ANNOTATION, "100");
        let ctx = ValidationContext::update(&original);
        assert!(
            validate_trigger(
                &updated,
                &ctx,
                Some(&rabbit_broker()),
                &AdmissionConfig::default()
            )
            .is_ok()
        );
    }

    #[test]
    fn test_filter_change_and_bad_annotations_reported_together() {
        let original = with_filter(create_trigger("foo"), "x", "y");
        let updated = with_annotation(
            with_annotation(
                with_filter(create_trigger("foo"), "x", "z"),
                PARALLELISM_ANNOTATION,
                "1001",
            ),
            CPU_REQUEST_ANNOTATION,
            "invalid",
        );
        let ctx = ValidationContext::update(&original);
        let err = validate(&updated, &ctx).unwrap_err();
        assert_eq!(
            err.paths(),
            vec![
                annotation_path(CPU_REQUEST_ANNOTATION),
                annotation_path(PARALLELISM_ANNOTATION),
                "spec.filter".to_string(),
            ]
        );
        assert_eq!(
            err.kinds(),
            vec![
                FieldErrorKind::Parse,
                FieldErrorKind::OutOfBounds,
                FieldErrorKind::ImmutableField,
            ]
        );
    }

    #[test]
    fn test_configured_broker_class() {
        let trigger = with_annotation(create_trigger("foo"), PARALLELISM_ANNOTATION, "0");
        let broker = BrokerRef::new("foo", Some("CustomRabbit"));
        let config = AdmissionConfig {
            broker_class: "CustomRabbit".to_string(),
        };
        let ctx = ValidationContext::create();
        assert!(validate_trigger(&trigger, &ctx, Some(&broker), &config).is_err());
    }
}

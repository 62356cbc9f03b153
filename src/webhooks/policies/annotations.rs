//! Typed configuration carried in string annotations.
//!
//! Annotation values are arbitrary strings until parsed here. Absence is not an
//! error: callers receive `None` and decide whether to fall back to a default.
//! Parse failures and out-of-range values are distinct error kinds.

use std::collections::BTreeMap;

use super::field_error::{FieldError, FieldErrorKind, FieldErrors};
use super::quantity::Quantity;

/// Number of messages a dispatcher processes concurrently
pub const PARALLELISM_ANNOTATION: &str = "rabbitmq.eventing.knative.dev/parallelism";

/// CPU request for the dispatcher or adapter pod
pub const CPU_REQUEST_ANNOTATION: &str = "rabbitmq.eventing.knative.dev/cpu-request";

/// CPU limit for the dispatcher or adapter pod
pub const CPU_LIMIT_ANNOTATION: &str = "rabbitmq.eventing.knative.dev/cpu-limit";

/// Memory request for the dispatcher or adapter pod
pub const MEMORY_REQUEST_ANNOTATION: &str = "rabbitmq.eventing.knative.dev/memory-request";

/// Memory limit for the dispatcher or adapter pod
pub const MEMORY_LIMIT_ANNOTATION: &str = "rabbitmq.eventing.knative.dev/memory-limit";

/// All resource annotations, in the order they are checked.
pub const RESOURCE_ANNOTATIONS: [&str; 4] = [
    CPU_REQUEST_ANNOTATION,
    CPU_LIMIT_ANNOTATION,
    MEMORY_REQUEST_ANNOTATION,
    MEMORY_LIMIT_ANNOTATION,
];

/// Field path of an annotation, e.g. `metadata.annotations.<key>`.
pub fn annotation_path(key: &str) -> String {
    format!("metadata.annotations.{}", key)
}

/// Parse a base-10 integer annotation.
///
/// Returns `Ok(None)` when the key is not set.
pub fn parse_int(
    annotations: &BTreeMap<String, String>,
    key: &str,
) -> Result<Option<i64>, FieldError> {
    let Some(raw) = annotations.get(key) else {
        return Ok(None);
    };
    raw.parse::<i64>().map(Some).map_err(|e| {
        FieldError::new(
            FieldErrorKind::Parse,
            format!("Failed to parse valid int from {}", key),
            [annotation_path(key)],
        )
        .with_details(format!("parsing {:?}: {}", raw, e))
    })
}

/// Check `min <= value <= max`.
pub fn check_bounds(value: i64, min: i64, max: i64, path: &str) -> Result<(), FieldError> {
    if value < min || value > max {
        return Err(FieldError::new(
            FieldErrorKind::OutOfBounds,
            format!("expected {} <= {} <= {}", min, value, max),
            [path],
        ));
    }
    Ok(())
}

/// Parse a resource quantity annotation.
///
/// Returns `Ok(None)` when the key is not set.
pub fn parse_quantity(
    annotations: &BTreeMap<String, String>,
    key: &str,
) -> Result<Option<Quantity>, FieldError> {
    let Some(raw) = annotations.get(key) else {
        return Ok(None);
    };
    Quantity::parse(raw).map(Some).map_err(|e| {
        FieldError::new(
            FieldErrorKind::Parse,
            format!("Failed to parse quantity from {}", key),
            [annotation_path(key)],
        )
        .with_details(e.to_string())
    })
}

/// Bounded integer annotation with a default used when the key is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntAnnotationRule {
    pub key: &'static str,
    pub min: i64,
    pub max: i64,
    pub default: i64,
}

impl IntAnnotationRule {
    /// Effective value: parsed and bounds-checked, or the default when unset.
    pub fn resolve(&self, annotations: &BTreeMap<String, String>) -> Result<i64, FieldError> {
        let value = parse_int(annotations, self.key)?.unwrap_or(self.default);
        check_bounds(value, self.min, self.max, &annotation_path(self.key))?;
        Ok(value)
    }
}

/// Parallelism shared by triggers and sources.
pub const PARALLELISM_RULE: IntAnnotationRule = IntAnnotationRule {
    key: PARALLELISM_ANNOTATION,
    min: 1,
    max: 1000,
    default: 1,
};

/// Run every integer and quantity rule, collecting all failures.
pub fn check_annotations(
    annotations: &BTreeMap<String, String>,
    int_rules: &[IntAnnotationRule],
    quantity_keys: &[&str],
    errors: &mut FieldErrors,
) {
    for rule in int_rules {
        errors.record(rule.resolve(annotations));
    }
    for key in quantity_keys {
        errors.record(parse_quantity(annotations, key));
    }
}

//! Validation policies for RabbitMQ eventing admission.
//!
//! Policies are organized into tiers:
//! - Tier 1 (Always): annotation parsing and bounds, kind-specific range checks
//! - Tier 2 (Update): immutability and stricter update-time rules, only when
//!   the admitted original is available
//!
//! Every applicable check runs; all failures are merged into one [`FieldError`].

pub mod annotations;
pub mod field_error;
pub mod immutability;
pub mod quantity;
pub mod rabbitmq_source;
pub mod trigger;

use kube::ResourceExt;

use annotations::{IntAnnotationRule, check_annotations};
use immutability::{FieldSelector, check_immutable};

pub use field_error::{FieldError, FieldErrorKind, FieldErrors};

/// `Ok(())` accepts the request, `Err` lists every invalid path.
pub type ValidationResult = Result<(), FieldError>;

/// Admission operation being validated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
}

/// Context for validation
#[derive(Debug)]
pub struct ValidationContext<'a, K> {
    /// The operation the request claims to be
    pub operation: Operation,
    /// The previously admitted object (for UPDATE operations)
    pub original: Option<&'a K>,
}

impl<K> Clone for ValidationContext<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for ValidationContext<'_, K> {}

impl<'a, K> ValidationContext<'a, K> {
    pub fn new(operation: Operation, original: Option<&'a K>) -> Self {
        Self {
            operation,
            original,
        }
    }

    pub fn create() -> Self {
        Self::new(Operation::Create, None)
    }

    pub fn update(original: &'a K) -> Self {
        Self::new(Operation::Update, Some(original))
    }

    /// Effective mode of this request.
    ///
    /// An update without an original is validated as a create: nothing is
    /// rejected for missing prior state.
    pub fn mode(&self) -> ValidationMode<'a, K> {
        match (self.operation, self.original) {
            (Operation::Update, Some(original)) => ValidationMode::Update { original },
            _ => ValidationMode::Create,
        }
    }

    /// Check if this is an UPDATE operation with an original to compare against
    pub fn is_update(&self) -> bool {
        matches!(self.mode(), ValidationMode::Update { .. })
    }
}

/// Resolved validation mode
#[derive(Debug)]
pub enum ValidationMode<'a, K> {
    Create,
    Update { original: &'a K },
}

/// Declarative rules for one resource kind.
#[derive(Debug)]
pub struct KindPolicy<S> {
    /// Kind name, used in log output
    pub kind: &'static str,
    /// Spec fields that may not change after creation
    pub immutable_fields: Vec<FieldSelector<S>>,
    /// Bounded integer annotations
    pub int_annotations: Vec<IntAnnotationRule>,
    /// Annotations that must parse as resource quantities
    pub quantity_annotations: Vec<&'static str>,
}

/// A resource kind validated by [`validate`].
pub trait Validated: kube::Resource + Sized {
    type Spec: 'static;

    fn spec(&self) -> &Self::Spec;

    fn policy() -> &'static KindPolicy<Self::Spec>;

    /// Kind-specific rules that do not fit the declarative tables.
    fn validate_kind(&self, _mode: &ValidationMode<'_, Self>, _errors: &mut FieldErrors) {}
}

/// Run all validation policies for `resource`
pub fn validate<K: Validated>(resource: &K, ctx: &ValidationContext<'_, K>) -> ValidationResult {
    let mode = ctx.mode();
    let policy = K::policy();
    let mut errors = FieldErrors::new();

    // Tier 2: immutability against the admitted original
    if let ValidationMode::Update { original } = mode {
        errors.record(check_immutable(
            Some(original.spec()),
            resource.spec(),
            &policy.immutable_fields,
        ));
    }

    // Tier 1: annotations, with defaults substituted for absent keys
    check_annotations(
        resource.annotations(),
        &policy.int_annotations,
        &policy.quantity_annotations,
        &mut errors,
    );

    resource.validate_kind(&mode, &mut errors);

    errors.into_result()
}

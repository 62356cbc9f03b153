//! Admission validation for RabbitMQ eventing resources.
//!
//! This module provides validation policies with two tiers:
//! - Tier 1 (Always): annotation and range checks
//! - Tier 2 (Update): immutability and update-time rules
//!
//! and an adapter between kube-rs admission reviews and those policies.

pub mod admission;
pub mod policies;

pub use admission::{context_from_request, review_source, review_trigger};
pub use policies::trigger::{BrokerRef, validate_trigger};
pub use policies::{
    FieldError, FieldErrorKind, Operation, ValidationContext, ValidationResult, validate,
};

// Re-export kube-rs admission types for callers serving the webhook
pub use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview};

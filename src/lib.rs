//! rabbitmq-admission library crate
//!
//! Admission-time validation for RabbitMQ eventing resources: triggers on the
//! RabbitMQ broker class and RabbitMQ sources. Given a proposed object and, on
//! update, the admitted original, the policies either accept the change or
//! return one [`FieldError`] naming every offending field.
//!
//! Validation is synchronous and performs no I/O. Serving the webhook and
//! looking up brokers belong to the caller.

pub mod config;
pub mod crd;
pub mod error;
pub mod webhooks;

pub use config::AdmissionConfig;
pub use error::{Error, Result};
pub use webhooks::{
    BrokerRef, FieldError, FieldErrorKind, Operation, ValidationContext, ValidationResult,
    validate, validate_trigger,
};

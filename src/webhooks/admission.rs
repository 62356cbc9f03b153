//! Admission request adapter.
//!
//! Translates kube-rs admission requests into validation contexts and
//! validation results back into admission responses. Serving the requests over
//! HTTPS and looking up brokers is left to the caller, so everything here is
//! synchronous and free of I/O.

use kube::core::admission::{AdmissionRequest, AdmissionResponse, Operation as AdmissionOperation};
use tracing::{debug, error, info, warn};

use crate::config::AdmissionConfig;
use crate::crd::{RabbitmqSource, Trigger};
use crate::error::{Error, Result};
use crate::webhooks::policies::trigger::{BrokerRef, validate_trigger};
use crate::webhooks::policies::{
    Operation, Validated, ValidationContext, ValidationResult, validate,
};

/// Build the validation context of a request.
///
/// Only UPDATE requests carrying an old object compare against it; every
/// other operation is validated like a create.
pub fn context_from_request<K: kube::Resource>(
    request: &AdmissionRequest<K>,
) -> ValidationContext<'_, K> {
    match request.operation {
        AdmissionOperation::Update => {
            ValidationContext::new(Operation::Update, request.old_object.as_ref())
        }
        _ => ValidationContext::create(),
    }
}

/// Review a Trigger admission request.
///
/// `broker` is the broker named by the trigger, or `None` if it does not exist.
pub fn review_trigger(
    request: &AdmissionRequest<Trigger>,
    broker: Option<&BrokerRef>,
    config: &AdmissionConfig,
) -> AdmissionResponse {
    admit(request, |trigger, ctx| {
        validate_trigger(trigger, ctx, broker, config)
    })
}

/// Review a RabbitmqSource admission request.
pub fn review_source(request: &AdmissionRequest<RabbitmqSource>) -> AdmissionResponse {
    admit(request, validate)
}

fn required_object<K: kube::Resource>(request: &AdmissionRequest<K>) -> Result<&K> {
    request
        .object
        .as_ref()
        .ok_or_else(|| Error::InvalidRequest("Missing object in request".to_string()))
}

fn admit<K, F>(request: &AdmissionRequest<K>, check: F) -> AdmissionResponse
where
    K: Validated,
    F: FnOnce(&K, &ValidationContext<'_, K>) -> ValidationResult,
{
    let uid = &request.uid;
    let kind = K::policy().kind;
    debug!(
        uid = %uid,
        kind,
        operation = ?request.operation,
        namespace = ?request.namespace,
        name = %request.name,
        "Processing admission request"
    );

    // DELETE and CONNECT carry nothing to validate
    if matches!(
        request.operation,
        AdmissionOperation::Delete | AdmissionOperation::Connect
    ) {
        info!(uid = %uid, kind, operation = ?request.operation, "Admission request allowed");
        return AdmissionResponse::from(request);
    }

    let resource = match required_object(request) {
        Ok(resource) => resource,
        Err(e) => {
            error!(uid = %uid, kind, error = %e, "Rejecting malformed admission request");
            return AdmissionResponse::from(request).deny(e);
        }
    };

    let ctx = context_from_request(request);
    match check(resource, &ctx) {
        Ok(()) => {
            info!(uid = %uid, kind, update = ctx.is_update(), "Admission request allowed");
            AdmissionResponse::from(request)
        }
        Err(err) => {
            warn!(
                uid = %uid,
                kind,
                paths = ?err.paths(),
                "Admission request denied"
            );
            AdmissionResponse::from(request).deny(err)
        }
    }
}

//! Trigger Custom Resource Definition.
//!
//! Triggers are owned by the core eventing API. Only the fields the RabbitMQ
//! broker reads are modelled here.

use std::collections::BTreeMap;

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::duck::Destination;

/// Annotation on a Broker naming the implementation that serves it
pub const BROKER_CLASS_ANNOTATION: &str = "eventing.knative.dev/broker.class";

/// Broker class served by the RabbitMQ broker implementation
pub const RABBITMQ_BROKER_CLASS: &str = "RabbitMQBroker";

/// Trigger subscribes a destination to events on a broker.
///
/// Example:
/// ```yaml
/// apiVersion: eventing.knative.dev/v1
/// kind: Trigger
/// metadata:
///   name: ping-trigger
///   annotations:
///     rabbitmq.eventing.knative.dev/parallelism: "10"
/// spec:
///   broker: default
///   filter:
///     attributes:
///       type: dev.knative.sources.ping
///   subscriber:
///     ref:
///       apiVersion: v1
///       kind: Service
///       name: event-display
/// ```
#[derive(CustomResource, Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "eventing.knative.dev",
    version = "v1",
    kind = "Trigger",
    plural = "triggers",
    namespaced,
    printcolumn = r#"{"name":"Broker", "type":"string", "jsonPath":".spec.broker"}"#,
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct TriggerSpec {
    /// Name of the broker in the trigger's namespace.
    #[serde(default)]
    pub broker: String,

    /// Events must match every attribute to be delivered. No filter passes all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<TriggerFilter>,

    /// Destination receiving the filtered events.
    #[serde(default)]
    pub subscriber: Destination,
}

/// Exact-match filter on CloudEvent attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TriggerFilter {
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

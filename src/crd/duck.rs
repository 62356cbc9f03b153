//! Duck-typed addressing shared by triggers and sources.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Reference to an addressable object in the cluster.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct KReference {
    pub api_version: String,
    pub kind: String,
    /// Defaults to the namespace of the referring object when empty.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    pub name: String,
}

/// Where events are delivered: an object reference, a URI, or both (the URI
/// is then resolved relative to the reference).
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<KReference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl Destination {
    pub fn to_ref(reference: KReference) -> Self {
        Self {
            reference: Some(reference),
            uri: None,
        }
    }
}

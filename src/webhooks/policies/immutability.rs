//! Immutability validation policy.
//!
//! Tier 2 (Update): Only enforced when an admitted original is available
//!
//! Each kind declares the spec fields that may not change after creation as a
//! list of [`FieldSelector`]s. Selected values are compared structurally and
//! every differing field is reported with a diff of only the changed subtree.

use std::collections::BTreeSet;
use std::fmt::Write;

use serde_json::Value;

use super::field_error::{FieldError, FieldErrorKind, FieldErrors};

/// Message shared by every immutable-field violation.
pub const IMMUTABLE_FIELDS_MESSAGE: &str = "Immutable fields changed (-old +new)";

/// Extracts one named field of a spec as JSON for comparison.
pub struct FieldSelector<S> {
    pub path: &'static str,
    extract: fn(&S) -> serde_json::Result<Value>,
}

impl<S> FieldSelector<S> {
    pub fn new(path: &'static str, extract: fn(&S) -> serde_json::Result<Value>) -> Self {
        Self { path, extract }
    }

    pub fn extract(&self, spec: &S) -> serde_json::Result<Value> {
        (self.extract)(spec)
    }
}

impl<S> std::fmt::Debug for FieldSelector<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldSelector")
            .field("path", &self.path)
            .finish()
    }
}

/// Compare the selected fields of `original` and `updated`.
///
/// A missing original means there is nothing to compare against and always
/// passes.
pub fn check_immutable<S>(
    original: Option<&S>,
    updated: &S,
    selectors: &[FieldSelector<S>],
) -> Result<(), FieldError> {
    let Some(original) = original else {
        return Ok(());
    };

    let mut errors = FieldErrors::new();
    for selector in selectors {
        let values = selector
            .extract(original)
            .and_then(|old| selector.extract(updated).map(|new| (old, new)));
        match values {
            Ok((old, new)) if old == new => {}
            Ok((old, new)) => errors.push(
                FieldError::new(
                    FieldErrorKind::ImmutableField,
                    IMMUTABLE_FIELDS_MESSAGE,
                    [selector.path],
                )
                .with_details(diff(selector.path, &old, &new)),
            ),
            Err(e) => errors.push(
                FieldError::new(
                    FieldErrorKind::PolicyViolation,
                    format!("Failed to diff {}", selector.path),
                    [selector.path],
                )
                .with_details(e.to_string()),
            ),
        }
    }
    errors.into_result()
}

/// Render the differing leaves between `old` and `new`.
///
/// Objects present on both sides are descended into; anything else that
/// differs is printed whole. Each entry reads
/// `<path>:\n\t-: <old>\n\t+: <new>\n`, with `<none>` for a missing key.
pub fn diff(path: &str, old: &Value, new: &Value) -> String {
    let mut out = String::new();
    diff_into(&mut out, path, Some(old), Some(new));
    out
}

fn diff_into(out: &mut String, path: &str, old: Option<&Value>, new: Option<&Value>) {
    match (old, new) {
        (Some(Value::Object(old)), Some(Value::Object(new))) => {
            let keys: BTreeSet<&String> = old.keys().chain(new.keys()).collect();
            for key in keys {
                let (a, b) = (old.get(key), new.get(key));
                if a != b {
                    diff_into(out, &format!("{}.{}", path, key), a, b);
                }
            }
        }
        _ => {
            // Writing to a String cannot fail.
            let _ = write!(
                out,
                "{}:\n\t-: {}\n\t+: {}\n",
                path,
                render(old),
                render(new)
            );
        }
    }
}

fn render(value: Option<&Value>) -> String {
    value.map_or_else(|| "<none>".to_string(), Value::to_string)
}

//! Field-addressed validation errors.
//!
//! A [`FieldError`] is the single report returned by every validator. It holds
//! one or more violations, each pointing at one or more dotted field paths.
//! Reports are compared and rendered in a normalized form so that the order in
//! which checks ran never changes the outcome.

use std::fmt;

/// Category of a single violation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldErrorKind {
    /// Input does not match the grammar of its target type
    Parse,
    /// Syntactically valid value outside of the allowed closed interval
    OutOfBounds,
    /// A field declared immutable differs from the admitted version
    ImmutableField,
    /// Kind-specific rule not covered by the other kinds
    PolicyViolation,
}

impl fmt::Display for FieldErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldErrorKind::Parse => write!(f, "ParseError"),
            FieldErrorKind::OutOfBounds => write!(f, "OutOfBoundsError"),
            FieldErrorKind::ImmutableField => write!(f, "ImmutableFieldError"),
            FieldErrorKind::PolicyViolation => write!(f, "PolicyViolationError"),
        }
    }
}

/// One violation inside a [`FieldError`].
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Violation {
    pub kind: FieldErrorKind,
    pub message: String,
    pub paths: Vec<String>,
    pub details: String,
}

/// A combined, field-addressed validation report.
///
/// Never empty: constructors always add a violation, and [`FieldError::combine`]
/// returns `None` instead of an empty report.
#[derive(Clone, Debug)]
pub struct FieldError {
    violations: Vec<Violation>,
}

impl FieldError {
    /// Create a report with a single violation at the given paths.
    pub fn new<I, P>(kind: FieldErrorKind, message: impl Into<String>, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            violations: vec![Violation {
                kind,
                message: message.into(),
                paths: paths.into_iter().map(Into::into).collect(),
                details: String::new(),
            }],
        }
    }

    /// Attach details to every violation in the report.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        let details = details.into();
        for violation in &mut self.violations {
            violation.details.clone_from(&details);
        }
        self
    }

    /// Prefix every path in the report with `field`.
    pub fn via_field(mut self, field: &str) -> Self {
        for violation in &mut self.violations {
            for path in &mut violation.paths {
                *path = if path.is_empty() {
                    field.to_string()
                } else {
                    format!("{}.{}", field, path)
                };
            }
        }
        self
    }

    /// Merge another report into this one.
    pub fn also(mut self, other: FieldError) -> Self {
        self.violations.extend(other.violations);
        self
    }

    /// Merge any number of optional reports. Returns `None` when nothing was set.
    pub fn combine<I>(errors: I) -> Option<FieldError>
    where
        I: IntoIterator<Item = Option<FieldError>>,
    {
        errors
            .into_iter()
            .flatten()
            .reduce(|acc, err| acc.also(err))
    }

    /// Normalized violations.
    ///
    /// Violations sharing kind, message and details are folded into one with
    /// the union of their paths. Paths are sorted and deduplicated and the
    /// result is sorted, so two reports with the same content flatten equally.
    pub fn flatten(&self) -> Vec<Violation> {
        let mut merged: Vec<Violation> = Vec::with_capacity(self.violations.len());
        for violation in &self.violations {
            match merged.iter_mut().find(|m| {
                m.kind == violation.kind
                    && m.message == violation.message
                    && m.details == violation.details
            }) {
                Some(existing) => existing.paths.extend(violation.paths.iter().cloned()),
                None => merged.push(violation.clone()),
            }
        }
        for violation in &mut merged {
            violation.paths.sort();
            violation.paths.dedup();
        }
        merged.sort();
        merged
    }

    /// Sorted union of every path in the report.
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .violations
            .iter()
            .flat_map(|v| v.paths.iter().cloned())
            .collect();
        paths.sort();
        paths.dedup();
        paths
    }

    /// Kinds present in the report, sorted and deduplicated.
    pub fn kinds(&self) -> Vec<FieldErrorKind> {
        let mut kinds: Vec<FieldErrorKind> = self.violations.iter().map(|v| v.kind).collect();
        kinds.sort();
        kinds.dedup();
        kinds
    }

    /// Whether any violation of `kind` addresses `path`.
    pub fn has(&self, kind: FieldErrorKind, path: &str) -> bool {
        self.violations
            .iter()
            .any(|v| v.kind == kind && v.paths.iter().any(|p| p == path))
    }
}

impl PartialEq for FieldError {
    fn eq(&self, other: &Self) -> bool {
        self.flatten() == other.flatten()
    }
}

impl Eq for FieldError {}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.flatten().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {}", violation.message, violation.paths.join(", "))?;
            if !violation.details.is_empty() {
                write!(f, "\n{}", violation.details)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for FieldError {}

/// Collects errors from independent checks without short-circuiting.
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    /// Keep the error of a failed check and hand back the value of a passed one.
    pub fn record<T>(&mut self, result: Result<T, FieldError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.push(error);
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Finish accumulation: `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), FieldError> {
        match FieldError::combine(self.errors.into_iter().map(Some)) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl Extend<FieldError> for FieldErrors {
    fn extend<I: IntoIterator<Item = FieldError>>(&mut self, iter: I) {
        self.errors.extend(iter);
    }
}

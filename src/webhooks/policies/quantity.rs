//! Kubernetes resource quantity grammar.
//!
//! Accepts a signed decimal magnitude followed by an optional suffix:
//! binary SI (`Ki`..`Ei`), decimal SI (`n`..`E`) or a decimal exponent (`e3`).
//! Error texts match the ones the API server reports for the same input.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Grammar every quantity has to match before suffix interpretation.
pub const QUANTITY_PATTERN: &str = r"^([+-]?[0-9.]+)([eEinumkKMGTP]*[-+]?[0-9]*)$";

static QUANTITY_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(QUANTITY_PATTERN).ok());

/// Errors produced while parsing a quantity.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    #[error("quantities must match the regular expression '{pattern}'", pattern = QUANTITY_PATTERN)]
    Format,

    #[error("unable to parse quantity's suffix")]
    Suffix,
}

/// How the quantity expresses its scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityFormat {
    /// Powers of two, e.g. `Mi`
    BinarySI,
    /// Powers of ten with a letter suffix, e.g. `m` or `k`
    DecimalSI,
    /// Powers of ten with an exponent, e.g. `1e3`
    DecimalExponent,
}

/// A parsed resource quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    raw: String,
    value: f64,
    format: QuantityFormat,
}

impl Quantity {
    /// Parse a quantity string.
    ///
    /// # Example
    /// ```
    /// use rabbitmq_admission::webhooks::policies::quantity::Quantity;
    ///
    /// let memory = Quantity::parse("2Ki").unwrap();
    /// assert_eq!(memory.as_f64(), 2048.0);
    /// ```
    pub fn parse(input: &str) -> Result<Self, QuantityError> {
        let captures = QUANTITY_RE
            .as_ref()
            .and_then(|re| re.captures(input))
            .ok_or(QuantityError::Format)?;
        let number = captures.get(1).map_or("", |m| m.as_str());
        let suffix = captures.get(2).map_or("", |m| m.as_str());

        let digits = number.trim_start_matches(['+', '-']);
        if !digits.bytes().any(|b| b.is_ascii_digit()) || digits.matches('.').count() > 1 {
            return Err(QuantityError::Format);
        }
        let magnitude: f64 = number.parse().map_err(|_| QuantityError::Format)?;

        let (format, scale) = parse_suffix(suffix).ok_or(QuantityError::Suffix)?;

        Ok(Self {
            raw: input.to_string(),
            value: magnitude * scale,
            format,
        })
    }

    /// Value in base units (cores for CPU, bytes for memory).
    pub fn as_f64(&self) -> f64 {
        self.value
    }

    pub fn format(&self) -> QuantityFormat {
        self.format
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl std::str::FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Quantity> for k8s_openapi::apimachinery::pkg::api::resource::Quantity {
    fn from(quantity: Quantity) -> Self {
        k8s_openapi::apimachinery::pkg::api::resource::Quantity(quantity.raw)
    }
}

fn parse_suffix(suffix: &str) -> Option<(QuantityFormat, f64)> {
    let binary = |power: i32| Some((QuantityFormat::BinarySI, 2f64.powi(power)));
    let decimal = |power: i32| Some((QuantityFormat::DecimalSI, 10f64.powi(power)));

    match suffix {
        "" => decimal(0),
        "Ki" => binary(10),
        "Mi" => binary(20),
        "Gi" => binary(30),
        "Ti" => binary(40),
        "Pi" => binary(50),
        "Ei" => binary(60),
        "n" => decimal(-9),
        "u" => decimal(-6),
        "m" => decimal(-3),
        "k" => decimal(3),
        "M" => decimal(6),
        "G" => decimal(9),
        "T" => decimal(12),
        "P" => decimal(15),
        "E" => decimal(18),
        _ => parse_exponent(suffix),
    }
}

fn parse_exponent(suffix: &str) -> Option<(QuantityFormat, f64)> {
    let exponent = suffix.strip_prefix(['e', 'E'])?;
    let unsigned = exponent.trim_start_matches(['+', '-']);
    if unsigned.is_empty() || !unsigned.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let power: i32 = exponent.parse().ok()?;
    Some((QuantityFormat::DecimalExponent, 10f64.powi(power)))
}

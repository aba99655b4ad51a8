//! Admissibility rules: one threshold comparison over one descriptor.

use crate::error::{ConfigError, Result};
use descriptors::DescriptorMap;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// How a descriptor value is compared against a threshold.
///
/// `LessOrEqual`/`GreaterOrEqual` include the threshold, `Less`/`Greater`
/// exclude it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Comparator {
    #[serde(rename = "<=")]
    LessOrEqual,
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = "<")]
    Less,
    #[serde(rename = ">")]
    Greater,
}

impl Comparator {
    /// Apply the comparison. Callers are expected to have rejected
    /// non-finite values already.
    pub fn compare(self, value: f64, threshold: f64) -> bool {
        match self {
            Comparator::LessOrEqual => value <= threshold,
            Comparator::GreaterOrEqual => value >= threshold,
            Comparator::Less => value < threshold,
            Comparator::Greater => value > threshold,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Comparator::LessOrEqual => "<=",
            Comparator::GreaterOrEqual => ">=",
            Comparator::Less => "<",
            Comparator::Greater => ">",
        }
    }

    pub fn is_inclusive(self) -> bool {
        matches!(self, Comparator::LessOrEqual | Comparator::GreaterOrEqual)
    }

    /// True for `<=` and `<`, which bound a value from above.
    pub fn is_upper_bound(self) -> bool {
        matches!(self, Comparator::LessOrEqual | Comparator::Less)
    }
}

impl FromStr for Comparator {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "<=" | "≤" | "le" | "lte" => Ok(Comparator::LessOrEqual),
            ">=" | "≥" | "ge" | "gte" => Ok(Comparator::GreaterOrEqual),
            "<" | "lt" => Ok(Comparator::Less),
            ">" | "gt" => Ok(Comparator::Greater),
            _ => Err(ConfigError::UnknownComparator(s.to_string())),
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A single named predicate: `descriptor comparator threshold`.
///
/// Immutable once built. Evaluation never errors: a missing or non-finite
/// descriptor value simply fails the rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdmissibilityRule {
    descriptor: String,
    comparator: Comparator,
    threshold: f64,
}

impl AdmissibilityRule {
    pub fn new(descriptor: impl Into<String>, comparator: Comparator, threshold: f64) -> Result<Self> {
        let descriptor = descriptor.into();
        if descriptor.trim().is_empty() {
            return Err(ConfigError::EmptyDescriptorName);
        }
        if !threshold.is_finite() {
            return Err(ConfigError::NonFiniteThreshold { descriptor, threshold });
        }
        Ok(Self {
            descriptor,
            comparator,
            threshold,
        })
    }

    /// Build a rule from a textual comparator such as `"<="`.
    pub fn parse(descriptor: impl Into<String>, comparator: &str, threshold: f64) -> Result<Self> {
        Self::new(descriptor, comparator.parse()?, threshold)
    }

    pub fn at_most(descriptor: impl Into<String>, threshold: f64) -> Result<Self> {
        Self::new(descriptor, Comparator::LessOrEqual, threshold)
    }

    pub fn at_least(descriptor: impl Into<String>, threshold: f64) -> Result<Self> {
        Self::new(descriptor, Comparator::GreaterOrEqual, threshold)
    }

    pub fn below(descriptor: impl Into<String>, threshold: f64) -> Result<Self> {
        Self::new(descriptor, Comparator::Less, threshold)
    }

    pub fn above(descriptor: impl Into<String>, threshold: f64) -> Result<Self> {
        Self::new(descriptor, Comparator::Greater, threshold)
    }

    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    pub fn comparator(&self) -> Comparator {
        self.comparator
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Check the rule against a descriptor mapping.
    pub fn evaluate(&self, descriptors: &DescriptorMap) -> bool {
        match descriptors.get(&self.descriptor) {
            Some(value) if value.is_finite() => self.comparator.compare(value, self.threshold),
            _ => false,
        }
    }
}

impl fmt::Display for AdmissibilityRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.descriptor, self.comparator, self.threshold)
    }
}

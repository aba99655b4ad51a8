//! Core descriptor types.
//!
//! A [`DescriptorMap`] is the only thing the filtering engine ever sees of a
//! molecule: named floating point values derived from the structure by some
//! external toolkit.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Well-known descriptor names
// =============================================================================

/// Names of the descriptors produced by the usual physicochemical toolkits
/// and ADMET predictors.
///
/// Nothing in the engine depends on these; they exist so configuration,
/// presets and reports agree on spelling.
pub mod names {
    pub const MOLECULAR_WEIGHT: &str = "molecular_weight";
    pub const LOGP: &str = "logp";
    pub const H_BOND_DONORS: &str = "h_bond_donors";
    pub const H_BOND_ACCEPTORS: &str = "h_bond_acceptors";
    pub const SA_SCORE: &str = "sa_score";
    pub const SOLUBILITY: &str = "solubility";
    pub const TOXICITY: &str = "toxicity";
    pub const PK_PROFILE: &str = "pk_profile";

    /// Human readable column header for a descriptor name.
    ///
    /// Unknown names are returned unchanged.
    pub fn label(name: &str) -> &str {
        match name {
            MOLECULAR_WEIGHT => "Molecular Weight",
            LOGP => "LogP",
            H_BOND_DONORS => "H-bond Donors",
            H_BOND_ACCEPTORS => "H-bond Acceptors",
            SA_SCORE => "Synthetic Accessibility",
            SOLUBILITY => "Solubility",
            TOXICITY => "Toxicity",
            PK_PROFILE => "Pharmacokinetic Profile",
            other => other,
        }
    }
}

// =============================================================================
// DescriptorMap
// =============================================================================

/// Named numeric descriptors computed for one structure.
///
/// A descriptor the provider could not compute is simply absent. Values are
/// stored as reported, including `NaN` and infinities; deciding what a
/// non-finite value means is up to the consumer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DescriptorMap {
    values: HashMap<String, f64>,
}

impl DescriptorMap {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a descriptor, replacing any previous value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.insert(name, value);
        self
    }

    /// Look up a descriptor value. `None` means the descriptor is absent.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(name, value)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Copy every descriptor of `other` into this mapping.
    /// Values from `other` win on name clashes.
    pub fn extend_from(&mut self, other: &DescriptorMap) {
        for (name, value) in other.iter() {
            self.values.insert(name.to_string(), value);
        }
    }
}

impl FromIterator<(String, f64)> for DescriptorMap {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<(&'a str, f64)> for DescriptorMap {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
        }
    }
}

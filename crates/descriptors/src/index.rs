//! In-memory descriptor table.
//!
//! A [`DescriptorTable`] maps structure identifiers to their precomputed
//! descriptors. It is the simplest [`DescriptorProvider`](crate::DescriptorProvider):
//! any identifier not in the table is reported as unparseable.

use crate::error::Result;
use crate::parser;
use crate::types::DescriptorMap;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// Precomputed descriptors keyed by structure identifier.
#[derive(Debug, Clone, Default)]
pub struct DescriptorTable {
    rows: HashMap<String, DescriptorMap>,
}

impl DescriptorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load one table file (`.csv`, or `.tsv` for tab separated).
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let table = parser::parse_descriptor_table(path)?;
        info!("Loaded {} structures from {}", table.len(), path.display());
        Ok(table)
    }

    /// Load several table files in parallel, keeping their order.
    ///
    /// Fails with the first error encountered in input order.
    pub fn load_many(paths: &[PathBuf]) -> Result<Vec<Self>> {
        paths
            .par_iter()
            .map(|path| Self::load_from_file(path))
            .collect::<Vec<_>>()
            .into_iter()
            .collect()
    }

    /// Add or replace the descriptors of a structure.
    /// Returns the previous descriptors if the identifier was already present.
    pub fn insert(
        &mut self,
        id: impl Into<String>,
        descriptors: DescriptorMap,
    ) -> Option<DescriptorMap> {
        self.rows.insert(id.into(), descriptors)
    }

    pub fn get(&self, id: &str) -> Option<&DescriptorMap> {
        self.rows.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.rows.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All identifiers, sorted so callers get a stable order.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.rows.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl FromIterator<(String, DescriptorMap)> for DescriptorTable {
    fn from_iter<I: IntoIterator<Item = (String, DescriptorMap)>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

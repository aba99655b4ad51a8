//! The Descriptor Provider interface.
//!
//! Parsing structures and computing descriptors belongs to external
//! toolkits. The filtering engine only consumes their output through
//! [`DescriptorProvider`], so a precomputed table, a cache or a remote
//! predictor can be swapped in without touching any filtering logic.

use crate::index::DescriptorTable;
use crate::types::DescriptorMap;
use rayon::prelude::*;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// The provider could not make sense of a structure.
///
/// This is a normal outcome for bad input, not an error: the candidate
/// simply carries no descriptors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub candidate_id: String,
    pub reason: String,
}

impl ParseFailure {
    pub fn new(candidate_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            candidate_id: candidate_id.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not parse {}: {}", self.candidate_id, self.reason)
    }
}

/// Something that turns a structure identifier into descriptors.
///
/// `Send + Sync` so one provider can be shared across rayon workers and
/// tokio's blocking pool.
pub trait DescriptorProvider: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Compute every descriptor this provider knows for a structure.
    fn compute(&self, candidate_id: &str) -> Result<DescriptorMap, ParseFailure>;
}

impl DescriptorProvider for DescriptorTable {
    fn name(&self) -> &str {
        "descriptor-table"
    }

    fn compute(&self, candidate_id: &str) -> Result<DescriptorMap, ParseFailure> {
        self.get(candidate_id)
            .cloned()
            .ok_or_else(|| ParseFailure::new(candidate_id, "structure not present in descriptor table"))
    }
}

impl<P: DescriptorProvider + ?Sized> DescriptorProvider for Arc<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn compute(&self, candidate_id: &str) -> Result<DescriptorMap, ParseFailure> {
        (**self).compute(candidate_id)
    }
}

/// Combines a primary provider with any number of secondary ones.
///
/// The primary decides whether a structure parses at all. Each secondary
/// contributes additional descriptors; when a secondary cannot handle the
/// structure its descriptors are just left absent. Later providers win
/// when two report the same descriptor name.
pub struct MergedProvider {
    primary: Arc<dyn DescriptorProvider>,
    secondary: Vec<Arc<dyn DescriptorProvider>>,
}

impl MergedProvider {
    pub fn new(primary: Arc<dyn DescriptorProvider>) -> Self {
        Self {
            primary,
            secondary: Vec::new(),
        }
    }

    /// Add a secondary provider (builder pattern).
    pub fn with_secondary(mut self, provider: Arc<dyn DescriptorProvider>) -> Self {
        self.secondary.push(provider);
        self
    }
}

impl DescriptorProvider for MergedProvider {
    fn name(&self) -> &str {
        "merged"
    }

    fn compute(&self, candidate_id: &str) -> Result<DescriptorMap, ParseFailure> {
        let mut descriptors = self.primary.compute(candidate_id)?;
        for provider in &self.secondary {
            match provider.compute(candidate_id) {
                Ok(extra) => descriptors.extend_from(&extra),
                Err(failure) => debug!(
                    "{} has no descriptors for {}: {}",
                    provider.name(),
                    candidate_id,
                    failure.reason
                ),
            }
        }
        Ok(descriptors)
    }
}

/// Compute descriptors for many structures in parallel.
///
/// The output has one entry per input identifier, in input order.
pub fn compute_batch<P>(provider: &P, ids: &[String]) -> Vec<Result<DescriptorMap, ParseFailure>>
where
    P: DescriptorProvider + ?Sized,
{
    ids.par_iter().map(|id| provider.compute(id)).collect()
}

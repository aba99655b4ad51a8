//! Turning raw structure identifiers into candidates.

use crate::types::Candidate;
use descriptors::{DescriptorProvider, compute_batch};
use std::sync::Arc;
use tracing::{debug, info};

/// Resolves identifiers to [`Candidate`]s through a descriptor provider.
///
/// Parse failures become unparsed candidates; nothing is dropped and the
/// input order is kept, so downstream result sets can be compared against
/// the original list.
#[derive(Clone)]
pub struct CandidateResolver {
    provider: Arc<dyn DescriptorProvider>,
}

impl CandidateResolver {
    pub fn new(provider: Arc<dyn DescriptorProvider>) -> Self {
        Self { provider }
    }

    /// Name of the underlying provider, for logs.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Resolve every identifier in parallel.
    pub fn resolve(&self, ids: &[String]) -> Vec<Candidate> {
        let candidates: Vec<Candidate> = compute_batch(self.provider.as_ref(), ids)
            .into_iter()
            .zip(ids)
            .map(|(result, id)| match result {
                Ok(descriptors) => Candidate::parsed(id.clone(), descriptors),
                Err(failure) => {
                    debug!("{}", failure);
                    Candidate::unparsed(id.clone())
                }
            })
            .collect();

        let unparsed = candidates.iter().filter(|c| !c.is_parsed()).count();
        info!(
            "Resolved {} candidates via {} ({} unparsed)",
            candidates.len(),
            self.provider.name(),
            unparsed
        );
        candidates
    }

    /// Resolve a single identifier on the calling thread.
    pub fn resolve_one(&self, id: &str) -> Candidate {
        match self.provider.compute(id) {
            Ok(descriptors) => Candidate::parsed(id, descriptors),
            Err(failure) => {
                debug!("{}", failure);
                Candidate::unparsed(id)
            }
        }
    }
}

//! Core trait for the filtering pipeline.
//!
//! [`FilterStage`](crate::FilterStage) is the data-driven implementation used
//! for configured rules. Criteria that cannot be expressed as threshold
//! comparisons can implement [`Filter`] directly and still be composed into a
//! [`FilteringPipeline`](crate::FilteringPipeline).

use crate::record::EvaluationRecord;
use descriptors::DescriptorMap;

/// A named admissibility check over a candidate's descriptors.
///
/// ## Contract
/// - exactly one record per call, never an error
/// - deterministic: no hidden state, same inputs give the same record
/// - `Send + Sync` so the pipeline may evaluate candidates in parallel
pub trait Filter: Send + Sync {
    /// Stage name, used as the result set key
    fn name(&self) -> &str;

    /// Descriptors this filter reads, in evidence order
    fn descriptor_names(&self) -> &[String];

    /// Evaluate one candidate.
    fn evaluate(&self, candidate_id: &str, descriptors: &DescriptorMap) -> EvaluationRecord;
}

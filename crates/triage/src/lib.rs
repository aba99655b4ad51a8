//! Async triage runs for the compound filtering engine.
//!
//! The orchestrator wraps a descriptor provider and a filtering pipeline,
//! adding per-lookup timeouts and turning collaborator failures into
//! unparsed candidates.

pub mod orchestrator;

pub use orchestrator::{TriageOrchestrator, TriageReport};

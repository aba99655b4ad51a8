//! Multi-stage descriptor filtering for compound triage.
//!
//! This crate provides:
//! - [`AdmissibilityRule`]: one threshold comparison over one descriptor
//! - [`FilterStage`]: a named AND of rules, producing an [`EvaluationRecord`]
//! - [`FilteringPipeline`]: applies stages to candidates, producing a
//!   [`ResultSet`] of passing records per stage
//! - [`PipelineConfig`]: JSON stage configuration and the default presets
//!
//! ## Architecture
//! Descriptors are computed elsewhere (see the `descriptors` crate). The
//! engine only decides admissibility:
//! 1. Unparsed candidates are skipped, never reported as errors
//! 2. Each stage evaluates every rule against the candidate's original descriptors
//! 3. Passing records are collected per stage in input order
//!
//! Malformed configuration (unknown comparator, contradictory rules,
//! duplicate stage names) fails when stages are built, before any run.
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{FilteringPipeline, PipelineConfig};
//!
//! let pipeline = PipelineConfig::default().build_pipeline()?;
//! let output = pipeline.run(&candidates);
//!
//! for set in output.iter() {
//!     println!("{}: {} passed", set.stage(), set.len());
//! }
//! ```

pub mod config;
pub mod error;
pub mod filter_pipeline;
pub mod presets;
pub mod record;
pub mod rule;
pub mod stage;
pub mod traits;

// Re-export main types
pub use config::{PipelineConfig, RuleConfig, StageConfig};
pub use error::{ConfigError, Result};
pub use filter_pipeline::{
    FilteringPipeline, PipelineAudit, PipelineBuilder, PipelineMode, PipelineOutput, StageAudit,
};
pub use record::{EvaluationRecord, EvidenceValue, ResultSet};
pub use rule::{AdmissibilityRule, Comparator};
pub use stage::{FilterStage, StageBuilder};
pub use traits::Filter;

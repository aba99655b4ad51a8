//! The FilteringPipeline applies filter stages to a candidate list.
//!
//! By default every stage is an independent pass over the full candidate
//! list, each judged on its original descriptors. [`PipelineMode::Funnel`]
//! turns the stages into a chain where a candidate only reaches stage N if
//! it passed every earlier stage.

use crate::error::{ConfigError, Result};
use crate::record::{EvaluationRecord, ResultSet};
use crate::stage::FilterStage;
use crate::traits::Filter;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sources::Candidate;
use std::collections::HashSet;

/// How stages relate to each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineMode {
    /// Every stage sees every parsed candidate
    #[default]
    Independent,
    /// A stage only sees candidates that passed all previous stages
    Funnel,
}

/// Chains filter stages into a pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilteringPipeline::builder()
///     .add_stage(presets::rule_of_five().build()?)
///     .add_stage(presets::advanced().build()?)
///     .build()?;
///
/// let output = pipeline.run(&candidates);
/// for record in output.get("rule_of_five").unwrap() {
///     println!("{}", record.candidate_id());
/// }
/// ```
pub struct FilteringPipeline {
    filters: Vec<Box<dyn Filter>>,
    mode: PipelineMode,
    parallel: bool,
}

impl FilteringPipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn mode(&self) -> PipelineMode {
        self.mode
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    pub fn filters(&self) -> &[Box<dyn Filter>] {
        &self.filters
    }

    /// Apply every stage and keep the passing records.
    ///
    /// Unparsed candidates are skipped silently; rejected ones are simply
    /// missing from the result sets. Running twice on the same input gives
    /// identical output.
    pub fn run(&self, candidates: &[Candidate]) -> PipelineOutput {
        self.audit(candidates).passing()
    }

    /// Apply every stage and keep every record, passing or not.
    ///
    /// ## Algorithm
    /// 1. Mark parsed candidates as eligible; note unparsed identifiers
    /// 2. For each stage in order:
    ///    a. Evaluate every eligible candidate (in parallel if enabled)
    ///    b. In funnel mode, drop rejected candidates from eligibility
    ///    c. Log input and output counts
    pub fn audit(&self, candidates: &[Candidate]) -> PipelineAudit {
        let unparsed: Vec<String> = candidates
            .iter()
            .filter(|c| !c.is_parsed())
            .map(|c| c.id.clone())
            .collect();
        let mut eligible: Vec<bool> = candidates.iter().map(Candidate::is_parsed).collect();

        let mut stages = Vec::with_capacity(self.filters.len());
        for filter in &self.filters {
            let input_count = eligible.iter().filter(|e| **e).count();
            tracing::debug!(
                "Applying stage: {} (input count: {})",
                filter.name(),
                input_count
            );

            let evaluated = self.evaluate_stage(filter.as_ref(), candidates, &eligible);

            if self.mode == PipelineMode::Funnel {
                for (index, record) in &evaluated {
                    if !record.passed() {
                        eligible[*index] = false;
                    }
                }
            }

            let records: Vec<EvaluationRecord> = evaluated.into_iter().map(|(_, r)| r).collect();
            let passed = records.iter().filter(|r| r.passed()).count();
            tracing::debug!(
                "Stage applied: {} (output count: {})",
                filter.name(),
                passed
            );

            stages.push(StageAudit {
                stage: filter.name().to_string(),
                records,
            });
        }

        PipelineAudit {
            examined: candidates.len(),
            stages,
            unparsed,
        }
    }

    /// Evaluate one stage over the eligible candidates, keeping input order.
    fn evaluate_stage(
        &self,
        filter: &dyn Filter,
        candidates: &[Candidate],
        eligible: &[bool],
    ) -> Vec<(usize, EvaluationRecord)> {
        let evaluate = |(index, candidate): (usize, &Candidate)| {
            if !eligible[index] {
                return None;
            }
            let descriptors = candidate.descriptors.as_ref()?;
            let record = filter.evaluate(&candidate.id, descriptors);
            if !record.passed() {
                tracing::trace!(
                    "{} rejected {}: {}",
                    filter.name(),
                    candidate.id,
                    record.violations().join(", ")
                );
            }
            Some((index, record))
        };

        if self.parallel {
            // collect keeps the original order even after filter_map
            candidates.par_iter().enumerate().filter_map(evaluate).collect()
        } else {
            candidates.iter().enumerate().filter_map(evaluate).collect()
        }
    }
}

/// Builder for [`FilteringPipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    filters: Vec<Box<dyn Filter>>,
    mode: PipelineMode,
    parallel: bool,
}

impl PipelineBuilder {
    /// Add a configured stage (builder pattern).
    pub fn add_stage(self, stage: FilterStage) -> Self {
        self.add_filter(stage)
    }

    /// Add any filter implementation.
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn mode(mut self, mode: PipelineMode) -> Self {
        self.mode = mode;
        self
    }

    /// Evaluate candidates of a stage on the rayon pool.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Finish the pipeline. Stage names must be unique since they key the
    /// output.
    pub fn build(self) -> Result<FilteringPipeline> {
        let mut seen = HashSet::new();
        for filter in &self.filters {
            if !seen.insert(filter.name()) {
                return Err(ConfigError::DuplicateStage(filter.name().to_string()));
            }
        }
        Ok(FilteringPipeline {
            filters: self.filters,
            mode: self.mode,
            parallel: self.parallel,
        })
    }
}

/// Result sets of one run, keyed by stage name, in stage order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineOutput {
    stages: Vec<ResultSet>,
}

impl PipelineOutput {
    pub fn get(&self, stage: &str) -> Option<&ResultSet> {
        self.stages.iter().find(|s| s.stage() == stage)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResultSet> {
        self.stages.iter()
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(ResultSet::stage).collect()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

/// Every record of one stage, including rejections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageAudit {
    pub stage: String,
    pub records: Vec<EvaluationRecord>,
}

impl StageAudit {
    pub fn passed(&self) -> impl Iterator<Item = &EvaluationRecord> {
        self.records.iter().filter(|r| r.passed())
    }

    pub fn rejected(&self) -> impl Iterator<Item = &EvaluationRecord> {
        self.records.iter().filter(|r| !r.passed())
    }
}

/// Full account of a run: what passed, what was rejected and why, and
/// which identifiers never parsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineAudit {
    pub examined: usize,
    pub stages: Vec<StageAudit>,
    pub unparsed: Vec<String>,
}

impl PipelineAudit {
    pub fn stage(&self, name: &str) -> Option<&StageAudit> {
        self.stages.iter().find(|s| s.stage == name)
    }

    /// Reduce to the passing result sets.
    pub fn passing(&self) -> PipelineOutput {
        PipelineOutput {
            stages: self
                .stages
                .iter()
                .map(|s| ResultSet::new(s.stage.clone(), s.passed().cloned().collect()))
                .collect(),
        }
    }
}

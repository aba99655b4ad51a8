//! Stage configuration.
//!
//! Thresholds are configuration, not code. A pipeline is described in JSON:
//!
//! ```json
//! {
//!   "mode": "independent",
//!   "parallel": false,
//!   "stages": [
//!     {
//!       "name": "rule_of_five",
//!       "rules": [
//!         { "descriptor": "molecular_weight", "comparator": "<=", "threshold": 500 },
//!         { "descriptor": "logp", "comparator": "<=", "threshold": 5 }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Comparators stay plain strings until [`PipelineConfig::build_pipeline`],
//! which is where an unknown comparator is reported, tagged with its stage.

use crate::error::{ConfigError, Result};
use crate::filter_pipeline::{FilteringPipeline, PipelineMode};
use crate::presets;
use crate::rule::AdmissibilityRule;
use crate::stage::FilterStage;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub descriptor: String,
    pub comparator: String,
    pub threshold: f64,
}

impl RuleConfig {
    pub fn new(descriptor: &str, comparator: &str, threshold: f64) -> Self {
        Self {
            descriptor: descriptor.to_string(),
            comparator: comparator.to_string(),
            threshold,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageConfig {
    pub name: String,
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

impl StageConfig {
    /// Validate and build the stage. Errors are tagged with the stage name.
    pub fn build(&self) -> Result<FilterStage> {
        self.rules
            .iter()
            .map(|r| AdmissibilityRule::parse(r.descriptor.as_str(), &r.comparator, r.threshold))
            .collect::<Result<Vec<_>>>()
            .and_then(|rules| FilterStage::new(self.name.as_str(), rules))
            .map_err(|e| match e {
                // already names the stage
                e @ ConfigError::ContradictoryRules { .. } => e,
                e => ConfigError::InStage {
                    stage: self.name.clone(),
                    source: Box::new(e),
                },
            })
    }
}

impl From<&FilterStage> for StageConfig {
    fn from(stage: &FilterStage) -> Self {
        use crate::traits::Filter;
        Self {
            name: stage.name().to_string(),
            rules: stage
                .rules()
                .iter()
                .map(|r| RuleConfig::new(r.descriptor(), r.comparator().symbol(), r.threshold()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub mode: PipelineMode,
    #[serde(default)]
    pub parallel: bool,
    pub stages: Vec<StageConfig>,
}

impl Default for PipelineConfig {
    /// The two classic triage passes as independent stages.
    fn default() -> Self {
        Self {
            mode: PipelineMode::Independent,
            parallel: false,
            stages: vec![presets::rule_of_five(), presets::advanced()],
        }
    }
}

impl PipelineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&content)?;
        debug!("Loaded {} stages from {}", config.stages.len(), path.display());
        Ok(config)
    }

    /// Keep only the named stages, in the order given.
    pub fn select(mut self, names: &[String]) -> Result<Self> {
        if names.is_empty() {
            return Ok(self);
        }
        let mut selected = Vec::with_capacity(names.len());
        for name in names {
            let stage = self
                .stages
                .iter()
                .find(|s| &s.name == name)
                .cloned()
                .ok_or_else(|| ConfigError::UnknownStage(name.clone()))?;
            selected.push(stage);
        }
        self.stages = selected;
        Ok(self)
    }

    pub fn build_stages(&self) -> Result<Vec<FilterStage>> {
        self.stages.iter().map(StageConfig::build).collect()
    }

    pub fn build_pipeline(&self) -> Result<FilteringPipeline> {
        self.build_stages()?
            .into_iter()
            .fold(FilteringPipeline::builder(), |builder, stage| builder.add_stage(stage))
            .mode(self.mode)
            .parallel(self.parallel)
            .build()
    }
}

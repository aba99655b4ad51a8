//! Example stage configurations.
//!
//! These reproduce the two classic triage passes. The thresholds are
//! conventional starting points, not validated constants; real screens
//! should supply their own through [`PipelineConfig`](crate::PipelineConfig).

use crate::config::{RuleConfig, StageConfig};
use descriptors::names;

/// Lipinski's Rule of Five, all four criteria required.
pub fn rule_of_five() -> StageConfig {
    StageConfig {
        name: "rule_of_five".to_string(),
        rules: vec![
            RuleConfig::new(names::MOLECULAR_WEIGHT, "<=", 500.0),
            RuleConfig::new(names::LOGP, "<=", 5.0),
            RuleConfig::new(names::H_BOND_DONORS, "<=", 5.0),
            RuleConfig::new(names::H_BOND_ACCEPTORS, "<=", 10.0),
        ],
    }
}

/// Synthetic accessibility plus predicted ADMET properties.
pub fn advanced() -> StageConfig {
    StageConfig {
        name: "advanced".to_string(),
        rules: vec![
            RuleConfig::new(names::SA_SCORE, "<=", 6.0),
            RuleConfig::new(names::SOLUBILITY, ">=", 0.5),
            RuleConfig::new(names::TOXICITY, "<=", 0.5),
            RuleConfig::new(names::PK_PROFILE, ">=", 0.7),
        ],
    }
}

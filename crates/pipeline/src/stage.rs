//! Filter stages: a named conjunction of admissibility rules.

use crate::error::{ConfigError, Result};
use crate::record::{EvaluationRecord, EvidenceValue};
use crate::rule::{AdmissibilityRule, Comparator};
use crate::traits::Filter;
use descriptors::DescriptorMap;
use std::collections::HashSet;

/// An ordered set of rules combined with AND.
///
/// A stage with no rules passes every candidate. Rule order only affects
/// the order of evidence and violations, never the outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterStage {
    name: String,
    rules: Vec<AdmissibilityRule>,
    descriptor_names: Vec<String>,
}

impl FilterStage {
    /// Start building a stage.
    ///
    /// ```ignore
    /// let stage = FilterStage::builder("rule_of_five")
    ///     .at_most("molecular_weight", 500.0)
    ///     .at_most("logp", 5.0)
    ///     .build()?;
    /// ```
    pub fn builder(name: impl Into<String>) -> StageBuilder {
        StageBuilder {
            name: name.into(),
            rules: Vec::new(),
            error: None,
        }
    }

    /// Build a stage from already constructed rules.
    pub fn new(name: impl Into<String>, rules: Vec<AdmissibilityRule>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ConfigError::EmptyStageName);
        }
        check_contradictions(&name, &rules)?;

        let mut seen = HashSet::new();
        let descriptor_names = rules
            .iter()
            .map(|rule| rule.descriptor())
            .filter(|name| seen.insert(*name))
            .map(str::to_string)
            .collect();

        Ok(Self {
            name,
            rules,
            descriptor_names,
        })
    }

    pub fn rules(&self) -> &[AdmissibilityRule] {
        &self.rules
    }
}

impl Filter for FilterStage {
    fn name(&self) -> &str {
        &self.name
    }

    fn descriptor_names(&self) -> &[String] {
        &self.descriptor_names
    }

    /// Every rule is checked, even after the first failure, so the record
    /// lists all violations and a full evidence snapshot.
    fn evaluate(&self, candidate_id: &str, descriptors: &DescriptorMap) -> EvaluationRecord {
        let violations = self
            .rules
            .iter()
            .filter(|rule| !rule.evaluate(descriptors))
            .map(ToString::to_string)
            .collect();

        let evidence = self
            .descriptor_names
            .iter()
            .map(|name| EvidenceValue {
                descriptor: name.clone(),
                value: descriptors.get(name),
            })
            .collect();

        EvaluationRecord::new(candidate_id, &self.name, evidence, violations)
    }
}

/// Builder for [`FilterStage`].
///
/// Rule construction errors are remembered and reported by [`build`](Self::build),
/// so a whole stage can be declared in one chain.
#[derive(Debug)]
pub struct StageBuilder {
    name: String,
    rules: Vec<AdmissibilityRule>,
    error: Option<ConfigError>,
}

impl StageBuilder {
    /// Add an already built rule.
    pub fn rule(mut self, rule: AdmissibilityRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Add a rule from its parts; invalid parts fail the final `build`.
    pub fn with_rule(mut self, descriptor: impl Into<String>, comparator: Comparator, threshold: f64) -> Self {
        match AdmissibilityRule::new(descriptor, comparator, threshold) {
            Ok(rule) => self.rules.push(rule),
            Err(e) => {
                self.error.get_or_insert(e);
            }
        }
        self
    }

    pub fn at_most(self, descriptor: impl Into<String>, threshold: f64) -> Self {
        self.with_rule(descriptor, Comparator::LessOrEqual, threshold)
    }

    pub fn at_least(self, descriptor: impl Into<String>, threshold: f64) -> Self {
        self.with_rule(descriptor, Comparator::GreaterOrEqual, threshold)
    }

    pub fn below(self, descriptor: impl Into<String>, threshold: f64) -> Self {
        self.with_rule(descriptor, Comparator::Less, threshold)
    }

    pub fn above(self, descriptor: impl Into<String>, threshold: f64) -> Self {
        self.with_rule(descriptor, Comparator::Greater, threshold)
    }

    pub fn build(self) -> Result<FilterStage> {
        if let Some(e) = self.error {
            return Err(e);
        }
        FilterStage::new(self.name, self.rules)
    }
}

/// One side of the interval a rule allows: `(threshold, inclusive)`.
type Bound = (f64, bool);

/// Reject stages where two rules on the same descriptor leave no admissible
/// value, e.g. `x <= 1` together with `x >= 2`, or `x < 5` with `x >= 5`.
fn check_contradictions(stage: &str, rules: &[AdmissibilityRule]) -> Result<()> {
    for (i, upper) in rules.iter().enumerate() {
        if !upper.comparator().is_upper_bound() {
            continue;
        }
        for lower in rules.iter().filter(|r| !r.comparator().is_upper_bound()) {
            if lower.descriptor() != upper.descriptor() {
                continue;
            }
            let hi: Bound = (upper.threshold(), upper.comparator().is_inclusive());
            let lo: Bound = (lower.threshold(), lower.comparator().is_inclusive());
            if is_empty_interval(lo, hi) {
                let (first, second) = if rules.iter().position(|r| r == lower) < Some(i) {
                    (lower, upper)
                } else {
                    (upper, lower)
                };
                return Err(ConfigError::ContradictoryRules {
                    stage: stage.to_string(),
                    first: first.to_string(),
                    second: second.to_string(),
                });
            }
        }
    }
    Ok(())
}

fn is_empty_interval((lo, lo_inclusive): Bound, (hi, hi_inclusive): Bound) -> bool {
    lo > hi || (lo == hi && !(lo_inclusive && hi_inclusive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use descriptors::names;

    fn rule_of_five() -> FilterStage {
        FilterStage::builder("rule_of_five")
            .at_most(names::MOLECULAR_WEIGHT, 500.0)
            .at_most(names::LOGP, 5.0)
            .at_most(names::H_BOND_DONORS, 5.0)
            .at_most(names::H_BOND_ACCEPTORS, 10.0)
            .build()
            .unwrap()
    }

    fn ethanol() -> DescriptorMap {
        DescriptorMap::new()
            .with(names::MOLECULAR_WEIGHT, 46.069)
            .with(names::LOGP, -0.0014)
            .with(names::H_BOND_DONORS, 1.0)
            .with(names::H_BOND_ACCEPTORS, 1.0)
    }

    #[test]
    fn test_passing_candidate() {
        let record = rule_of_five().evaluate("CCO", &ethanol());

        assert!(record.passed());
        assert_eq!(record.candidate_id(), "CCO");
        assert_eq!(record.stage(), "rule_of_five");
        assert_eq!(record.evidence().len(), 4);
        assert_eq!(record.value(names::MOLECULAR_WEIGHT), Some(46.069));
    }

    #[test]
    fn test_failing_record_keeps_all_evidence() {
        let mut greasy = ethanol();
        greasy.insert(names::LOGP, 7.2);
        greasy.insert(names::MOLECULAR_WEIGHT, 612.0);

        let record = rule_of_five().evaluate("greasy", &greasy);

        assert!(!record.passed());
        assert_eq!(record.violations(), ["molecular_weight <= 500", "logp <= 5"]);
        let names_in_order: Vec<&str> = record.evidence().iter().map(|e| e.descriptor.as_str()).collect();
        assert_eq!(
            names_in_order,
            vec![
                names::MOLECULAR_WEIGHT,
                names::LOGP,
                names::H_BOND_DONORS,
                names::H_BOND_ACCEPTORS
            ]
        );
        assert_eq!(record.value(names::H_BOND_DONORS), Some(1.0));
    }

    #[test]
    fn test_empty_mapping_fails_with_absent_evidence() {
        let record = rule_of_five().evaluate("not_a_molecule", &DescriptorMap::new());
        assert!(!record.passed());
        assert_eq!(record.violations().len(), 4);
        assert!(record.evidence().iter().all(|e| e.value.is_none()));
    }

    #[test]
    fn test_zero_rule_stage_always_passes() {
        let stage = FilterStage::builder("anything").build().unwrap();
        assert!(stage.evaluate("X", &DescriptorMap::new()).passed());
        assert!(stage.evaluate("CCO", &ethanol()).passed());
        assert!(stage.evaluate("CCO", &ethanol()).evidence().is_empty());
    }

    #[test]
    fn test_rule_order_does_not_change_outcome() {
        let reversed = FilterStage::new(
            "reversed",
            rule_of_five().rules().iter().rev().cloned().collect(),
        )
        .unwrap();
        let mut candidate = ethanol();
        candidate.insert(names::H_BOND_DONORS, 6.0);

        assert_eq!(
            rule_of_five().evaluate("X", &candidate).passed(),
            reversed.evaluate("X", &candidate).passed()
        );
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let stage = rule_of_five();
        assert_eq!(stage.evaluate("CCO", &ethanol()), stage.evaluate("CCO", &ethanol()));
    }

    #[test]
    fn test_duplicate_descriptor_evidence_once() {
        let stage = FilterStage::builder("window")
            .at_least(names::LOGP, -1.0)
            .at_most(names::LOGP, 3.0)
            .build()
            .unwrap();
        assert_eq!(stage.descriptor_names(), [names::LOGP]);
        assert!(stage.evaluate("CCO", &ethanol()).passed());
    }

    #[test]
    fn test_contradictory_rules_rejected() {
        let err = FilterStage::builder("impossible")
            .at_most(names::MOLECULAR_WEIGHT, 100.0)
            .at_least(names::MOLECULAR_WEIGHT, 200.0)
            .build()
            .unwrap_err();
        match err {
            ConfigError::ContradictoryRules { stage, first, second } => {
                assert_eq!(stage, "impossible");
                assert_eq!(first, "molecular_weight <= 100");
                assert_eq!(second, "molecular_weight >= 200");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_touching_bounds() {
        // a single admissible point is fine
        assert!(
            FilterStage::builder("point")
                .at_most("x", 5.0)
                .at_least("x", 5.0)
                .build()
                .is_ok()
        );
        assert!(
            FilterStage::builder("empty")
                .below("x", 5.0)
                .at_least("x", 5.0)
                .build()
                .is_err()
        );
    }

    #[test]
    fn test_builder_reports_bad_rule() {
        let err = FilterStage::builder("bad")
            .at_most("", 1.0)
            .at_most("logp", 5.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::EmptyDescriptorName));
    }

    #[test]
    fn test_empty_stage_name_rejected() {
        assert!(matches!(
            FilterStage::builder(" ").build(),
            Err(ConfigError::EmptyStageName)
        ));
    }
}

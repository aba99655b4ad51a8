//! Evaluation records and result sets.

use serde::Serialize;

/// One descriptor value as seen by a stage at evaluation time.
/// `value` is `None` when the descriptor was absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvidenceValue {
    pub descriptor: String,
    pub value: Option<f64>,
}

/// The outcome of evaluating one candidate against one stage.
///
/// `evidence` holds every descriptor the stage references, in rule order,
/// whether its rule passed or not. `violations` names the failed rules and
/// is empty exactly when `passed` is true.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationRecord {
    candidate_id: String,
    stage: String,
    passed: bool,
    evidence: Vec<EvidenceValue>,
    violations: Vec<String>,
}

impl EvaluationRecord {
    pub fn new(
        candidate_id: impl Into<String>,
        stage: impl Into<String>,
        evidence: Vec<EvidenceValue>,
        violations: Vec<String>,
    ) -> Self {
        Self {
            candidate_id: candidate_id.into(),
            stage: stage.into(),
            passed: violations.is_empty(),
            evidence,
            violations,
        }
    }

    pub fn candidate_id(&self) -> &str {
        &self.candidate_id
    }

    pub fn stage(&self) -> &str {
        &self.stage
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn evidence(&self) -> &[EvidenceValue] {
        &self.evidence
    }

    pub fn violations(&self) -> &[String] {
        &self.violations
    }

    /// Value of one descriptor in the evidence snapshot.
    pub fn value(&self, descriptor: &str) -> Option<f64> {
        self.evidence
            .iter()
            .find(|e| e.descriptor == descriptor)
            .and_then(|e| e.value)
    }
}

/// Passing records of one stage, in candidate input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSet {
    stage: String,
    records: Vec<EvaluationRecord>,
}

impl ResultSet {
    pub(crate) fn new(stage: impl Into<String>, records: Vec<EvaluationRecord>) -> Self {
        debug_assert!(records.iter().all(EvaluationRecord::passed));
        Self {
            stage: stage.into(),
            records,
        }
    }

    pub fn stage(&self) -> &str {
        &self.stage
    }

    pub fn records(&self) -> &[EvaluationRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EvaluationRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn candidate_ids(&self) -> Vec<&str> {
        self.records.iter().map(EvaluationRecord::candidate_id).collect()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a EvaluationRecord;
    type IntoIter = std::slice::Iter<'a, EvaluationRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

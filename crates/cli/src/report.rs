//! Plain-text tables for triage results.
//!
//! Rendering is kept free of terminal colors so it can be tested and piped;
//! `main` only colors the titles around it.

use descriptors::names;
use pipeline::{EvaluationRecord, StageAudit};

/// Format a descriptor value: integral values without decimals (counts),
/// everything else with four, absent values as `-`.
pub fn format_value(value: Option<f64>) -> String {
    match value {
        None => "-".to_string(),
        Some(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 => format!("{v:.0}"),
        Some(v) if v.is_finite() => format!("{v:.4}"),
        Some(v) => v.to_string(),
    }
}

/// Render records as an aligned table: a `SMILES` column, one column per
/// descriptor in evidence order and, when `with_violations` is set, the
/// failed rules.
pub fn render_records<'a, I>(records: I, with_violations: bool) -> String
where
    I: IntoIterator<Item = &'a EvaluationRecord>,
{
    let records: Vec<&EvaluationRecord> = records.into_iter().collect();
    let Some(first) = records.first() else {
        return String::new();
    };

    let mut header = vec!["SMILES".to_string()];
    header.extend(
        first
            .evidence()
            .iter()
            .map(|e| names::label(&e.descriptor).to_string()),
    );
    if with_violations {
        header.push("Violations".to_string());
    }

    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            let mut row = vec![record.candidate_id().to_string()];
            row.extend(record.evidence().iter().map(|e| format_value(e.value)));
            if with_violations {
                row.push(record.violations().join("; "));
            }
            row
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

/// One-line summary for a stage.
pub fn stage_summary(stage: &StageAudit) -> String {
    let passed = stage.passed().count();
    format!(
        "{}: {} of {} evaluated compounds passed",
        stage.stage,
        passed,
        stage.records.len()
    )
}

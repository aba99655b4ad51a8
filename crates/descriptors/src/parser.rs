//! Parser for descriptor table files.
//!
//! Tables are plain CSV (or TSV), one structure per row:
//!
//! ```text
//! # exported descriptors
//! smiles,molecular_weight,logp,h_bond_donors,h_bond_acceptors
//! CCO,46.069,-0.0014,1,1
//! CC(=O)O,60.052,0.0909,1,1
//! ```
//!
//! The first column is always the structure identifier; every other column
//! header names a descriptor. Empty cells and `NA` mean "not computed".
//! `.tsv` files are tab separated, everything else uses commas. Quoting
//! follows the usual CSV rules, so exports that quote every cell load as-is.

use crate::error::{DescriptorError, Result};
use crate::index::DescriptorTable;
use crate::types::DescriptorMap;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

/// Pick the column separator from the file extension.
pub fn separator_for(path: &Path) -> u8 {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
        _ => b',',
    }
}

/// Load a descriptor table from disk.
pub fn parse_descriptor_table(path: &Path) -> Result<DescriptorTable> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DescriptorError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DescriptorError::Io(e),
    })?;

    let file = path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    parse_descriptor_table_str(&content, &file, separator_for(path))
}

/// Parse descriptor table text.
///
/// `file` is only used in error messages.
pub fn parse_descriptor_table_str(
    content: &str,
    file: &str,
    separator: u8,
) -> Result<DescriptorTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .delimiter(separator)
        .comment(Some(b'#'))
        .trim(Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());
    let mut records = reader.records();

    let (header_line, header) =
        next_row(&mut records, file)?.ok_or_else(|| DescriptorError::EmptyTable {
            file: file.to_string(),
        })?;

    let columns: Vec<&str> = header.iter().collect();
    if columns.len() < 2 {
        return Err(DescriptorError::ParseError {
            file: file.to_string(),
            line: header_line,
            reason: "header needs an identifier column and at least one descriptor".to_string(),
        });
    }
    if let Some(blank) = columns.iter().position(|c| c.is_empty()) {
        return Err(DescriptorError::ParseError {
            file: file.to_string(),
            line: header_line,
            reason: format!("column {} has an empty name", blank + 1),
        });
    }
    let descriptor_names = &columns[1..];

    let mut table = DescriptorTable::new();
    while let Some((line_no, record)) = next_row(&mut records, file)? {
        if record.len() != columns.len() {
            return Err(DescriptorError::FieldCountMismatch {
                expected: columns.len(),
                found: record.len(),
                line: line_no,
            });
        }

        let id = &record[0];
        if id.is_empty() {
            return Err(DescriptorError::ParseError {
                file: file.to_string(),
                line: line_no,
                reason: "Missing structure identifier".to_string(),
            });
        }

        let mut descriptors = DescriptorMap::new();
        for (name, cell) in descriptor_names.iter().zip(record.iter().skip(1)) {
            if let Some(value) = parse_cell(name, cell)? {
                descriptors.insert(*name, value);
            }
        }

        if table.insert(id, descriptors).is_some() {
            warn!("{}:{}: duplicate structure {}, keeping the later row", file, line_no, id);
        }
    }

    debug!("Parsed {} structures from {}", table.len(), file);
    Ok(table)
}

/// Next non-blank record together with the line it starts on.
fn next_row(
    records: &mut impl Iterator<Item = csv::Result<StringRecord>>,
    file: &str,
) -> Result<Option<(usize, StringRecord)>> {
    for result in records {
        let record = result.map_err(|e| DescriptorError::ParseError {
            file: file.to_string(),
            line: e.position().map_or(0, |p| p.line() as usize),
            reason: e.to_string(),
        })?;
        // whitespace-only line
        if record.len() == 1 && record[0].is_empty() {
            continue;
        }
        let line = record.position().map_or(0, |p| p.line() as usize);
        return Ok(Some((line, record)));
    }
    Ok(None)
}

/// Parse one numeric cell. `Ok(None)` means the descriptor is absent.
fn parse_cell(field: &str, cell: &str) -> Result<Option<f64>> {
    if cell.is_empty() || cell.eq_ignore_ascii_case("na") {
        return Ok(None);
    }
    // f64::from_str already accepts NaN, inf and infinity in any case
    cell.parse::<f64>()
        .map(Some)
        .map_err(|_| DescriptorError::InvalidValue {
            field: field.to_string(),
            value: cell.to_string(),
        })
}

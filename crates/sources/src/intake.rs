//! Reading candidate structure lists.
//!
//! Format: one structure per line. Blank lines and lines starting with `#`
//! are skipped. Only the first whitespace separated token is the structure;
//! anything after it (a compound name, a registry number) is ignored, which
//! is how most `.smi` exports look.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Read a candidate list from a file.
pub fn read_candidate_list(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Reading candidate list {}", path.display()))?;
    let ids = parse_candidate_list(&content);
    debug!("Read {} candidates from {}", ids.len(), path.display());
    Ok(ids)
}

/// Parse candidate list text, preserving order and duplicates.
pub fn parse_candidate_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_candidate_list() {
        let text = "\
# starter set
CCO ethanol
CC(=O)O\tacetic acid

  CC(C)O
CCO
";
        let ids = parse_candidate_list(text);
        assert_eq!(ids, vec!["CCO", "CC(=O)O", "CC(C)O", "CCO"]);
    }

    #[test]
    fn test_empty_list() {
        assert!(parse_candidate_list("").is_empty());
        assert!(parse_candidate_list("# only a comment\n\n").is_empty());
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = read_candidate_list(Path::new("/no/such/list.smi")).unwrap_err();
        assert!(err.to_string().contains("/no/such/list.smi"));
    }
}

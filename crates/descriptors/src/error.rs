//! Error types for the descriptors crate.
//!
//! Only problems with descriptor *sources* are errors here: a missing file,
//! a malformed table. A structure the provider cannot understand is not an
//! error, see [`ParseFailure`](crate::provider::ParseFailure).

use thiserror::Error;

/// Errors that can occur while loading descriptor tables.
#[derive(Error, Debug)]
pub enum DescriptorError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Line in a table file couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A cell held something that is not a number
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// Row width doesn't match the header
    #[error("Expected {expected} fields but found {found} in line {line}")]
    FieldCountMismatch {
        expected: usize,
        found: usize,
        line: usize,
    },

    /// The table had no header line at all
    #[error("Descriptor table {file} is empty")]
    EmptyTable { file: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DescriptorError>;

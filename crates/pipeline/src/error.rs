//! Configuration errors.
//!
//! A candidate failing a rule, missing a descriptor or failing to parse is
//! never an error; it is just absent from a result set. Everything here is
//! a mistake in how stages were put together, reported before any run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unknown comparator '{0}' (expected one of <=, >=, <, >)")]
    UnknownComparator(String),

    #[error("rule has an empty descriptor name")]
    EmptyDescriptorName,

    #[error("threshold for {descriptor} must be finite, got {threshold}")]
    NonFiniteThreshold { descriptor: String, threshold: f64 },

    #[error("stage name must not be empty")]
    EmptyStageName,

    /// Two rules on one descriptor that no value can satisfy together
    #[error("rules '{first}' and '{second}' in stage {stage} can never both pass")]
    ContradictoryRules {
        stage: String,
        first: String,
        second: String,
    },

    #[error("no stage named {0} is configured")]
    UnknownStage(String),

    #[error("stage {0} is defined more than once")]
    DuplicateStage(String),

    #[error("stage {stage}: {source}")]
    InStage {
        stage: String,
        #[source]
        source: Box<ConfigError>,
    },

    #[error("invalid stage configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Which of the two input documents an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceSide {
    Presentation,
    Spreadsheet,
}

impl fmt::Display for SourceSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Presentation => write!(f, "presentation"),
            Self::Spreadsheet => write!(f, "spreadsheet"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),
    /// Config validation error (empty marker, bad alias list, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),
    /// A document produced zero blocks.
    #[error("{side} document contains no extractable blocks")]
    EmptySource { side: SourceSide },
    /// Rows of one block disagree on width.
    #[error("block '{label}', row {row}: expected {expected} cell(s), found {found}")]
    MalformedBlock {
        label: String,
        row: usize,
        expected: usize,
        found: usize,
    },
    /// The identifier axis of a block could not be determined.
    #[error("block '{label}': cannot normalize: {reason}")]
    Normalization { label: String, reason: String },
    /// A document reader failed.
    #[error("cannot read {path}: {message}")]
    Read { path: String, message: String },
    /// IO error (report writing, etc.).
    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ReconError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<csv::Error> for ReconError {
    fn from(err: csv::Error) -> Self {
        Self::Io(err.to_string())
    }
}

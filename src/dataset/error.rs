//! Dataset loading errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while locating or parsing the order table.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// None of the configured candidate paths exist.
    #[error("order table not found; tried {}", candidates.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", "))]
    NotFound { candidates: Vec<PathBuf> },

    /// The file exists but could not be read or decoded as CSV.
    #[error("failed to read order table: {0}")]
    Csv(#[from] csv::Error),

    /// A non-empty timestamp cell did not match the expected format.
    #[error("invalid timestamp in column '{column}' on line {line}: '{value}'")]
    InvalidTimestamp {
        column: &'static str,
        value: String,
        line: u64,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

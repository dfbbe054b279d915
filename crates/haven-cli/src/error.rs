//! CLI error types.

use std::path::PathBuf;

use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// A requested column is absent from the input header.
    #[error("Column '{column}' not found in {}. Available: {available}", .path.display())]
    MissingColumn {
        /// Requested column.
        column: String,
        /// Input file.
        path: PathBuf,
        /// Comma-separated header.
        available: String,
    },

    /// Input file could not be parsed.
    #[error("Invalid input in {}: {reason}", .path.display())]
    InvalidInput {
        /// Input file.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// Calculation error.
    #[error("Calculation error: {0}")]
    Calculation(#[from] haven_risk::RiskError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Creates an invalid-input error for `path`.
    pub fn invalid_input(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;

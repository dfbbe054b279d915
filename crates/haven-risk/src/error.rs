//! Error types for risk calculations.

use haven_math::MathError;
use thiserror::Error;

/// A specialized Result type for risk calculations.
pub type RiskResult<T> = Result<T, RiskError>;

/// Errors that can occur during risk calculations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RiskError {
    /// A return series failed validation.
    #[error("invalid series '{name}': {reason}")]
    InvalidSeries {
        /// Parameter name of the series (e.g. "x").
        name: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Tail probability outside (0, 1).
    #[error("invalid risk level p = {value}: must lie strictly between 0 and 1")]
    InvalidRiskLevel {
        /// The rejected value.
        value: f64,
    },

    /// Portfolio weight outside [0, 1].
    #[error("invalid weight w = {value}: must lie in [0, 1]")]
    InvalidWeight {
        /// The rejected value.
        value: f64,
    },

    /// Invalid input parameters
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Coefficient names not present in the estimate.
    #[error("unknown term(s): {}", .terms.join(", "))]
    UnknownTerms {
        /// Every requested name that could not be found.
        terms: Vec<String>,
    },

    /// BM10 table rows missing or non-numeric.
    #[error("BM10 table is missing level(s): {}", .levels.join(", "))]
    MissingLevels {
        /// Every required level that is absent.
        levels: Vec<String>,
    },

    /// Coefficient estimate is malformed.
    #[error("invalid coefficient estimate: {0}")]
    InvalidEstimate(String),

    /// Insufficient data for calculation
    #[error("insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData {
        /// Minimum required observations.
        required: usize,
        /// Observations available.
        actual: usize,
    },

    /// Division by zero
    #[error("division by zero in {context}")]
    DivisionByZero {
        /// Where the zero denominator occurred.
        context: String,
    },

    /// External model failed to produce output.
    #[error("model error: {0}")]
    Model(String),

    /// Error from the numeric layer.
    #[error(transparent)]
    Math(#[from] MathError),
}

impl RiskError {
    /// Creates an invalid series error.
    #[must_use]
    pub fn invalid_series(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSeries {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Creates a division by zero error.
    #[must_use]
    pub fn division_by_zero(context: impl Into<String>) -> Self {
        Self::DivisionByZero {
            context: context.into(),
        }
    }
}

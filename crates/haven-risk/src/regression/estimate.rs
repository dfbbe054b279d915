//! Named coefficient estimates with their covariance matrix.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::{RiskError, RiskResult};

/// Coefficient vector and its covariance matrix, in matching order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EstimateData", into = "EstimateData")]
pub struct CoefficientEstimate {
    names: Vec<String>,
    values: Vec<f64>,
    covariance: DMatrix<f64>,
}

/// Serialized form: `{ "names": [..], "values": [..], "covariance": [[..], ..] }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EstimateData {
    names: Vec<String>,
    values: Vec<f64>,
    covariance: Vec<Vec<f64>>,
}

impl CoefficientEstimate {
    /// Creates an estimate, checking that names, values and covariance agree.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::InvalidEstimate`] if lengths differ, the matrix is
    /// not k × k, or a name repeats.
    pub fn new(
        names: Vec<String>,
        values: Vec<f64>,
        covariance: DMatrix<f64>,
    ) -> RiskResult<Self> {
        let k = names.len();
        if values.len() != k {
            return Err(RiskError::InvalidEstimate(format!(
                "{} names but {} values",
                k,
                values.len()
            )));
        }
        if covariance.nrows() != k || covariance.ncols() != k {
            return Err(RiskError::InvalidEstimate(format!(
                "covariance matrix is {}x{}, expected {}x{}",
                covariance.nrows(),
                covariance.ncols(),
                k,
                k
            )));
        }
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(RiskError::InvalidEstimate(format!(
                    "duplicate coefficient name '{}'",
                    name
                )));
            }
        }
        Ok(Self {
            names,
            values,
            covariance,
        })
    }

    /// Creates an estimate from a row-major nested covariance matrix.
    pub fn from_rows(
        names: Vec<String>,
        values: Vec<f64>,
        covariance: &[Vec<f64>],
    ) -> RiskResult<Self> {
        let k = covariance.len();
        if let Some(row) = covariance.iter().find(|row| row.len() != k) {
            return Err(RiskError::InvalidEstimate(format!(
                "covariance matrix is not square: row of length {} in {} rows",
                row.len(),
                k
            )));
        }
        let flat: Vec<f64> = covariance.iter().flatten().copied().collect();
        Self::new(names, values, DMatrix::from_row_slice(k, k, &flat))
    }

    /// Coefficient names in order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Coefficient values in order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Covariance matrix of the coefficients.
    pub fn covariance(&self) -> &DMatrix<f64> {
        &self.covariance
    }

    /// Number of coefficients.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if the estimate holds no coefficients.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Position of a coefficient by name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Value of a coefficient by name.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.index_of(name).map(|i| self.values[i])
    }
}

impl TryFrom<EstimateData> for CoefficientEstimate {
    type Error = RiskError;

    fn try_from(data: EstimateData) -> Result<Self, Self::Error> {
        Self::from_rows(data.names, data.values, &data.covariance)
    }
}

impl From<CoefficientEstimate> for EstimateData {
    fn from(estimate: CoefficientEstimate) -> Self {
        let covariance = estimate
            .covariance
            .row_iter()
            .map(|row| row.iter().copied().collect())
            .collect();
        Self {
            names: estimate.names,
            values: estimate.values,
            covariance,
        }
    }
}

//! Covariance paths.

use nalgebra::Matrix2;
use serde::{Deserialize, Serialize};

use crate::{RiskError, RiskResult};

/// Minimum number of observations in a covariance path.
pub const MIN_PATH_LENGTH: usize = 10;

/// A symmetric 2×2 covariance matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Covariance2 {
    /// Variance of the hedged asset, Σ[1,1].
    pub v1: f64,
    /// Covariance of the two assets, Σ[1,2].
    pub c12: f64,
    /// Variance of the hedging asset, Σ[2,2].
    pub v2: f64,
}

impl Covariance2 {
    /// Creates a covariance matrix from its three distinct entries.
    pub fn new(v1: f64, c12: f64, v2: f64) -> Self {
        Self { v1, c12, v2 }
    }

    /// Reads a 2×2 matrix, requiring symmetry to within `1e-12` relative.
    pub fn from_matrix(matrix: &Matrix2<f64>) -> RiskResult<Self> {
        let upper = matrix[(0, 1)];
        let lower = matrix[(1, 0)];
        let scale = upper.abs().max(lower.abs()).max(1.0);
        if (upper - lower).abs() > 1e-12 * scale {
            return Err(RiskError::InvalidInput(format!(
                "covariance matrix is not symmetric: {} vs {}",
                upper, lower
            )));
        }
        Ok(Self::new(matrix[(0, 0)], upper, matrix[(1, 1)]))
    }

    /// Full matrix form.
    pub fn to_matrix(&self) -> Matrix2<f64> {
        Matrix2::new(self.v1, self.c12, self.c12, self.v2)
    }

    /// Returns true if all three entries are finite.
    pub fn is_finite(&self) -> bool {
        self.v1.is_finite() && self.c12.is_finite() && self.v2.is_finite()
    }

    /// Implied correlation.
    pub fn correlation(&self) -> f64 {
        self.c12 / (self.v1 * self.v2).sqrt()
    }
}

/// Time-indexed sequence of 2×2 conditional covariance matrices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CovariancePath {
    matrices: Vec<Covariance2>,
}

impl CovariancePath {
    /// Creates a path from matrices in time order.
    pub fn new(matrices: Vec<Covariance2>) -> Self {
        Self { matrices }
    }

    /// Creates a path from full 2×2 matrices.
    pub fn from_matrices(matrices: &[Matrix2<f64>]) -> RiskResult<Self> {
        matrices
            .iter()
            .map(Covariance2::from_matrix)
            .collect::<RiskResult<Vec<_>>>()
            .map(Self::new)
    }

    /// Creates a path of `len` copies of one matrix.
    pub fn constant(matrix: Covariance2, len: usize) -> Self {
        Self::new(vec![matrix; len])
    }

    /// Matrices in time order.
    pub fn matrices(&self) -> &[Covariance2] {
        &self.matrices
    }

    /// Number of time steps T.
    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    /// Returns true if the path has no time steps.
    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }

    /// Iterates over the matrices in time order.
    pub fn iter(&self) -> std::slice::Iter<'_, Covariance2> {
        self.matrices.iter()
    }
}

impl FromIterator<Covariance2> for CovariancePath {
    fn from_iter<I: IntoIterator<Item = Covariance2>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

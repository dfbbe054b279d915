//! Linear algebra utilities.
//!
//! Quadratic forms used to propagate a coefficient covariance matrix
//! through a linear combination of coefficients.

use crate::error::{MathError, MathResult};
use nalgebra::{DMatrix, DVector};

/// Checks that `matrix` is square with `n` rows.
pub fn ensure_square(matrix: &DMatrix<f64>, n: usize) -> MathResult<()> {
    if matrix.nrows() != n || matrix.ncols() != n {
        return Err(MathError::DimensionMismatch {
            rows1: matrix.nrows(),
            cols1: matrix.ncols(),
            rows2: n,
            cols2: n,
        });
    }
    Ok(())
}

/// Computes the quadratic form `lᵗ V l`.
///
/// # Arguments
///
/// * `matrix` - Square matrix V (n × n)
/// * `weights` - Vector l (length n)
pub fn quadratic_form(matrix: &DMatrix<f64>, weights: &DVector<f64>) -> MathResult<f64> {
    ensure_square(matrix, weights.len())?;
    Ok(weights.dot(&(matrix * weights)))
}

/// Variance of the sum of the coefficients at `indices`.
///
/// Builds the 0/1 selector vector for `indices` and evaluates `sᵗ V s`.
/// Repeated indices count once.
pub fn selector_variance(matrix: &DMatrix<f64>, indices: &[usize]) -> MathResult<f64> {
    let n = matrix.nrows();
    let mut selector = DVector::zeros(n);
    for &i in indices {
        if i >= n {
            return Err(MathError::invalid_input(format!(
                "selector index {} out of range for {}x{} matrix",
                i,
                n,
                matrix.ncols()
            )));
        }
        selector[i] = 1.0;
    }
    quadratic_form(matrix, &selector)
}

//! Descriptive statistics over return series with missing values.
//!
//! A value is "missing" when it is NaN or infinite. Every function here
//! drops missing values first; the two-series functions keep only the
//! positions where both inputs are present (pairwise-complete).

use log::trace;
use statrs::statistics::Statistics;

use crate::error::{MathError, MathResult};

/// Returns the finite values of `values`, preserving order.
pub fn finite_values(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| v.is_finite()).collect()
}

/// Arithmetic mean of the finite values.
///
/// # Errors
///
/// Returns [`MathError::InsufficientData`] if no finite value is present.
pub fn mean(values: &[f64]) -> MathResult<f64> {
    let clean = finite_values(values);
    if clean.is_empty() {
        return Err(MathError::insufficient_data(1, 0));
    }
    Ok(clean.iter().mean())
}

/// Sample standard deviation (Bessel-corrected) of the finite values.
///
/// # Errors
///
/// Returns [`MathError::InsufficientData`] if fewer than two finite values are present.
pub fn sample_std_dev(values: &[f64]) -> MathResult<f64> {
    let clean = finite_values(values);
    if clean.len() < 2 {
        return Err(MathError::insufficient_data(2, clean.len()));
    }
    let sd = clean.iter().std_dev();
    trace!("sample std dev over {} observations: {}", clean.len(), sd);
    Ok(sd)
}

/// Aligns two series and keeps only positions where both are finite.
///
/// Series of unequal length are aligned from the start; trailing values of
/// the longer series have no partner and are dropped.
pub fn pairwise_complete(x: &[f64], y: &[f64]) -> (Vec<f64>, Vec<f64>) {
    if x.len() != y.len() {
        trace!(
            "pairwise alignment of unequal lengths {} and {}",
            x.len(),
            y.len()
        );
    }
    x.iter()
        .zip(y.iter())
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(a, b)| (*a, *b))
        .unzip()
}

/// Pairwise-complete sample covariance (Bessel-corrected).
///
/// # Errors
///
/// Returns [`MathError::InsufficientData`] if fewer than two complete pairs exist.
pub fn sample_covariance(x: &[f64], y: &[f64]) -> MathResult<f64> {
    let (a, b) = pairwise_complete(x, y);
    if a.len() < 2 {
        return Err(MathError::insufficient_data(2, a.len()));
    }
    Ok(a.iter().covariance(b.iter()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_missing_values_are_dropped() {
        let values = [1.0, f64::NAN, 3.0, f64::INFINITY, 5.0];
        assert_eq!(finite_values(&values), vec![1.0, 3.0, 5.0]);
        assert_relative_eq!(mean(&values).unwrap(), 3.0, epsilon = 1e-15);
        assert_relative_eq!(sample_std_dev(&values).unwrap(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_bessel_correction() {
        // Population variance 1.25, sample variance 5/3
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(
            sample_std_dev(&values).unwrap(),
            (5.0_f64 / 3.0).sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_insufficient_data() {
        assert_eq!(mean(&[f64::NAN]), Err(MathError::insufficient_data(1, 0)));
        assert_eq!(
            sample_std_dev(&[0.5, f64::NAN]),
            Err(MathError::insufficient_data(2, 1))
        );
    }

    #[test]
    fn test_pairwise_complete() {
        let x = [1.0, f64::NAN, 3.0, 4.0, 5.0];
        let y = [2.0, 2.0, f64::NAN, 8.0];
        let (a, b) = pairwise_complete(&x, &y);
        assert_eq!(a, vec![1.0, 4.0]);
        assert_eq!(b, vec![2.0, 8.0]);
    }

    #[test]
    fn test_sample_covariance() {
        let x = [1.0, 2.0, 3.0, f64::NAN];
        let y = [2.0, 4.0, 6.0, 1.0];
        // cov = 2 * var(x) = 2 * 1
        assert_relative_eq!(sample_covariance(&x, &y).unwrap(), 2.0, epsilon = 1e-12);
    }

    proptest! {
        #[test]
        fn prop_std_dev_non_negative(values in prop::collection::vec(-1.0f64..1.0, 2..50)) {
            let sd = sample_std_dev(&values).unwrap();
            prop_assert!(sd >= 0.0);
        }
    }
}

//! Standard normal distribution functions.
//!
//! Thin wrappers over `statrs` that validate their domain and return
//! [`MathResult`] instead of silently producing NaN.

use statrs::distribution::{Continuous, ContinuousCDF, Normal};

use crate::error::{MathError, MathResult};

/// Standard normal density φ(x).
#[inline]
pub fn norm_pdf(x: f64) -> f64 {
    Normal::standard().pdf(x)
}

/// Standard normal cumulative distribution Φ(x).
#[inline]
pub fn norm_cdf(x: f64) -> f64 {
    Normal::standard().cdf(x)
}

/// Standard normal quantile Φ⁻¹(p).
///
/// # Errors
///
/// Returns [`MathError::Domain`] unless `0 < p < 1`.
pub fn norm_ppf(p: f64) -> MathResult<f64> {
    if !(p > 0.0 && p < 1.0) {
        return Err(MathError::domain("p", p, "must lie strictly between 0 and 1"));
    }
    Ok(Normal::standard().inverse_cdf(p))
}

/// Two-sided p-value of a standard normal test statistic: 2·(1 − Φ(|z|)).
#[inline]
pub fn two_sided_p_value(z: f64) -> f64 {
    2.0 * (1.0 - norm_cdf(z.abs()))
}

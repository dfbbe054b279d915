//! Linear combinations of regression coefficients.

use serde::{Deserialize, Serialize};
use tracing::debug;

use haven_math::distributions::two_sided_p_value;
use haven_math::linear_algebra::selector_variance;

use super::CoefficientEstimate;
use crate::{RiskError, RiskResult};

/// Sum of selected coefficients with its Wald statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinComboResult {
    /// Sum of the selected coefficients.
    pub estimate: f64,
    /// Standard error of the sum.
    pub std_error: f64,
    /// z-statistic, estimate / std_error.
    pub z_value: f64,
    /// Two-sided normal p-value.
    pub p_value: f64,
}

/// Tests the sum of the named coefficients.
///
/// The variance is `sᵗ V s` with `s` the 0/1 selector of `terms`; a term
/// listed twice is selected once.
///
/// # Errors
///
/// - [`RiskError::UnknownTerms`] listing every name not in the estimate
/// - [`RiskError::InvalidInput`] if `terms` is empty
/// - [`RiskError::DivisionByZero`] if the combined variance is not positive
pub fn linear_combination<S: AsRef<str>>(
    estimate: &CoefficientEstimate,
    terms: &[S],
) -> RiskResult<LinComboResult> {
    if terms.is_empty() {
        return Err(RiskError::InvalidInput(
            "linear combination needs at least one term".to_string(),
        ));
    }

    let mut indices = Vec::with_capacity(terms.len());
    let mut unknown = Vec::new();
    for term in terms {
        let term = term.as_ref();
        match estimate.index_of(term) {
            Some(i) if !indices.contains(&i) => indices.push(i),
            Some(_) => {}
            None => unknown.push(term.to_string()),
        }
    }
    if !unknown.is_empty() {
        return Err(RiskError::UnknownTerms { terms: unknown });
    }

    let sum: f64 = indices.iter().map(|&i| estimate.values()[i]).sum();
    let variance = selector_variance(estimate.covariance(), &indices)?;
    if !variance.is_finite() || variance <= 0.0 {
        return Err(RiskError::division_by_zero(format!(
            "standard error of linear combination (variance {})",
            variance
        )));
    }

    let std_error = variance.sqrt();
    let z_value = sum / std_error;
    let result = LinComboResult {
        estimate: sum,
        std_error,
        z_value,
        p_value: two_sided_p_value(z_value),
    };
    debug!(
        terms = indices.len(),
        estimate = result.estimate,
        p_value = result.p_value,
        "linear combination"
    );
    Ok(result)
}

//! Parametric (normal) VaR and ES.

use haven_math::distributions::{norm_pdf, norm_ppf};
use haven_math::MathError;

use crate::{RiskError, RiskResult};

/// Checks that `p` is a valid tail probability.
pub fn validate_risk_level(p: f64) -> RiskResult<()> {
    if p > 0.0 && p < 1.0 {
        Ok(())
    } else {
        Err(RiskError::InvalidRiskLevel { value: p })
    }
}

fn validate_std_dev(std_dev: f64) -> RiskResult<()> {
    if std_dev.is_finite() && std_dev >= 0.0 {
        Ok(())
    } else {
        Err(MathError::domain("std_dev", std_dev, "must be finite and non-negative").into())
    }
}

/// Normal Value at Risk: `μ + σ·Φ⁻¹(1 − p)`.
///
/// # Arguments
///
/// * `mean` - Mean return μ
/// * `std_dev` - Standard deviation σ (≥ 0)
/// * `p` - Tail probability in (0, 1)
pub fn value_at_risk(mean: f64, std_dev: f64, p: f64) -> RiskResult<f64> {
    validate_risk_level(p)?;
    validate_std_dev(std_dev)?;
    let z = norm_ppf(1.0 - p)?;
    Ok(mean + std_dev * z)
}

/// Normal Expected Shortfall: `μ + σ·φ(Φ⁻¹(1 − p)) / p`.
///
/// # Arguments
///
/// * `mean` - Mean return μ
/// * `std_dev` - Standard deviation σ (≥ 0)
/// * `p` - Tail probability in (0, 1)
pub fn expected_shortfall(mean: f64, std_dev: f64, p: f64) -> RiskResult<f64> {
    validate_risk_level(p)?;
    validate_std_dev(std_dev)?;
    let z = norm_ppf(1.0 - p)?;
    Ok(mean + std_dev * norm_pdf(z) / p)
}

//! Reference covariance sources.
//!
//! Deterministic, parameter-free stand-ins for a fitted dynamic-correlation
//! model. Both expect series already aligned pairwise-complete.

use serde::{Deserialize, Serialize};

use haven_math::statistics::sample_covariance;

use super::covariance::{Covariance2, CovariancePath};
use crate::model::CovarianceModel;
use crate::{RiskError, RiskResult};

fn sample_matrix(x: &[f64], y: &[f64]) -> RiskResult<Covariance2> {
    Ok(Covariance2::new(
        sample_covariance(x, x)?,
        sample_covariance(x, y)?,
        sample_covariance(y, y)?,
    ))
}

fn check_aligned(x: &[f64], y: &[f64]) -> RiskResult<()> {
    if x.len() != y.len() {
        return Err(RiskError::InvalidInput(format!(
            "series must be aligned: lengths {} and {}",
            x.len(),
            y.len()
        )));
    }
    Ok(())
}

/// Constant path equal to the unconditional sample covariance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleCovariance;

impl CovarianceModel for SampleCovariance {
    fn name(&self) -> &str {
        "sample"
    }

    fn covariance_path(&self, x: &[f64], y: &[f64]) -> RiskResult<CovariancePath> {
        check_aligned(x, y)?;
        let matrix = sample_matrix(x, y)?;
        Ok(CovariancePath::constant(matrix, x.len()))
    }
}

/// Exponentially weighted moving-average covariance (RiskMetrics).
///
/// `Σ_t = λ·Σ_{t−1} + (1 − λ)·r_t·r_tᵗ`, seeded with the sample covariance.
/// The output has one matrix per observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EwmaCovariance {
    /// Decay factor λ in (0, 1).
    #[serde(default = "default_lambda")]
    pub lambda: f64,
}

fn default_lambda() -> f64 {
    0.94
}

impl Default for EwmaCovariance {
    fn default() -> Self {
        Self {
            lambda: default_lambda(),
        }
    }
}

impl EwmaCovariance {
    /// Creates an EWMA source with decay `lambda`.
    pub fn new(lambda: f64) -> RiskResult<Self> {
        let source = Self { lambda };
        source.validate()?;
        Ok(source)
    }

    /// Validates the decay factor.
    pub fn validate(&self) -> RiskResult<()> {
        if self.lambda > 0.0 && self.lambda < 1.0 {
            Ok(())
        } else {
            Err(RiskError::InvalidInput(format!(
                "EWMA decay must lie in (0, 1), got {}",
                self.lambda
            )))
        }
    }
}

impl CovarianceModel for EwmaCovariance {
    fn name(&self) -> &str {
        "ewma"
    }

    fn covariance_path(&self, x: &[f64], y: &[f64]) -> RiskResult<CovariancePath> {
        self.validate()?;
        check_aligned(x, y)?;

        let lambda = self.lambda;
        let mut state = sample_matrix(x, y)?;
        let mut path = Vec::with_capacity(x.len());
        for (&rx, &ry) in x.iter().zip(y) {
            state = Covariance2::new(
                lambda * state.v1 + (1.0 - lambda) * rx * rx,
                lambda * state.c12 + (1.0 - lambda) * rx * ry,
                lambda * state.v2 + (1.0 - lambda) * ry * ry,
            );
            path.push(state);
        }
        Ok(CovariancePath::new(path))
    }
}

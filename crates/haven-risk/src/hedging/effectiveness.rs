//! Hedge ratios, hedging effectiveness and optimal portfolio weights.
//!
//! For each t, with `v1 = Σ_t[1,1]`, `v2 = Σ_t[2,2]`, `c12 = Σ_t[1,2]`:
//!
//! ```text
//! β_t   = c12 / v2
//! HE    = 1 − mean(v1 − c12²/v2) / mean(v1)
//! OPW_t = (v2 − c12) / (v1 − 2·c12 + v2), clipped to [0, 1]
//! OPW   = 1 − mean(OPW_t)
//! ```
//!
//! `OPW_t` is the variance-minimizing weight on the hedged asset, so the
//! reported `OPW` is the average weight on the hedging asset.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::covariance::{CovariancePath, MIN_PATH_LENGTH};
use crate::{RiskError, RiskResult};

/// Summary of conditional hedging performance for one asset pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HedgeSummary {
    /// Time-averaged hedge ratio.
    pub beta_mean: f64,
    /// Smallest hedge ratio on the path.
    pub beta_min: f64,
    /// Largest hedge ratio on the path.
    pub beta_max: f64,
    /// Hedging effectiveness.
    #[serde(rename = "HE")]
    pub hedging_effectiveness: f64,
    /// Average optimal weight on the hedging asset.
    #[serde(rename = "OPW")]
    pub optimal_weight: f64,
}

/// Per-period hedge ratios and clipped optimal weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HedgeRatioPath {
    /// β_t for each t.
    pub betas: Vec<f64>,
    /// Clipped OPW_t (weight on the hedged asset) for each t.
    pub weights: Vec<f64>,
}

fn check_length(path: &CovariancePath) -> RiskResult<()> {
    if path.len() < MIN_PATH_LENGTH {
        return Err(RiskError::InsufficientData {
            required: MIN_PATH_LENGTH,
            actual: path.len(),
        });
    }
    Ok(())
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let n = values.len() as f64;
    values.sum::<f64>() / n
}

/// Computes β_t and the clipped OPW_t along a covariance path.
///
/// # Errors
///
/// - [`RiskError::InsufficientData`] if the path is shorter than
///   [`MIN_PATH_LENGTH`]
/// - [`RiskError::InvalidInput`] naming t (1-based) where an entry of Σ_t is
///   NaN or infinite
/// - [`RiskError::DivisionByZero`] naming t (1-based) where `v2 ≤ 0` or the
///   OPW denominator is zero
pub fn hedge_ratio_path(path: &CovariancePath) -> RiskResult<HedgeRatioPath> {
    check_length(path)?;

    let mut betas = Vec::with_capacity(path.len());
    let mut weights = Vec::with_capacity(path.len());
    let mut clipped = 0usize;

    for (t, cov) in path.iter().enumerate() {
        if !cov.is_finite() {
            return Err(RiskError::InvalidInput(format!(
                "covariance at t = {} is not finite: v1 = {}, c12 = {}, v2 = {}",
                t + 1,
                cov.v1,
                cov.c12,
                cov.v2
            )));
        }
        if cov.v2 <= 0.0 {
            return Err(RiskError::division_by_zero(format!(
                "hedge ratio at t = {}: hedging variance is {}",
                t + 1,
                cov.v2
            )));
        }
        let denominator = cov.v1 - 2.0 * cov.c12 + cov.v2;
        if denominator == 0.0 {
            return Err(RiskError::division_by_zero(format!(
                "optimal weight at t = {}",
                t + 1
            )));
        }

        betas.push(cov.c12 / cov.v2);

        let raw = (cov.v2 - cov.c12) / denominator;
        if !(0.0..=1.0).contains(&raw) {
            clipped += 1;
        }
        weights.push(raw.clamp(0.0, 1.0));
    }

    if clipped > 0 {
        warn!(clipped, total = path.len(), "optimal weights clipped to [0, 1]");
    }

    Ok(HedgeRatioPath { betas, weights })
}

/// Extracts the [`HedgeSummary`] of a covariance path.
///
/// Fails with the same errors as [`hedge_ratio_path`], plus a division by
/// zero if the average unhedged variance is zero.
pub fn hedge_summary(path: &CovariancePath) -> RiskResult<HedgeSummary> {
    let ratios = hedge_ratio_path(path)?;

    let unhedged = mean(path.iter().map(|c| c.v1));
    if unhedged == 0.0 {
        return Err(RiskError::division_by_zero(
            "hedging effectiveness: mean unhedged variance is zero",
        ));
    }
    let hedged = mean(path.iter().map(|c| c.v1 - c.c12 * c.c12 / c.v2));

    let beta_min = ratios.betas.iter().copied().fold(f64::INFINITY, f64::min);
    let beta_max = ratios.betas.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let summary = HedgeSummary {
        beta_mean: mean(ratios.betas.iter().copied()),
        beta_min,
        beta_max,
        hedging_effectiveness: 1.0 - hedged / unhedged,
        optimal_weight: 1.0 - mean(ratios.weights.iter().copied()),
    };
    debug!(
        t = path.len(),
        beta_mean = summary.beta_mean,
        he = summary.hedging_effectiveness,
        opw = summary.optimal_weight,
        "hedge summary"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hedging::Covariance2;
    use approx::assert_relative_eq;

    #[test]
    fn test_constant_path() {
        let (v1, c12, v2) = (0.0004, 0.00005, 0.0001);
        let path = CovariancePath::constant(Covariance2::new(v1, c12, v2), 25);
        let summary = hedge_summary(&path).unwrap();

        assert_eq!(summary.beta_min, c12 / v2);
        assert_eq!(summary.beta_max, c12 / v2);
        assert_relative_eq!(summary.beta_mean, c12 / v2, epsilon = 1e-12);
        assert_relative_eq!(
            summary.hedging_effectiveness,
            1.0 - (v1 - c12 * c12 / v2) / v1,
            epsilon = 1e-12
        );

        // OPW_t = 0.125 lies inside [0, 1], so nothing is clipped
        let w = (v2 - c12) / (v1 - 2.0 * c12 + v2);
        assert_relative_eq!(w, 0.125, epsilon = 1e-12);
        assert_relative_eq!(summary.optimal_weight, 1.0 - w, epsilon = 1e-12);
    }

    #[test]
    fn test_constant_path_with_negative_raw_weight() {
        let (v1, c12, v2) = (0.0004, 0.00012, 0.0001);
        let path = CovariancePath::constant(Covariance2::new(v1, c12, v2), 25);

        let raw = (v2 - c12) / (v1 - 2.0 * c12 + v2);
        assert!(raw < 0.0);

        let summary = hedge_summary(&path).unwrap();
        assert_relative_eq!(summary.optimal_weight, 1.0 - raw.clamp(0.0, 1.0), epsilon = 1e-12);
        assert_relative_eq!(summary.optimal_weight, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_varying_path() {
        let path: CovariancePath = (0..10)
            .map(|t| Covariance2::new(1.0, 0.1 * t as f64, 1.0))
            .collect();
        let summary = hedge_summary(&path).unwrap();
        assert_relative_eq!(summary.beta_min, 0.0, epsilon = 1e-15);
        assert_relative_eq!(summary.beta_max, 0.9, epsilon = 1e-15);
        assert_relative_eq!(summary.beta_mean, 0.45, epsilon = 1e-12);
        // HE = mean(c12²) / mean(v1) = 0.285
        assert_relative_eq!(summary.hedging_effectiveness, 0.285, epsilon = 1e-12);
        // Equal variances: every OPW_t is exactly 1/2
        assert_relative_eq!(summary.optimal_weight, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_optimal_weights_are_clipped() {
        // v2 − c12 < 0 ⇒ raw OPW_t negative ⇒ clipped to 0, hedging weight 1
        let path = CovariancePath::constant(Covariance2::new(4.0, 1.5, 1.0), 10);
        let ratios = hedge_ratio_path(&path).unwrap();
        assert!(ratios.weights.iter().all(|&w| w == 0.0));
        assert_relative_eq!(hedge_summary(&path).unwrap().optimal_weight, 1.0);
    }

    #[test]
    fn test_short_path_rejected() {
        let path = CovariancePath::constant(Covariance2::new(1.0, 0.0, 1.0), 9);
        assert_eq!(
            hedge_summary(&path),
            Err(RiskError::InsufficientData {
                required: 10,
                actual: 9
            })
        );
    }

    #[test]
    fn test_zero_hedging_variance_names_time() {
        let mut matrices = vec![Covariance2::new(1.0, 0.1, 1.0); 12];
        matrices[4].v2 = 0.0;
        let err = hedge_summary(&CovariancePath::new(matrices)).unwrap_err();
        match err {
            RiskError::DivisionByZero { context } => assert!(context.contains("t = 5")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_finite_covariance_names_time() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut matrices = vec![Covariance2::new(1.0, 0.5, 1.0); 12];
            matrices[3].c12 = bad;
            let path = CovariancePath::new(matrices);

            match hedge_summary(&path).unwrap_err() {
                RiskError::InvalidInput(reason) => assert!(reason.contains("t = 4")),
                other => panic!("unexpected error: {other:?}"),
            }
            assert!(hedge_ratio_path(&path).is_err());
        }

        let mut matrices = vec![Covariance2::new(1.0, 0.5, 1.0); 12];
        matrices[0].v1 = f64::NAN;
        assert!(matches!(
            hedge_summary(&CovariancePath::new(matrices)),
            Err(RiskError::InvalidInput(_))
        ));
    }
}

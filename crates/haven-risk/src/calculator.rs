//! Integrated risk calculator for an asset pair.
//!
//! [`PairRiskCalculator`] bundles a hedged and a candidate series with a
//! [`CdbConfig`] and computes every pairwise metric from one place.
//!
//! # Example
//!
//! ```
//! use haven_risk::calculator::PairRiskCalculator;
//! use haven_risk::diversification::CdbConfig;
//! use haven_risk::series::ReturnSeries;
//!
//! let gold: ReturnSeries = vec![0.010, -0.004, 0.007, 0.002, -0.006].into();
//! let equity: ReturnSeries = vec![-0.012, 0.015, 0.004, -0.020, 0.009].into();
//!
//! let calc = PairRiskCalculator::new(gold, equity, CdbConfig::default())?;
//! let metrics = calc.all_metrics()?;
//! println!("CDB at 10%: {:.4}", metrics.cdb.w10);
//! # Ok::<(), haven_risk::RiskError>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::diversification::{cdb, cdb_grid, CdbConfig, CdbGrid};
use crate::hedging::HedgeSummary;
use crate::model::{hedge_summary_from_model, CovarianceModel};
use crate::series::ReturnSeries;
use crate::var::TailRisk;
use crate::RiskResult;

/// Diversification metrics for an asset pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairRiskMetrics {
    /// Tail risk of the candidate asset.
    pub candidate: TailRisk,
    /// Tail risk of the hedged asset.
    pub hedged: TailRisk,
    /// CDB at the fixed grid weights.
    pub cdb: CdbGrid,
}

/// Calculator for pairwise tail-risk metrics.
///
/// The candidate asset is the first ("X") asset of the CDB, the one whose
/// weight is varied.
#[derive(Debug, Clone)]
pub struct PairRiskCalculator {
    candidate: ReturnSeries,
    hedged: ReturnSeries,
    config: CdbConfig,
}

impl PairRiskCalculator {
    /// Creates a calculator, validating both series and the risk level.
    ///
    /// # Errors
    ///
    /// Returns an error if either series has fewer than two finite
    /// observations or the risk level lies outside (0, 1).
    pub fn new(candidate: ReturnSeries, hedged: ReturnSeries, config: CdbConfig) -> RiskResult<Self> {
        candidate.validate("x")?;
        hedged.validate("y")?;
        config.validate()?;
        Ok(Self {
            candidate,
            hedged,
            config,
        })
    }

    /// Tail risk of the candidate asset.
    pub fn candidate_tail_risk(&self) -> RiskResult<TailRisk> {
        TailRisk::normal(self.candidate.moments()?, self.config.risk_level)
    }

    /// Tail risk of the hedged asset.
    pub fn hedged_tail_risk(&self) -> RiskResult<TailRisk> {
        TailRisk::normal(self.hedged.moments()?, self.config.risk_level)
    }

    /// CDB with weight `w` on the candidate asset.
    pub fn cdb(&self, w: f64) -> RiskResult<f64> {
        cdb(&self.candidate, &self.hedged, self.config.risk_level, w)
    }

    /// CDB at the fixed grid weights.
    pub fn cdb_grid(&self) -> RiskResult<CdbGrid> {
        cdb_grid(&self.candidate, &self.hedged, self.config.risk_level)
    }

    /// Hedge summary from a covariance model, hedging the hedged asset with the candidate.
    pub fn hedge_summary<M>(&self, model: &M) -> RiskResult<HedgeSummary>
    where
        M: CovarianceModel + ?Sized,
    {
        hedge_summary_from_model(model, &self.hedged, &self.candidate)
    }

    /// Calculates tail risk and the CDB grid at once.
    pub fn all_metrics(&self) -> RiskResult<PairRiskMetrics> {
        Ok(PairRiskMetrics {
            candidate: self.candidate_tail_risk()?,
            hedged: self.hedged_tail_risk()?,
            cdb: self.cdb_grid()?,
        })
    }

    /// Returns the risk level.
    pub fn risk_level(&self) -> f64 {
        self.config.risk_level
    }
}

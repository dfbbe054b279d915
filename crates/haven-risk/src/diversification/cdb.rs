//! Conditional Diversification Benefit.
//!
//! Portfolio moments use an independence approximation: no covariance term
//! enters the portfolio standard deviation.
//!
//! ```text
//! mean_P = w·mean_x + (1 − w)·mean_y
//! sd_P   = sqrt((w·sd_x)² + ((1 − w)·sd_y)²)
//! CDB    = [w·ES_x + (1 − w)·ES_y − ES_P] / [w·ES_x + (1 − w)·ES_y − VaR_P]
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::parallel::{maybe_parallel_map, BatchConfig};
use crate::series::{MomentPair, ReturnSeries};
use crate::var::{expected_shortfall, validate_risk_level, value_at_risk};
use crate::{RiskError, RiskResult};

/// Fixed weights on the first asset used by [`cdb_grid`].
pub const CDB_GRID_WEIGHTS: [f64; 3] = [0.05, 0.10, 0.20];

/// CDB evaluated at the fixed weights 5%, 10% and 20%.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CdbGrid {
    /// CDB with 5% in the first asset.
    pub w05: f64,
    /// CDB with 10% in the first asset.
    pub w10: f64,
    /// CDB with 20% in the first asset.
    pub w20: f64,
}

impl CdbGrid {
    /// Column keys in grid order.
    pub const KEYS: [&'static str; 3] = ["w05", "w10", "w20"];

    /// Returns the value for a column key.
    pub fn get(&self, key: &str) -> Option<f64> {
        match key {
            "w05" => Some(self.w05),
            "w10" => Some(self.w10),
            "w20" => Some(self.w20),
            _ => None,
        }
    }

    /// Key/value pairs in grid order.
    pub fn entries(&self) -> [(&'static str, f64); 3] {
        [
            (Self::KEYS[0], self.w05),
            (Self::KEYS[1], self.w10),
            (Self::KEYS[2], self.w20),
        ]
    }
}

/// Moments and single-asset ES shared by every weight.
struct CdbInputs {
    x: MomentPair,
    y: MomentPair,
    es_x: f64,
    es_y: f64,
    p: f64,
}

impl CdbInputs {
    fn prepare(x: &ReturnSeries, y: &ReturnSeries, p: f64) -> RiskResult<Self> {
        let x = x.moments()?;
        let y = y.moments()?;
        Ok(Self {
            es_x: expected_shortfall(x.mean, x.std_dev, p)?,
            es_y: expected_shortfall(y.mean, y.std_dev, p)?,
            x,
            y,
            p,
        })
    }

    fn evaluate(&self, w: f64) -> RiskResult<f64> {
        let v = 1.0 - w;
        let mean_p = w * self.x.mean + v * self.y.mean;
        let sx = w * self.x.std_dev;
        let sy = v * self.y.std_dev;
        let sd_p = (sx * sx + sy * sy).sqrt();

        let es_p = expected_shortfall(mean_p, sd_p, self.p)?;
        let var_p = value_at_risk(mean_p, sd_p, self.p)?;

        let weighted_es = w * self.es_x + v * self.es_y;
        let denominator = weighted_es - var_p;
        if denominator == 0.0 {
            return Err(RiskError::division_by_zero(format!(
                "CDB denominator at w = {}",
                w
            )));
        }
        Ok((weighted_es - es_p) / denominator)
    }
}

fn validate_pair(x: &ReturnSeries, y: &ReturnSeries, p: f64) -> RiskResult<()> {
    x.validate("x")?;
    y.validate("y")?;
    validate_risk_level(p)
}

fn validate_weight(w: f64) -> RiskResult<()> {
    if (0.0..=1.0).contains(&w) {
        Ok(())
    } else {
        Err(RiskError::InvalidWeight { value: w })
    }
}

/// Conditional Diversification Benefit at a single weight.
///
/// # Arguments
///
/// * `x` - Returns of the first asset (weight `w`)
/// * `y` - Returns of the second asset (weight `1 − w`)
/// * `p` - Tail probability in (0, 1)
/// * `w` - Weight on `x`, in [0, 1]
///
/// # Errors
///
/// Validation errors name the offending parameter; nothing is computed
/// until every input has been checked.
pub fn cdb(x: &ReturnSeries, y: &ReturnSeries, p: f64, w: f64) -> RiskResult<f64> {
    validate_pair(x, y, p)?;
    validate_weight(w)?;

    let value = CdbInputs::prepare(x, y, p)?.evaluate(w)?;
    debug!(p, w, cdb = value, "computed CDB");
    Ok(value)
}

/// Conditional Diversification Benefit at the weights in [`CDB_GRID_WEIGHTS`].
pub fn cdb_grid(x: &ReturnSeries, y: &ReturnSeries, p: f64) -> RiskResult<CdbGrid> {
    validate_pair(x, y, p)?;

    let inputs = CdbInputs::prepare(x, y, p)?;
    let grid = CdbGrid {
        w05: inputs.evaluate(CDB_GRID_WEIGHTS[0])?,
        w10: inputs.evaluate(CDB_GRID_WEIGHTS[1])?,
        w20: inputs.evaluate(CDB_GRID_WEIGHTS[2])?,
    };
    debug!(p, w05 = grid.w05, w10 = grid.w10, w20 = grid.w20, "computed CDB grid");
    Ok(grid)
}

/// Grid CDB for one candidate asset.
#[derive(Debug, Clone, PartialEq)]
pub struct CdbBatchEntry {
    /// Candidate asset name.
    pub asset: String,
    /// Grid result or the error for this candidate alone.
    pub result: RiskResult<CdbGrid>,
}

/// Grid CDB of each candidate (as `x`) against a common second asset `y`.
///
/// Failures are reported per candidate and never abort the batch.
pub fn cdb_grid_batch(
    candidates: &[(String, ReturnSeries)],
    y: &ReturnSeries,
    p: f64,
    config: &BatchConfig,
) -> Vec<CdbBatchEntry> {
    maybe_parallel_map(candidates, config, |(asset, x)| CdbBatchEntry {
        asset: asset.clone(),
        result: cdb_grid(x, y, p),
    })
}

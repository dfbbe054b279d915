//! Value at Risk (VaR) and Expected Shortfall (ES).
//!
//! Both measures are parametric under a normal approximation and are
//! evaluated on the upper tail of the return distribution itself, using the
//! raw mean and standard deviation of returns (not of losses).

mod parametric;

pub use parametric::*;

use serde::{Deserialize, Serialize};

use crate::series::MomentPair;
use crate::RiskResult;

/// Tail-risk measures at one risk level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TailRisk {
    /// Tail probability p.
    pub risk_level: f64,
    /// Value at Risk.
    pub var: f64,
    /// Expected Shortfall.
    pub es: f64,
}

impl TailRisk {
    /// Computes VaR and ES for the given moments.
    pub fn normal(moments: MomentPair, risk_level: f64) -> RiskResult<Self> {
        Ok(Self {
            risk_level,
            var: value_at_risk(moments.mean, moments.std_dev, risk_level)?,
            es: expected_shortfall(moments.mean, moments.std_dev, risk_level)?,
        })
    }
}

impl std::fmt::Display for TailRisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "VaR({}): {:.6}, ES({}): {:.6}",
            self.risk_level, self.var, self.risk_level, self.es
        )
    }
}

//! Tail-risk diversification analytics.
//!
//! The Conditional Diversification Benefit (CDB) contrasts the
//! Expected-Shortfall reduction of a two-asset portfolio with the gap between
//! weighted single-asset ES and portfolio VaR.

mod cdb;

pub use cdb::*;

use serde::{Deserialize, Serialize};

use crate::var::validate_risk_level;
use crate::RiskResult;

/// Configuration for CDB calculations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CdbConfig {
    /// Tail probability p used for VaR and ES.
    #[serde(default = "default_risk_level")]
    pub risk_level: f64,
}

fn default_risk_level() -> f64 {
    0.05
}

impl Default for CdbConfig {
    fn default() -> Self {
        Self {
            risk_level: default_risk_level(),
        }
    }
}

impl CdbConfig {
    /// Sets the tail probability.
    #[must_use]
    pub fn with_risk_level(mut self, risk_level: f64) -> Self {
        self.risk_level = risk_level;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> RiskResult<()> {
        validate_risk_level(self.risk_level)
    }
}

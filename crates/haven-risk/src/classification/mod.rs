//! Hedge and safe-haven classification of BM10 regression output.
//!
//! An asset is a *hedge* if it is uncorrelated or negatively correlated with
//! the hedged asset on average, and a *safe haven* if it is so in the tails
//! (returns below the 10%, 5% or 1% quantile). Each verdict is the first
//! matching rule of a fixed, priority-ordered list.

mod rules;

pub use rules::{HEDGE_RULES, SAFE_HAVEN_RULES};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::parallel::{maybe_parallel_map, BatchConfig};
use crate::regression::{Bm10Level, Bm10Table};
use crate::{RiskError, RiskResult};

/// Hedge verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HedgeClass {
    /// Significantly negative base coefficient.
    Strong,
    /// Zero or insignificant base coefficient.
    Weak,
    /// Neither.
    None,
}

impl HedgeClass {
    /// Label used in the verdict sentence.
    pub fn label(self) -> &'static str {
        match self {
            Self::Strong => "strong hedge",
            Self::Weak => "weak hedge",
            Self::None => "not a hedge",
        }
    }
}

/// Safe-haven verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafeHavenClass {
    /// Significantly negative at every level.
    Strong,
    /// No significant negative effect at any level.
    Weak,
    /// Significantly negative at the 10% quantile.
    Quantile10,
    /// Significantly negative at the 5% quantile.
    Quantile05,
    /// Significantly negative at the 1% quantile.
    Quantile01,
    /// Neither.
    None,
}

impl SafeHavenClass {
    /// Label used in the verdict sentence.
    pub fn label(self) -> &'static str {
        match self {
            Self::Strong => "strong safe haven",
            Self::Weak => "weak safe haven",
            Self::Quantile10 => "safe haven for 10%",
            Self::Quantile05 => "safe haven for 5%",
            Self::Quantile01 => "safe haven for 1%",
            Self::None => "not a safe haven",
        }
    }
}

/// Combined verdict for one asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Classification {
    /// Hedge verdict.
    pub hedge: HedgeClass,
    /// Safe-haven verdict.
    pub safe_haven: SafeHavenClass,
}

impl Classification {
    /// The fixed verdict sentence.
    pub fn sentence(&self) -> String {
        format!(
            "Selected asset is a {} - {} .",
            self.hedge.label(),
            self.safe_haven.label()
        )
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.sentence())
    }
}

/// Thresholds used by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Coefficients with absolute value at most this are treated as zero.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// A p-value strictly below this is significant.
    #[serde(default = "default_significance")]
    pub significance: f64,
}

fn default_tolerance() -> f64 {
    1e-8
}

fn default_significance() -> f64 {
    0.10
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            significance: default_significance(),
        }
    }
}

impl ClassifierConfig {
    /// Sets the zero tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the significance threshold.
    #[must_use]
    pub fn with_significance(mut self, significance: f64) -> Self {
        self.significance = significance;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> RiskResult<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(RiskError::InvalidInput(format!(
                "tolerance must be finite and non-negative, got {}",
                self.tolerance
            )));
        }
        if !(self.significance > 0.0 && self.significance < 1.0) {
            return Err(RiskError::InvalidInput(format!(
                "significance must lie in (0, 1), got {}",
                self.significance
            )));
        }
        Ok(())
    }

    fn is_zero(&self, value: f64) -> bool {
        value.abs() <= self.tolerance
    }

    fn is_negative(&self, value: f64) -> bool {
        value < -self.tolerance
    }

    fn is_significant(&self, p_value: f64) -> bool {
        p_value < self.significance
    }
}

/// The four (coefficient, p-value) pairs of a complete BM10 table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm10Levels {
    /// Base coefficient and p-value.
    pub c0: (f64, f64),
    /// Cumulative 10% coefficient and p-value.
    pub q10: (f64, f64),
    /// Cumulative 5% coefficient and p-value.
    pub q05: (f64, f64),
    /// Cumulative 1% coefficient and p-value.
    pub q01: (f64, f64),
}

impl Bm10Levels {
    /// Extracts the four levels, failing if any is absent or non-numeric.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::MissingLevels`] naming every missing level.
    pub fn from_table(table: &Bm10Table) -> RiskResult<Self> {
        let missing = table.missing_levels();
        if !missing.is_empty() {
            return Err(RiskError::MissingLevels {
                levels: missing.iter().map(ToString::to_string).collect(),
            });
        }
        let pair = |level: Bm10Level| {
            table
                .get(level)
                .map(|row| (row.coefficient_sum, row.p_value))
                .ok_or_else(|| RiskError::MissingLevels {
                    levels: vec![level.to_string()],
                })
        };
        Ok(Self {
            c0: pair(Bm10Level::Base)?,
            q10: pair(Bm10Level::Quantile10)?,
            q05: pair(Bm10Level::Quantile05)?,
            q01: pair(Bm10Level::Quantile01)?,
        })
    }

    /// Coefficients in level order.
    pub fn coefficients(&self) -> [f64; 4] {
        [self.c0.0, self.q10.0, self.q05.0, self.q01.0]
    }
}

/// Classifies an asset from its BM10 table.
///
/// # Errors
///
/// - [`RiskError::MissingLevels`] if any of the four levels is absent or non-numeric
/// - [`RiskError::InvalidInput`] if the configuration is invalid
pub fn classify(table: &Bm10Table, config: &ClassifierConfig) -> RiskResult<Classification> {
    config.validate()?;
    let levels = Bm10Levels::from_table(table)?;
    let classification = classify_levels(&levels, config);
    debug!(
        hedge = classification.hedge.label(),
        safe_haven = classification.safe_haven.label(),
        "classified asset"
    );
    Ok(classification)
}

/// Classifies a complete set of levels. Never fails.
pub fn classify_levels(levels: &Bm10Levels, config: &ClassifierConfig) -> Classification {
    Classification {
        hedge: rules::first_match(HEDGE_RULES, levels, config).unwrap_or(HedgeClass::None),
        safe_haven: rules::first_match(SAFE_HAVEN_RULES, levels, config)
            .unwrap_or(SafeHavenClass::None),
    }
}

/// Classification result for one named asset.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetClassification {
    /// Asset name.
    pub asset: String,
    /// Verdict or the error for this asset alone.
    pub result: RiskResult<Classification>,
}

/// Classifies many assets. Failures are reported per asset.
pub fn classify_batch(
    tables: &[(String, Bm10Table)],
    config: &ClassifierConfig,
    batch: &BatchConfig,
) -> Vec<AssetClassification> {
    maybe_parallel_map(tables, batch, |(asset, table)| AssetClassification {
        asset: asset.clone(),
        result: classify(table, config),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regression::Bm10Row;

    fn table(rows: [(f64, f64); 4]) -> Bm10Table {
        Bm10Level::ALL
            .into_iter()
            .zip(rows)
            .map(|(level, (c, p))| Bm10Row::new(level, c, p))
            .collect()
    }

    fn run(rows: [(f64, f64); 4]) -> Classification {
        classify(&table(rows), &ClassifierConfig::default()).unwrap()
    }

    #[test]
    fn test_strong_hedge_strong_safe_haven() {
        let c = run([(-0.5, 0.01), (-0.6, 0.01), (-0.7, 0.01), (-0.8, 0.01)]);
        assert_eq!(c.hedge, HedgeClass::Strong);
        assert_eq!(c.safe_haven, SafeHavenClass::Strong);
        assert_eq!(
            c.to_string(),
            "Selected asset is a strong hedge - strong safe haven ."
        );
    }

    #[test]
    fn test_weak_hedge_weak_safe_haven() {
        let c = run([(1e-10, 0.5), (-1e-10, 0.4), (0.0, 0.9), (2e-9, 0.3)]);
        assert_eq!(c.hedge, HedgeClass::Weak);
        assert_eq!(c.safe_haven, SafeHavenClass::Weak);
    }

    #[test]
    fn test_weak_hedge_safe_haven_for_5() {
        // c0 insignificant; tail significant only at 5%
        let c = run([(0.0, 0.02), (0.05, 0.5), (-0.3, 0.03), (-0.1, 0.2)]);
        assert_eq!(c.hedge, HedgeClass::Weak);
        assert_eq!(c.safe_haven, SafeHavenClass::Quantile05);
        assert_eq!(
            c.sentence(),
            "Selected asset is a weak hedge - safe haven for 5% ."
        );
    }

    #[test]
    fn test_safe_haven_priority_10_before_1() {
        let c = run([(0.2, 0.01), (-0.2, 0.05), (0.1, 0.5), (-0.4, 0.01)]);
        assert_eq!(c.safe_haven, SafeHavenClass::Quantile10);
        // cumulative 1% = -0.4 <= max(0.2, 0) but c0 is positive and significant
        assert_eq!(c.hedge, HedgeClass::None);
    }

    #[test]
    fn test_tail_pushes_positive_is_not_a_hedge() {
        let c = run([(-0.3, 0.01), (-0.1, 0.2), (0.1, 0.3), (0.4, 0.04)]);
        assert_eq!(c.hedge, HedgeClass::None);
        assert_eq!(c.safe_haven, SafeHavenClass::None);
    }

    #[test]
    fn test_insignificant_base_makes_weak_safe_haven() {
        // p(c0) >= 0.10 satisfies the weak safe-haven test at every level
        let c = run([(-0.4, 0.15), (-0.5, 0.01), (-0.6, 0.01), (-0.7, 0.01)]);
        assert_eq!(c.hedge, HedgeClass::Weak);
        assert_eq!(c.safe_haven, SafeHavenClass::Weak);
    }

    #[test]
    fn test_safe_haven_for_1() {
        let c = run([(-0.2, 0.01), (-0.1, 0.3), (0.05, 0.6), (-0.5, 0.02)]);
        assert_eq!(c.hedge, HedgeClass::Strong);
        assert_eq!(c.safe_haven, SafeHavenClass::Quantile01);
    }

    #[test]
    fn test_missing_row_is_named() {
        let rows: Bm10Table = vec![
            Bm10Row::new(Bm10Level::Base, -0.5, 0.01),
            Bm10Row::new(Bm10Level::Quantile10, -0.6, 0.01),
            Bm10Row::new(Bm10Level::Quantile05, -0.7, 0.01),
        ]
        .into_iter()
        .collect();
        let err = classify(&rows, &ClassifierConfig::default()).unwrap_err();
        assert_eq!(
            err,
            RiskError::MissingLevels {
                levels: vec!["0.01".into()]
            }
        );
    }

    #[test]
    fn test_configurable_thresholds() {
        let rows = [(-0.5, 0.07), (-0.6, 0.07), (-0.7, 0.07), (-0.8, 0.07)];
        assert_eq!(run(rows).safe_haven, SafeHavenClass::Strong);

        let strict = ClassifierConfig::default().with_significance(0.05);
        let c = classify(&table(rows), &strict).unwrap();
        assert_eq!(c.hedge, HedgeClass::Weak);
        assert_eq!(c.safe_haven, SafeHavenClass::Weak);

        assert!(ClassifierConfig::default()
            .with_significance(1.5)
            .validate()
            .is_err());
        assert!(ClassifierConfig::default()
            .with_tolerance(-1.0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_batch() {
        let tables = vec![
            (
                "GOLD".to_string(),
                table([(-0.5, 0.01), (-0.6, 0.01), (-0.7, 0.01), (-0.8, 0.01)]),
            ),
            ("EMPTY".to_string(), Bm10Table::default()),
        ];
        let out = classify_batch(&tables, &ClassifierConfig::default(), &BatchConfig::default());
        assert_eq!(out[0].asset, "GOLD");
        assert!(out[0].result.is_ok());
        assert_eq!(
            out[1].result,
            Err(RiskError::MissingLevels {
                levels: vec!["c0".into(), "0.10".into(), "0.05".into(), "0.01".into()]
            })
        );
    }
}

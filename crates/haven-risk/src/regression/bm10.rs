//! Baur & McDermott (2010) coefficient table.
//!
//! The mean equation carries a base market-return coefficient and three
//! interaction coefficients for returns below the 10%, 5% and 1% quantiles.
//! Each table level reports the cumulative sum of the base coefficient and
//! every interaction down to that quantile.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use super::{linear_combination, CoefficientEstimate};
use crate::{RiskError, RiskResult};

/// Row keys of a BM10 table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Bm10Level {
    /// Base coefficient.
    #[serde(rename = "c0")]
    Base,
    /// Cumulative coefficient at the 10% quantile.
    #[serde(rename = "0.10")]
    Quantile10,
    /// Cumulative coefficient at the 5% quantile.
    #[serde(rename = "0.05")]
    Quantile05,
    /// Cumulative coefficient at the 1% quantile.
    #[serde(rename = "0.01")]
    Quantile01,
}

impl Bm10Level {
    /// All levels in table order.
    pub const ALL: [Self; 4] = [
        Self::Base,
        Self::Quantile10,
        Self::Quantile05,
        Self::Quantile01,
    ];

    /// Row label as it appears in the table.
    pub fn label(self) -> &'static str {
        match self {
            Self::Base => "c0",
            Self::Quantile10 => "0.10",
            Self::Quantile05 => "0.05",
            Self::Quantile01 => "0.01",
        }
    }

    /// Parses a row label. Numeric labels match by value, so "0.1" is the
    /// 10% level.
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.eq_ignore_ascii_case("c0") {
            return Some(Self::Base);
        }
        let q: f64 = label.parse().ok()?;
        [Self::Quantile10, Self::Quantile05, Self::Quantile01]
            .into_iter()
            .find(|level| level.quantile().is_some_and(|v| (v - q).abs() < 1e-12))
    }

    /// Tail quantile of the level, if any.
    pub fn quantile(self) -> Option<f64> {
        match self {
            Self::Base => None,
            Self::Quantile10 => Some(0.10),
            Self::Quantile05 => Some(0.05),
            Self::Quantile01 => Some(0.01),
        }
    }
}

impl std::fmt::Display for Bm10Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of a BM10 table.
///
/// Null, empty, absent or non-numeric values (such as `NA`) deserialize to
/// NaN so that [`Bm10Table::missing_levels`] can name the level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bm10Row {
    /// Level label ("c0", "0.10", "0.05", "0.01").
    pub level: String,
    /// Cumulative coefficient.
    #[serde(
        rename = "Coefficient_Sum",
        default = "not_available",
        deserialize_with = "number_or_na"
    )]
    pub coefficient_sum: f64,
    /// Two-sided p-value of the cumulative coefficient.
    #[serde(default = "not_available", deserialize_with = "number_or_na")]
    pub p_value: f64,
}

fn not_available() -> f64 {
    f64::NAN
}

fn number_or_na<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Cell {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<Cell>::deserialize(deserializer)? {
        Some(Cell::Number(value)) => value,
        Some(Cell::Text(text)) => text.trim().parse().unwrap_or(f64::NAN),
        None => f64::NAN,
    })
}

impl Bm10Row {
    /// Creates a row for a known level.
    pub fn new(level: Bm10Level, coefficient_sum: f64, p_value: f64) -> Self {
        Self {
            level: level.label().to_string(),
            coefficient_sum,
            p_value,
        }
    }

    fn is_numeric(&self) -> bool {
        self.coefficient_sum.is_finite() && self.p_value.is_finite()
    }
}

/// Level/estimate/p-value table consumed by the classifier.
///
/// Tables read from external sources may be incomplete; completeness is
/// checked when the table is classified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bm10Table {
    rows: Vec<Bm10Row>,
}

impl Bm10Table {
    /// Creates a table from rows in any order.
    pub fn new(rows: Vec<Bm10Row>) -> Self {
        Self { rows }
    }

    /// Rows in stored order.
    pub fn rows(&self) -> &[Bm10Row] {
        &self.rows
    }

    /// The row for `level`, if present.
    pub fn get(&self, level: Bm10Level) -> Option<&Bm10Row> {
        self.rows
            .iter()
            .find(|row| Bm10Level::parse(&row.level) == Some(level))
    }

    /// Levels that are absent or carry a non-numeric value.
    pub fn missing_levels(&self) -> Vec<Bm10Level> {
        Bm10Level::ALL
            .into_iter()
            .filter(|&level| !self.get(level).is_some_and(Bm10Row::is_numeric))
            .collect()
    }
}

impl FromIterator<Bm10Row> for Bm10Table {
    fn from_iter<I: IntoIterator<Item = Bm10Row>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Names of the four BM10 coefficients in a mean-equation estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bm10Terms {
    /// Base market-return coefficient.
    pub base: String,
    /// Interaction with the 10% tail dummy.
    pub q10: String,
    /// Interaction with the 5% tail dummy.
    pub q05: String,
    /// Interaction with the 1% tail dummy.
    pub q01: String,
}

impl Default for Bm10Terms {
    /// Exogenous-regressor names used by GARCH mean equations (`mxreg1`..`mxreg4`).
    fn default() -> Self {
        Self::new("mxreg1", "mxreg2", "mxreg3", "mxreg4")
    }
}

impl Bm10Terms {
    /// Creates a term set.
    pub fn new(
        base: impl Into<String>,
        q10: impl Into<String>,
        q05: impl Into<String>,
        q01: impl Into<String>,
    ) -> Self {
        Self {
            base: base.into(),
            q10: q10.into(),
            q05: q05.into(),
            q01: q01.into(),
        }
    }

    /// Creates a term set from exactly four names in level order.
    pub fn from_slice<S: AsRef<str>>(names: &[S]) -> RiskResult<Self> {
        match names {
            [base, q10, q05, q01] => Ok(Self::new(
                base.as_ref(),
                q10.as_ref(),
                q05.as_ref(),
                q01.as_ref(),
            )),
            _ => Err(RiskError::InvalidInput(format!(
                "BM10 needs exactly 4 term names, got {}",
                names.len()
            ))),
        }
    }

    /// Terms summed for `level`.
    pub fn cumulative(&self, level: Bm10Level) -> Vec<&str> {
        let all = [
            self.base.as_str(),
            self.q10.as_str(),
            self.q05.as_str(),
            self.q01.as_str(),
        ];
        let n = match level {
            Bm10Level::Base => 1,
            Bm10Level::Quantile10 => 2,
            Bm10Level::Quantile05 => 3,
            Bm10Level::Quantile01 => 4,
        };
        all[..n].to_vec()
    }
}

/// Builds the four-row BM10 table from a mean-equation estimate.
///
/// # Errors
///
/// Returns [`RiskError::UnknownTerms`] naming every term absent from the
/// estimate, before any row is computed.
pub fn assemble_bm10(estimate: &CoefficientEstimate, terms: &Bm10Terms) -> RiskResult<Bm10Table> {
    let unknown: Vec<String> = terms
        .cumulative(Bm10Level::Quantile01)
        .into_iter()
        .filter(|name| estimate.index_of(name).is_none())
        .map(str::to_string)
        .collect();
    if !unknown.is_empty() {
        return Err(RiskError::UnknownTerms { terms: unknown });
    }

    let rows = Bm10Level::ALL
        .into_iter()
        .map(|level| {
            let combo = linear_combination(estimate, &terms.cumulative(level))?;
            Ok(Bm10Row::new(level, combo.estimate, combo.p_value))
        })
        .collect::<RiskResult<Vec<_>>>()?;

    debug!(rows = rows.len(), "assembled BM10 table");
    Ok(Bm10Table::new(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::DMatrix;

    fn estimate() -> CoefficientEstimate {
        let names = ["mu", "mxreg1", "mxreg2", "mxreg3", "mxreg4", "omega"]
            .iter()
            .map(|s| (*s).to_string())
            .collect();
        let values = vec![0.0002, -0.05, -0.10, 0.02, -0.30, 1e-6];
        let covariance = DMatrix::from_diagonal(&nalgebra::DVector::from_vec(vec![
            1e-8, 0.0004, 0.0025, 0.0036, 0.0100, 1e-12,
        ]));
        CoefficientEstimate::new(names, values, covariance).unwrap()
    }

    #[test]
    fn test_level_labels() {
        assert_eq!(Bm10Level::parse("c0"), Some(Bm10Level::Base));
        assert_eq!(Bm10Level::parse("0.1"), Some(Bm10Level::Quantile10));
        assert_eq!(Bm10Level::parse(" 0.05 "), Some(Bm10Level::Quantile05));
        assert_eq!(Bm10Level::parse("0.010"), Some(Bm10Level::Quantile01));
        assert_eq!(Bm10Level::parse("0.25"), None);
        assert_eq!(Bm10Level::Quantile01.to_string(), "0.01");
    }

    #[test]
    fn test_assemble_cumulative_sums() {
        let table = assemble_bm10(&estimate(), &Bm10Terms::default()).unwrap();
        assert_eq!(table.rows().len(), 4);

        let labels: Vec<_> = table.rows().iter().map(|r| r.level.as_str()).collect();
        assert_eq!(labels, vec!["c0", "0.10", "0.05", "0.01"]);

        let sums: Vec<_> = table.rows().iter().map(|r| r.coefficient_sum).collect();
        assert_relative_eq!(sums[0], -0.05, epsilon = 1e-15);
        assert_relative_eq!(sums[1], -0.15, epsilon = 1e-15);
        assert_relative_eq!(sums[2], -0.13, epsilon = 1e-15);
        assert_relative_eq!(sums[3], -0.43, epsilon = 1e-15);

        // c0: z = -0.05 / 0.02 = -2.5
        assert_relative_eq!(table.rows()[0].p_value, 0.012_419_330_651_552, epsilon = 1e-9);
        assert!(table.missing_levels().is_empty());
    }

    #[test]
    fn test_assemble_names_unknown_terms() {
        let terms = Bm10Terms::new("mxreg1", "tail10", "mxreg3", "tail01");
        let err = assemble_bm10(&estimate(), &terms).unwrap_err();
        assert_eq!(
            err,
            RiskError::UnknownTerms {
                terms: vec!["tail10".into(), "tail01".into()]
            }
        );
    }

    #[test]
    fn test_missing_levels() {
        let table: Bm10Table = vec![
            Bm10Row::new(Bm10Level::Base, -0.1, 0.01),
            Bm10Row::new(Bm10Level::Quantile10, f64::NAN, 0.01),
            Bm10Row::new(Bm10Level::Quantile05, -0.1, 0.01),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            table.missing_levels(),
            vec![Bm10Level::Quantile10, Bm10Level::Quantile01]
        );
    }

    #[test]
    fn test_terms_from_slice() {
        let terms = Bm10Terms::from_slice(&["a", "b", "c", "d"]).unwrap();
        assert_eq!(terms.cumulative(Bm10Level::Quantile05), vec!["a", "b", "c"]);
        assert!(Bm10Terms::from_slice(&["a", "b"]).is_err());
    }

    #[test]
    fn test_row_serializes_with_table_headers() {
        let row = Bm10Row::new(Bm10Level::Quantile05, -0.2, 0.03);
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["level"], "0.05");
        assert_eq!(json["Coefficient_Sum"], -0.2);
    }

    #[test]
    fn test_non_numeric_rows_deserialize_as_missing() {
        let table: Bm10Table = serde_json::from_str(
            r#"[
                {"level": "c0", "Coefficient_Sum": -0.5, "p_value": 0.01},
                {"level": "0.10", "Coefficient_Sum": -0.6, "p_value": "0.02"},
                {"level": "0.05", "Coefficient_Sum": "NA", "p_value": 0.01},
                {"level": "0.01", "Coefficient_Sum": null, "p_value": 0.01}
            ]"#,
        )
        .unwrap();

        assert_relative_eq!(table.get(Bm10Level::Quantile10).unwrap().p_value, 0.02);
        assert_eq!(
            table.missing_levels(),
            vec![Bm10Level::Quantile05, Bm10Level::Quantile01]
        );
    }

    #[test]
    fn test_absent_value_deserializes_as_missing() {
        let row: Bm10Row = serde_json::from_str(r#"{"level": "0.01", "p_value": 0.2}"#).unwrap();
        assert!(row.coefficient_sum.is_nan());
        assert!(!row.is_numeric());
    }
}

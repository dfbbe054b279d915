//! Return series and their moments.

use serde::{Deserialize, Serialize};

use haven_math::statistics::{finite_values, mean, sample_std_dev};

use crate::{RiskError, RiskResult};

/// Tokens read as a missing observation when parsing text input.
pub const MISSING_TOKENS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL"];

/// An ordered sequence of (daily log) returns.
///
/// Missing observations are stored as `NaN` and are excluded by every
/// statistic computed from the series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReturnSeries {
    values: Vec<f64>,
}

impl ReturnSeries {
    /// Creates a series from raw values. Non-finite values count as missing.
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Creates a series where `None` marks a missing observation.
    pub fn from_options<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        Self {
            values: values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect(),
        }
    }

    /// Parses a series from text tokens.
    ///
    /// Tokens in [`MISSING_TOKENS`] become missing observations; any other
    /// token that does not parse as a number is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::InvalidSeries`] naming `name` and the position of
    /// the first non-numeric token.
    pub fn parse<S: AsRef<str>>(name: &str, tokens: &[S]) -> RiskResult<Self> {
        let mut values = Vec::with_capacity(tokens.len());
        for (i, token) in tokens.iter().enumerate() {
            let token = token.as_ref().trim();
            if MISSING_TOKENS.contains(&token) {
                values.push(f64::NAN);
                continue;
            }
            let value = token.parse::<f64>().map_err(|_| {
                RiskError::invalid_series(
                    name,
                    format!("non-numeric value '{}' at position {}", token, i + 1),
                )
            })?;
            values.push(value);
        }
        Ok(Self { values })
    }

    /// Raw values including missing observations.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Length including missing observations.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the series holds no values at all.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of non-missing observations.
    pub fn observations(&self) -> usize {
        self.values.iter().filter(|v| v.is_finite()).count()
    }

    /// Non-missing observations in order.
    pub fn complete(&self) -> Vec<f64> {
        finite_values(&self.values)
    }

    /// Checks that the series can support a mean and sample standard deviation.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::InvalidSeries`] naming `name` when fewer than two
    /// observations remain after dropping missing values.
    pub fn validate(&self, name: &str) -> RiskResult<()> {
        if self.is_empty() {
            return Err(RiskError::invalid_series(name, "series is empty"));
        }
        let n = self.observations();
        if n < 2 {
            return Err(RiskError::invalid_series(
                name,
                format!("need at least 2 non-missing observations, got {}", n),
            ));
        }
        Ok(())
    }

    /// Mean and sample standard deviation of the non-missing observations.
    pub fn moments(&self) -> RiskResult<MomentPair> {
        MomentPair::from_values(&self.values)
    }
}

impl From<Vec<f64>> for ReturnSeries {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

impl From<&[f64]> for ReturnSeries {
    fn from(values: &[f64]) -> Self {
        Self::new(values.to_vec())
    }
}

impl FromIterator<f64> for ReturnSeries {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Plug-in mean and sample standard deviation of a return series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MomentPair {
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation (Bessel-corrected).
    pub std_dev: f64,
}

impl MomentPair {
    /// Creates a moment pair from known values.
    pub fn new(mean: f64, std_dev: f64) -> Self {
        Self { mean, std_dev }
    }

    /// Computes the moments of the finite values in `values`.
    pub fn from_values(values: &[f64]) -> RiskResult<Self> {
        Ok(Self {
            mean: mean(values)?,
            std_dev: sample_std_dev(values)?,
        })
    }
}

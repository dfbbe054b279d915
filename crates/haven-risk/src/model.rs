//! Capability interfaces for the external estimation models.
//!
//! Haven never fits a model. A dynamic-correlation model supplies the
//! covariance path and a mean-equation model supplies the BM10 coefficients;
//! any estimation library can be plugged in by implementing these traits.

use tracing::debug;

use haven_math::statistics::pairwise_complete;

use crate::classification::{classify, Classification, ClassifierConfig};
use crate::hedging::{hedge_summary, CovariancePath, HedgeSummary, MIN_PATH_LENGTH};
use crate::regression::{assemble_bm10, Bm10Table, Bm10Terms, CoefficientEstimate};
use crate::series::ReturnSeries;
use crate::{RiskError, RiskResult};

/// Produces a conditional 2×2 covariance path for two aligned series.
///
/// `x` is the hedged asset (Σ[1,1]) and `y` the hedging asset (Σ[2,2]).
/// Inputs are pairwise-complete and of equal length.
pub trait CovarianceModel: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Returns one covariance matrix per observation.
    fn covariance_path(&self, x: &[f64], y: &[f64]) -> RiskResult<CovariancePath>;
}

/// Fits the BM10 mean equation of a hedging asset on a hedged asset.
pub trait MeanEquationModel: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Returns the coefficient vector and its covariance matrix.
    fn fit(&self, hedging: &[f64], hedged: &[f64]) -> RiskResult<CoefficientEstimate>;
}

/// Aligns two series pairwise-complete and enforces the minimum overlap.
fn aligned(a: &ReturnSeries, b: &ReturnSeries) -> RiskResult<(Vec<f64>, Vec<f64>)> {
    let (a, b) = pairwise_complete(a.values(), b.values());
    if a.len() < MIN_PATH_LENGTH {
        return Err(RiskError::InsufficientData {
            required: MIN_PATH_LENGTH,
            actual: a.len(),
        });
    }
    Ok((a, b))
}

/// Fits `model` on the overlapping observations of two series and extracts
/// the hedge summary.
///
/// The overlap check runs before the model is called.
pub fn hedge_summary_from_model<M>(
    model: &M,
    hedged: &ReturnSeries,
    hedging: &ReturnSeries,
) -> RiskResult<HedgeSummary>
where
    M: CovarianceModel + ?Sized,
{
    let (x, y) = aligned(hedged, hedging)?;
    debug!(model = model.name(), observations = x.len(), "fitting covariance path");
    let path = model.covariance_path(&x, &y)?;
    if path.len() != x.len() {
        return Err(RiskError::Model(format!(
            "{} returned {} matrices for {} observations",
            model.name(),
            path.len(),
            x.len()
        )));
    }
    hedge_summary(&path)
}

/// Fits `model` and assembles the BM10 table from its coefficients.
pub fn bm10_from_model<M>(
    model: &M,
    hedging: &ReturnSeries,
    hedged: &ReturnSeries,
    terms: &Bm10Terms,
) -> RiskResult<Bm10Table>
where
    M: MeanEquationModel + ?Sized,
{
    let (y, x) = aligned(hedging, hedged)?;
    debug!(model = model.name(), observations = y.len(), "fitting mean equation");
    let estimate = model.fit(&y, &x)?;
    assemble_bm10(&estimate, terms)
}

/// Fits `model`, assembles the BM10 table and classifies it.
pub fn classify_from_model<M>(
    model: &M,
    hedging: &ReturnSeries,
    hedged: &ReturnSeries,
    terms: &Bm10Terms,
    config: &ClassifierConfig,
) -> RiskResult<Classification>
where
    M: MeanEquationModel + ?Sized,
{
    let table = bm10_from_model(model, hedging, hedged, terms)?;
    classify(&table, config)
}

//! # Haven Risk
//!
//! Hedge, safe-haven and diversification analytics for pairs of assets.
//!
//! This crate provides:
//!
//! - **Tail risk**: parametric-normal VaR and Expected Shortfall
//! - **Diversification**: Conditional Diversification Benefit (CDB), point, grid and batch
//! - **Regression post-processing**: linear combinations of coefficients and BM10 tables
//! - **Hedging**: hedge ratios, hedging effectiveness and optimal portfolio weights from a
//!   conditional covariance path
//! - **Classification**: strong/weak hedge and safe-haven verdicts
//!
//! ## Design Philosophy
//!
//! - **No estimation**: covariance paths and regression coefficients come from external
//!   models plugged in through [`model::CovarianceModel`] and [`model::MeanEquationModel`]
//! - **Pure functions**: every calculation is deterministic over its explicit inputs
//! - **Config-driven parallelism**: optional rayon support for batch calls
//!
//! ## Example
//!
//! ```
//! use haven_risk::prelude::*;
//!
//! let gold: ReturnSeries = vec![0.010, -0.004, 0.007, 0.002, -0.006].into();
//! let equity: ReturnSeries = vec![-0.012, 0.015, 0.004, -0.020, 0.009].into();
//!
//! let grid = cdb_grid(&gold, &equity, 0.05)?;
//! println!("w05 = {:.4}, w10 = {:.4}, w20 = {:.4}", grid.w05, grid.w10, grid.w20);
//! # Ok::<(), RiskError>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel`: Enable rayon-based parallel processing for batch calls

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]

pub mod calculator;
pub mod classification;
pub mod diversification;
mod error;
pub mod hedging;
pub mod model;
pub mod parallel;
pub mod regression;
pub mod series;
pub mod var;

pub use error::{RiskError, RiskResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::calculator::{PairRiskCalculator, PairRiskMetrics};
    pub use crate::classification::{
        classify, classify_batch, Classification, ClassifierConfig, HedgeClass, SafeHavenClass,
    };
    pub use crate::diversification::{cdb, cdb_grid, cdb_grid_batch, CdbConfig, CdbGrid};
    pub use crate::hedging::{
        hedge_ratio_path, hedge_summary, Covariance2, CovariancePath, EwmaCovariance,
        HedgeSummary, SampleCovariance,
    };
    pub use crate::model::{
        bm10_from_model, classify_from_model, hedge_summary_from_model, CovarianceModel,
        MeanEquationModel,
    };
    pub use crate::parallel::BatchConfig;
    pub use crate::regression::{
        assemble_bm10, linear_combination, Bm10Level, Bm10Table, Bm10Terms, CoefficientEstimate,
        LinComboResult,
    };
    pub use crate::series::{MomentPair, ReturnSeries};
    pub use crate::var::{expected_shortfall, value_at_risk, TailRisk};
    pub use crate::{RiskError, RiskResult};
}

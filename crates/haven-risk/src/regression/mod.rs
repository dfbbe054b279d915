//! Post-processing of mean-equation regression output.
//!
//! The regression itself (hedging-asset returns on hedged-asset returns plus
//! tail-quantile interaction dummies) is fitted elsewhere; this module only
//! consumes its coefficient vector and covariance matrix.

mod bm10;
mod estimate;
mod lincom;

pub use bm10::*;
pub use estimate::*;
pub use lincom::*;

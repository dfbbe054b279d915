//! Conditional hedging analytics from a time-varying covariance path.
//!
//! Asset 1 is the hedged asset and asset 2 the hedging asset throughout:
//! `Σ_t[1,1]` is the hedged variance, `Σ_t[2,2]` the hedging variance.

mod covariance;
mod effectiveness;
mod sources;

pub use covariance::*;
pub use effectiveness::*;
pub use sources::*;

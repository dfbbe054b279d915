//! # Haven Math
//!
//! Numerical primitives for the Haven hedge and safe-haven analytics library.
//!
//! This crate provides:
//!
//! - **Distributions**: Standard normal density, CDF and quantile
//! - **Statistics**: NA-aware moments and pairwise-complete covariance
//! - **Linear Algebra**: Quadratic forms over coefficient covariance matrices
//!
//! ## Design Philosophy
//!
//! - **Explicit missing data**: NaN and infinite values are treated as missing and
//!   dropped before any statistic is computed
//! - **No hidden state**: every function is pure over its inputs

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::uninlined_format_args)]

pub mod distributions;
pub mod error;
pub mod linear_algebra;
pub mod statistics;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::distributions::{norm_cdf, norm_pdf, norm_ppf, two_sided_p_value};
    pub use crate::error::{MathError, MathResult};
    pub use crate::linear_algebra::{quadratic_form, selector_variance};
    pub use crate::statistics::{
        finite_values, mean, pairwise_complete, sample_covariance, sample_std_dev,
    };
}

pub use error::{MathError, MathResult};

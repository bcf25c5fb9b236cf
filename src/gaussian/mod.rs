//! Gaussian arithmetic and normal distribution primitives
//!
//! This module provides the canonical-parameter Gaussian used for every
//! belief and message in the factor graph, together with the error-function
//! based cdf/pdf/ppf of the standard normal.

pub mod canonical;
pub mod erfc;
pub mod normal;

// Re-export commonly used types
pub use canonical::{log_prod_norm, log_ratio_norm, Gaussian};
pub use normal::{cdf, pdf, ppf};

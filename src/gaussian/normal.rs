//! Standard normal distribution functions

use super::erfc::{erfc, inv_erfc, INV_SQRT_2PI};
use std::f64::consts::SQRT_2;

/// Cumulative distribution function of the standard normal at `t`.
pub fn cdf(t: f64) -> f64 {
    erfc(-t / SQRT_2) / 2.0
}

/// Probability density function of the standard normal at `t`.
pub fn pdf(t: f64) -> f64 {
    INV_SQRT_2PI * (-(t * t / 2.0)).exp()
}

/// Percent point function (inverse of [`cdf`]) at probability `p`.
pub fn ppf(p: f64) -> f64 {
    -SQRT_2 * inv_erfc(2.0 * p)
}

//! Moment-matching corrections for truncated unit Gaussians
//!
//! `v` is the additive (mean) correction and `w` the multiplicative
//! (variance) correction when a standard Gaussian, standardised at `t`, is
//! truncated to exceed the margin `epsilon` or to stay within `[-epsilon, epsilon]`.

use crate::gaussian::{cdf, pdf};

/// Smallest normalising denominator handled analytically.
const MIN_DENOMINATOR: f64 = 2.222_758_749e-162;

/// Mean correction for `x > epsilon`.
pub fn v_greater_than(t: f64, epsilon: f64) -> f64 {
    let denominator = cdf(t - epsilon);
    if denominator < MIN_DENOMINATOR {
        return -t + epsilon;
    }

    pdf(t - epsilon) / denominator
}

/// Variance correction for `x > epsilon`.
pub fn w_greater_than(t: f64, epsilon: f64) -> f64 {
    let denominator = cdf(t - epsilon);
    if denominator < MIN_DENOMINATOR {
        return if t < 0.0 { 1.0 } else { 0.0 };
    }

    let v = v_greater_than(t, epsilon);
    v * (v + t - epsilon)
}

/// Mean correction for `|x| <= epsilon`.
pub fn v_within(t: f64, epsilon: f64) -> f64 {
    let magnitude = t.abs();
    let denominator = cdf(epsilon - magnitude) - cdf(-epsilon - magnitude);
    if denominator < MIN_DENOMINATOR {
        return if t < 0.0 { -t - epsilon } else { -t + epsilon };
    }

    let numerator = pdf(-epsilon - magnitude) - pdf(epsilon - magnitude);
    if t < 0.0 {
        -numerator / denominator
    } else {
        numerator / denominator
    }
}

/// Variance correction for `|x| <= epsilon`.
pub fn w_within(t: f64, epsilon: f64) -> f64 {
    let magnitude = t.abs();
    let denominator = cdf(epsilon - magnitude) - cdf(-epsilon - magnitude);
    if denominator < MIN_DENOMINATOR {
        return 1.0;
    }

    let v = v_within(t, epsilon);
    let upper = epsilon - magnitude;
    let lower = -epsilon - magnitude;
    v * v + (upper * pdf(upper) - lower * pdf(lower)) / denominator
}

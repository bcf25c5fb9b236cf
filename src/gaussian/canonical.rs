//! Gaussian distributions in canonical (natural) parameters
//!
//! A Gaussian is stored as its precision-adjusted mean `pi = mu / sigma^2`
//! and precision `tau = 1 / sigma^2`. Products and quotients of independent
//! Gaussian densities then reduce to sums and differences of the parameters.

use super::erfc::LOG_SQRT_2PI;
use serde::{Deserialize, Serialize};
use std::ops::{Div, Mul};

/// Gaussian belief in canonical form. Zero precision is an improper, flat belief.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Gaussian {
    /// Precision-adjusted mean (mu / sigma^2)
    pub precision_mean: f64,
    /// Precision (1 / sigma^2)
    pub precision: f64,
}

impl Gaussian {
    /// The flat belief with zero precision.
    pub const UNIFORM: Gaussian = Gaussian {
        precision_mean: 0.0,
        precision: 0.0,
    };

    pub fn from_precision(precision_mean: f64, precision: f64) -> Self {
        Self {
            precision_mean,
            precision,
        }
    }

    pub fn from_mean_and_variance(mean: f64, variance: f64) -> Self {
        Self::from_precision(mean / variance, 1.0 / variance)
    }

    pub fn from_mean_and_std_dev(mean: f64, std_dev: f64) -> Self {
        Self::from_mean_and_variance(mean, std_dev * std_dev)
    }

    pub fn mean(&self) -> f64 {
        self.precision_mean / self.precision
    }

    pub fn variance(&self) -> f64 {
        1.0 / self.precision
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Convergence distance: `max(|d(pi)|, sqrt(|d(tau)|))`.
    ///
    /// Not a metric; only used to decide when message passing has settled.
    pub fn distance(&self, other: &Gaussian) -> f64 {
        let precision_mean = (self.precision_mean - other.precision_mean).abs();
        let precision = (self.precision - other.precision).abs().sqrt();
        precision_mean.max(precision)
    }
}

impl Mul for Gaussian {
    type Output = Gaussian;

    fn mul(self, rhs: Gaussian) -> Gaussian {
        Gaussian::from_precision(
            self.precision_mean + rhs.precision_mean,
            self.precision + rhs.precision,
        )
    }
}

impl Div for Gaussian {
    type Output = Gaussian;

    fn div(self, rhs: Gaussian) -> Gaussian {
        Gaussian::from_precision(
            self.precision_mean - rhs.precision_mean,
            self.precision - rhs.precision,
        )
    }
}

/// Log of the normalizing constant of the product of two Gaussian densities.
///
/// Zero when either side is flat.
pub fn log_prod_norm(a: &Gaussian, b: &Gaussian) -> f64 {
    if a.precision == 0.0 || b.precision == 0.0 {
        return 0.0;
    }

    let variance_sum = a.variance() + b.variance();
    let mean_diff = a.mean() - b.mean();

    -LOG_SQRT_2PI - variance_sum.ln() / 2.0 - mean_diff * mean_diff / (2.0 * variance_sum)
}

/// Log of the normalizing constant of the ratio of two Gaussian densities.
///
/// Zero when either side is flat or the variances coincide.
pub fn log_ratio_norm(a: &Gaussian, b: &Gaussian) -> f64 {
    if a.precision == 0.0 || b.precision == 0.0 {
        return 0.0;
    }

    let b_variance = b.variance();
    let variance_diff = b_variance - a.variance();
    if variance_diff == 0.0 {
        return 0.0;
    }

    let mean_diff = a.mean() - b.mean();
    b_variance.ln() + LOG_SQRT_2PI - variance_diff.ln() / 2.0
        + mean_diff * mean_diff / (2.0 * variance_diff)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * (1.0 + a.abs().max(b.abs()))
    }

    fn gaussian() -> impl Strategy<Value = Gaussian> {
        (-100.0..100.0f64, 0.001..50.0f64).prop_map(|(pm, p)| Gaussian::from_precision(pm, p))
    }

    #[test]
    fn test_derived_moments() {
        let g = Gaussian::from_mean_and_std_dev(25.0, 25.0 / 3.0);
        assert!((g.mean() - 25.0).abs() < 1e-12);
        assert!((g.std_dev() - 25.0 / 3.0).abs() < 1e-12);
        assert!((g.variance() - 625.0 / 9.0).abs() < 1e-9);
        assert!((g.precision - 9.0 / 625.0).abs() < 1e-15);
    }

    #[test]
    fn test_mul_and_div() {
        let a = Gaussian::from_precision(1.0, 2.0);
        let b = Gaussian::from_precision(0.5, 0.25);
        assert_eq!(a * b, Gaussian::from_precision(1.5, 2.25));
        assert_eq!(a / b, Gaussian::from_precision(0.5, 1.75));
        assert_eq!(a * Gaussian::UNIFORM, a);
    }

    #[test]
    fn test_distance_is_asymmetric_in_parameters() {
        let a = Gaussian::from_precision(1.0, 4.0);
        let b = Gaussian::from_precision(1.5, 0.0);
        // sqrt(|4 - 0|) dominates the 0.5 shift in precision mean
        assert_eq!(a.distance(&b), 2.0);
        assert_eq!(b.distance(&a), 2.0);
        assert_eq!(a.distance(&a), 0.0);
    }

    #[test]
    fn test_log_norms_flat_inputs() {
        let g = Gaussian::from_mean_and_variance(3.0, 2.0);
        assert_eq!(log_prod_norm(&g, &Gaussian::UNIFORM), 0.0);
        assert_eq!(log_prod_norm(&Gaussian::UNIFORM, &g), 0.0);
        assert_eq!(log_ratio_norm(&g, &Gaussian::UNIFORM), 0.0);
        assert_eq!(log_ratio_norm(&Gaussian::UNIFORM, &g), 0.0);
    }

    #[test]
    fn test_log_ratio_norm_equal_variances() {
        let a = Gaussian::from_mean_and_variance(1.0, 4.0);
        let b = Gaussian::from_mean_and_variance(-2.0, 4.0);
        assert_eq!(log_ratio_norm(&a, &b), 0.0);
    }

    #[test]
    fn test_log_prod_norm_value() {
        // Two standard normals: N(0; 0, 2) = 1 / sqrt(4 pi)
        let a = Gaussian::from_mean_and_variance(0.0, 1.0);
        let expected = -(4.0 * std::f64::consts::PI).sqrt().ln();
        assert!((log_prod_norm(&a, &a) - expected).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn prop_mul_then_div_round_trips(a in gaussian(), b in gaussian()) {
            let back = (a * b) / b;
            prop_assert!(close(back.precision_mean, a.precision_mean));
            prop_assert!(close(back.precision, a.precision));
        }

        #[test]
        fn prop_mul_commutes(a in gaussian(), b in gaussian()) {
            prop_assert_eq!(a * b, b * a);
        }

        #[test]
        fn prop_mul_associates(a in gaussian(), b in gaussian(), c in gaussian()) {
            let left = (a * b) * c;
            let right = a * (b * c);
            prop_assert!(close(left.precision_mean, right.precision_mean));
            prop_assert!(close(left.precision, right.precision));
        }

        #[test]
        fn prop_log_prod_norm_symmetric(a in gaussian(), b in gaussian()) {
            prop_assert_eq!(log_prod_norm(&a, &b), log_prod_norm(&b, &a));
        }
    }
}

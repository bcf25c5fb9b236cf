//! Closed-form match quality

use crate::types::PlayerRating;

/// Likelihood of a draw between two players relative to two identical
/// players, in `(0, 1]`. Higher means a fairer pairing.
pub fn match_quality(beta: f64, a: &PlayerRating, b: &PlayerRating) -> f64 {
    let two_beta_squared = 2.0 * beta * beta;
    let spread = two_beta_squared + a.variance() + b.variance();
    let mean_delta = a.rating - b.rating;

    (two_beta_squared / spread).sqrt() * (-(mean_delta * mean_delta) / (2.0 * spread)).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BETA: f64 = 25.0 / 6.0;

    #[test]
    fn test_default_players() {
        let player = PlayerRating::default();
        let quality = match_quality(BETA, &player, &player);
        assert!((quality - 0.447_213_6).abs() < 1e-6, "{quality}");
    }

    #[test]
    fn test_symmetric() {
        let a = PlayerRating::new(30.0, 4.0);
        let b = PlayerRating::new(22.0, 6.0);
        assert_eq!(match_quality(BETA, &a, &b), match_quality(BETA, &b, &a));
    }

    #[test]
    fn test_skill_gap_lowers_quality() {
        let a = PlayerRating::new(25.0, 3.0);
        let close = PlayerRating::new(26.0, 3.0);
        let far = PlayerRating::new(40.0, 3.0);
        assert!(match_quality(BETA, &a, &close) > match_quality(BETA, &a, &far));
    }

    #[test]
    fn test_certain_equal_players_approach_one() {
        let a = PlayerRating::new(25.0, 1e-6);
        assert!((match_quality(BETA, &a, &a) - 1.0).abs() < 1e-9);
    }
}

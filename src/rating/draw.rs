//! Conversion between draw probability and draw margin

use crate::gaussian::{cdf, ppf};

/// Performance-difference margin below which a pairing counts as a draw.
///
/// `players` is the total number of players on both sides of the pairing.
pub fn draw_margin(beta: f64, draw_probability: f64, players: usize) -> f64 {
    -((players as f64) * beta * beta).sqrt() * ppf((1.0 - draw_probability) / 2.0)
}

/// Draw probability implied by a draw margin; inverse of [`draw_margin`].
pub fn draw_probability(beta: f64, draw_margin: f64, players: usize) -> f64 {
    2.0 * cdf(draw_margin / ((players as f64).sqrt() * beta)) - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const BETA: f64 = 25.0 / 6.0;

    #[test]
    fn test_default_draw_margin() {
        let margin = draw_margin(BETA, 0.1, 2);
        assert!((margin - 0.740_466_587_452_147).abs() < 1e-9, "{margin}");
    }

    #[test]
    fn test_zero_draw_probability_has_zero_margin() {
        assert!(draw_margin(BETA, 0.0, 2).abs() < 1e-12);
    }

    #[test]
    fn test_round_trip() {
        for &p in &[0.0, 0.01, 0.1, 0.25, 0.5, 0.9] {
            for players in 2..5 {
                let margin = draw_margin(BETA, p, players);
                let back = draw_probability(BETA, margin, players);
                assert!((back - p).abs() < 1e-9, "p={p} players={players} back={back}");
            }
        }
    }

    #[test]
    fn test_margin_grows_with_probability() {
        assert!(draw_margin(BETA, 0.2, 2) > draw_margin(BETA, 0.1, 2));
        assert!(draw_margin(BETA, 0.1, 4) > draw_margin(BETA, 0.1, 2));
    }
}

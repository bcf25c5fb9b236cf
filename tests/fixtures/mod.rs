//! Shared helpers for integration testing

#![allow(dead_code)]

use std::sync::Once;
use trueskill_graph::{PlayerId, PlayerRating, TrueSkillConfig};

/// Absolute tolerance used for the published reference values
pub const EPSILON: f64 = 1e-4;

static TRACING: Once = Once::new();

/// Install an `EnvFilter` driven subscriber once per test binary.
///
/// `RUST_LOG=trueskill_graph=trace cargo test` shows every loop pass.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "warn".into()),
            )
            .with_test_writer()
            .with_target(false)
            .try_init();
    });
}

pub fn assert_close(actual: f64, expected: f64, epsilon: f64, what: &str) {
    assert!(
        (actual - expected).abs() <= epsilon,
        "{what}: got {actual}, want {expected} (+/- {epsilon})"
    );
}

/// Compare `(mu, sigma)` pairs against a flat `[mu0, sigma0, mu1, sigma1, ..]` list.
pub fn assert_ratings(actual: &[PlayerRating], expected: &[f64], epsilon: f64) {
    assert_eq!(actual.len() * 2, expected.len(), "player count");
    for (i, rating) in actual.iter().enumerate() {
        assert_close(rating.rating, expected[2 * i], epsilon, &format!("p{i} mu"));
        assert_close(
            rating.uncertainty,
            expected[2 * i + 1],
            epsilon,
            &format!("p{i} sigma"),
        );
    }
}

/// Fresh players with the configuration's default rating.
pub fn new_players(config: &TrueSkillConfig, count: usize) -> Vec<PlayerRating> {
    vec![config.default_rating(); count]
}

/// Named roster for the rank-based interface.
pub fn roster(ratings: &[PlayerRating]) -> Vec<(PlayerId, PlayerRating)> {
    ratings
        .iter()
        .enumerate()
        .map(|(i, rating)| (format!("player{}", i + 1), *rating))
        .collect()
}

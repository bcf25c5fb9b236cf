//! TrueSkill model configuration
//!
//! Defaults follow the classic parameterisation (mu = 25, sigma = mu / 3,
//! beta = sigma / 2, tau = sigma / 100, 10% draws). Values can be overridden
//! from environment variables or a TOML document.

use crate::error::SkillError;
use crate::rating::draw::draw_margin;
use crate::types::PlayerRating;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

pub const DEFAULT_MU: f64 = 25.0;
pub const DEFAULT_SIGMA: f64 = DEFAULT_MU / 3.0;
pub const DEFAULT_BETA: f64 = DEFAULT_SIGMA * 0.5;
pub const DEFAULT_TAU: f64 = DEFAULT_SIGMA * 0.01;
pub const DEFAULT_DRAW_PROBABILITY: f64 = 0.1;
/// Desired accuracy of the factor graph convergence loop
pub const DEFAULT_LOOP_MAX_DELTA: f64 = 1e-4;

/// TrueSkill model parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrueSkillConfig {
    /// Mean skill of a new player
    pub mu: f64,
    /// Skill uncertainty of a new player
    pub sigma: f64,
    /// Performance noise (length of the skill chain)
    pub beta: f64,
    /// Additive skill dynamics applied before every match
    pub tau: f64,
    /// Probability of a draw between two equal players, as a fraction
    pub draw_probability: f64,
    /// Convergence threshold for the iterative schedule
    pub loop_max_delta: f64,
    /// Optional cap on convergence-loop passes; `None` runs to convergence
    pub max_loop_iterations: Option<usize>,
}

impl Default for TrueSkillConfig {
    fn default() -> Self {
        Self {
            mu: DEFAULT_MU,
            sigma: DEFAULT_SIGMA,
            beta: DEFAULT_BETA,
            tau: DEFAULT_TAU,
            draw_probability: DEFAULT_DRAW_PROBABILITY,
            loop_max_delta: DEFAULT_LOOP_MAX_DELTA,
            max_loop_iterations: None,
        }
    }
}

fn percent_to_fraction(draw_probability_percent: f64) -> Result<f64> {
    if !(0.0..100.0).contains(&draw_probability_percent) {
        return Err(SkillError::ConfigurationError {
            message: format!(
                "Draw probability must be in [0, 100), got {}",
                draw_probability_percent
            ),
        }
        .into());
    }
    Ok(draw_probability_percent / 100.0)
}

fn env_override<T: FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| anyhow!("Invalid {} value: {}", name, value)),
        Err(_) => Ok(None),
    }
}

impl TrueSkillConfig {
    /// Create a configuration from explicit values; the draw probability is
    /// given in percent.
    pub fn new(
        mu: f64,
        sigma: f64,
        beta: f64,
        tau: f64,
        draw_probability_percent: f64,
    ) -> Result<Self> {
        let config = Self {
            mu,
            sigma,
            beta,
            tau,
            draw_probability: percent_to_fraction(draw_probability_percent)?,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Default model with a custom draw probability in percent.
    pub fn with_draw_probability(draw_probability_percent: f64) -> Result<Self> {
        Ok(Self {
            draw_probability: percent_to_fraction(draw_probability_percent)?,
            ..Self::default()
        })
    }

    /// Default model for games that cannot end in a draw.
    pub fn no_draws() -> Self {
        Self {
            draw_probability: 0.0,
            ..Self::default()
        }
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: &str| -> Result<()> {
            Err(SkillError::ConfigurationError {
                message: message.to_string(),
            }
            .into())
        };

        if !self.mu.is_finite() {
            return invalid("Mu must be finite");
        }
        if !(self.sigma > 0.0 && self.sigma.is_finite()) {
            return invalid("Sigma must be positive");
        }
        if !(self.beta > 0.0 && self.beta.is_finite()) {
            return invalid("Beta must be positive");
        }
        if !(self.tau >= 0.0 && self.tau.is_finite()) {
            return invalid("Tau must be non-negative");
        }
        if !(0.0..1.0).contains(&self.draw_probability) {
            return invalid("Draw probability must be in [0, 1)");
        }
        if !(self.loop_max_delta > 0.0) {
            return invalid("Loop max delta must be positive");
        }
        if self.max_loop_iterations == Some(0) {
            return invalid("Max loop iterations must be greater than 0");
        }

        Ok(())
    }

    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(mu) = env_override("TRUESKILL_MU")? {
            config.mu = mu;
        }
        if let Some(sigma) = env_override("TRUESKILL_SIGMA")? {
            config.sigma = sigma;
        }
        if let Some(beta) = env_override("TRUESKILL_BETA")? {
            config.beta = beta;
        }
        if let Some(tau) = env_override("TRUESKILL_TAU")? {
            config.tau = tau;
        }
        if let Some(percent) = env_override("TRUESKILL_DRAW_PROBABILITY")? {
            config.draw_probability = percent_to_fraction(percent)?;
        }
        if let Some(delta) = env_override("TRUESKILL_LOOP_MAX_DELTA")? {
            config.loop_max_delta = delta;
        }
        if let Some(iterations) = env_override("TRUESKILL_MAX_LOOP_ITERATIONS")? {
            config.max_loop_iterations = Some(iterations);
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document; missing keys take their default values.
    pub fn from_toml_str(document: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(document).map_err(|e| anyhow!("Invalid TrueSkill TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Draw margin for a one-on-one pairing.
    pub fn draw_margin(&self) -> f64 {
        draw_margin(self.beta, self.draw_probability, 2)
    }

    /// Rating assigned to a player without history.
    pub fn default_rating(&self) -> PlayerRating {
        PlayerRating::new(self.mu, self.sigma)
    }
}

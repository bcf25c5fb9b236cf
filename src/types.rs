//! Common types used throughout the rating engine

use crate::gaussian::Gaussian;
use serde::{Deserialize, Serialize};
use skillratings::trueskill::TrueSkillRating;
use std::fmt;

/// Unique identifier for players
pub type PlayerId = String;

/// Skill estimate of a player: mean (`rating`) and standard deviation
/// (`uncertainty`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerRating {
    pub rating: f64,
    pub uncertainty: f64,
}

impl PlayerRating {
    pub fn new(rating: f64, uncertainty: f64) -> Self {
        Self {
            rating,
            uncertainty,
        }
    }

    pub fn variance(&self) -> f64 {
        self.uncertainty * self.uncertainty
    }
}

impl Default for PlayerRating {
    fn default() -> Self {
        Self {
            rating: 25.0,
            uncertainty: 25.0 / 3.0,
        }
    }
}

impl fmt::Display for PlayerRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Player(mu={:.3} sigma={:.3})",
            self.rating, self.uncertainty
        )
    }
}

impl From<Gaussian> for PlayerRating {
    fn from(gaussian: Gaussian) -> Self {
        Self {
            rating: gaussian.mean(),
            uncertainty: gaussian.std_dev(),
        }
    }
}

impl From<PlayerRating> for Gaussian {
    fn from(rating: PlayerRating) -> Self {
        Gaussian::from_mean_and_std_dev(rating.rating, rating.uncertainty)
    }
}

impl From<TrueSkillRating> for PlayerRating {
    fn from(rating: TrueSkillRating) -> Self {
        Self {
            rating: rating.rating,
            uncertainty: rating.uncertainty,
        }
    }
}

impl From<PlayerRating> for TrueSkillRating {
    fn from(rating: PlayerRating) -> Self {
        Self {
            rating: rating.rating,
            uncertainty: rating.uncertainty,
        }
    }
}

/// Rating change for a single player after a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingChange {
    pub player_id: PlayerId,
    pub old_rating: PlayerRating,
    pub new_rating: PlayerRating,
    /// Final placement, 1 = first
    pub rank: u32,
}

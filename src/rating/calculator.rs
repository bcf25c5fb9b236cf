//! Rating calculator trait and the TrueSkill implementation
//!
//! `TrueSkillCalculator` works on rank-ordered ratings directly
//! (`adjust_skills`) or on arbitrary player lists with placements through
//! the `RatingCalculator` trait.

use crate::config::TrueSkillConfig;
use crate::error::{Result, SkillError};
use crate::gaussian::Gaussian;
use crate::rating::graph::{GraphParams, SkillGraph};
use crate::rating::quality::match_quality;
use crate::types::{PlayerId, PlayerRating, RatingChange};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Result of a rating calculation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingCalculationResult {
    /// Rating changes for all players, in input order
    pub rating_changes: Vec<RatingChange>,
    /// Probability of the observed placements under the pre-match ratings
    pub outcome_probability: f64,
    /// Pre-match quality (0.0 to 1.0, higher is better); two-player matches only
    pub match_quality: Option<f64>,
}

/// Trait for calculating rating changes after games
pub trait RatingCalculator: Send + Sync {
    /// Calculate rating changes for players based on game results
    ///
    /// # Arguments
    /// * `players` - List of (player_id, current_rating) pairs
    /// * `rankings` - List of (player_id, rank) pairs where 1 = first place
    ///
    /// # Returns
    /// Result containing rating changes and match statistics
    fn calculate_rating_changes(
        &self,
        players: &[(PlayerId, PlayerRating)],
        rankings: &[(PlayerId, u32)],
    ) -> Result<RatingCalculationResult>;

    /// Get the initial rating for new players
    fn get_initial_rating(&self) -> PlayerRating;

    /// Get current configuration as JSON
    fn config(&self) -> serde_json::Value;

    /// Update configuration from JSON
    fn update_config(&mut self, config: serde_json::Value) -> Result<()>;
}

/// Posterior ratings for one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillUpdate {
    /// New ratings, in the order the players were given
    pub ratings: Vec<PlayerRating>,
    /// Probability of the observed outcome
    pub probability: f64,
    /// Convergence-loop passes needed
    pub loop_passes: usize,
}

fn invalid_match(reason: String) -> anyhow::Error {
    warn!(%reason, "Rejected rating calculation");
    SkillError::InvalidMatch { reason }.into()
}

/// TrueSkill rating calculator backed by the factor-graph engine
#[derive(Debug, Clone, Default)]
pub struct TrueSkillCalculator {
    config: TrueSkillConfig,
}

impl TrueSkillCalculator {
    /// Create a new calculator from a validated configuration
    pub fn new(config: TrueSkillConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn settings(&self) -> &TrueSkillConfig {
        &self.config
    }

    /// Get default rating for new players
    pub fn default_rating(&self) -> PlayerRating {
        self.config.default_rating()
    }

    /// Update rank-ordered `ratings` (index 0 finished first). `draws[i]`
    /// marks a draw between positions `i` and `i + 1`.
    pub fn adjust_skills(&self, ratings: &[PlayerRating], draws: &[bool]) -> Result<SkillUpdate> {
        if ratings.len() < 2 {
            return Err(invalid_match(format!(
                "At least 2 players are required, got {}",
                ratings.len()
            )));
        }
        if draws.len() != ratings.len() - 1 {
            return Err(invalid_match(format!(
                "Expected {} draw flags for {} players, got {}",
                ratings.len() - 1,
                ratings.len(),
                draws.len()
            )));
        }
        if draws.contains(&true) && self.config.draw_probability == 0.0 {
            return Err(invalid_match(
                "Draws are not possible with a zero draw probability".to_string(),
            ));
        }
        // The prior variance is uncertainty^2 + tau^2 and must stay positive.
        let tau = self.config.tau;
        if let Some(bad) = ratings.iter().find(|r| {
            !r.rating.is_finite()
                || !(r.uncertainty.is_finite() && r.uncertainty >= 0.0)
                || r.uncertainty.hypot(tau) == 0.0
        }) {
            return Err(invalid_match(format!("Unusable rating {}", bad)));
        }

        let priors: Vec<Gaussian> = ratings.iter().map(|&rating| rating.into()).collect();
        let params = GraphParams::from(&self.config);
        let inference = SkillGraph::build(&priors, draws, &params).infer();

        if inference.stats.exhausted_loops > 0 {
            return Err(SkillError::NotConverged {
                passes: inference.stats.loop_passes,
                delta: inference.stats.last_loop_delta.unwrap_or(f64::INFINITY),
            }
            .into());
        }

        let probability = inference.probability();
        debug!(
            players = ratings.len(),
            probability,
            loop_passes = inference.stats.loop_passes,
            "Adjusted skills"
        );

        Ok(SkillUpdate {
            ratings: inference
                .posteriors
                .into_iter()
                .map(PlayerRating::from)
                .collect(),
            probability,
            loop_passes: inference.stats.loop_passes,
        })
    }

    /// Update rank-ordered ratings where every adjacent pair shares the same
    /// draw status.
    pub fn adjust_skills_with_draw(
        &self,
        ratings: &[PlayerRating],
        draw: bool,
    ) -> Result<SkillUpdate> {
        let draws = vec![draw; ratings.len().saturating_sub(1)];
        self.adjust_skills(ratings, &draws)
    }

    /// Quality of a prospective one-on-one match.
    pub fn match_quality(&self, ratings: &[PlayerRating]) -> Result<f64> {
        match ratings {
            [a, b] => Ok(match_quality(self.config.beta, a, b)),
            _ => Err(SkillError::UnsupportedMatchSize {
                players: ratings.len(),
            }
            .into()),
        }
    }

    /// Displayable skill: `mu - 3 sigma` rounded up, clamped to `[0, 2 mu0]`.
    pub fn conservative_skill(&self, rating: &PlayerRating) -> i64 {
        let skill = (rating.rating - 3.0 * rating.uncertainty).ceil();
        skill.max(0.0).min(self.config.mu * 2.0) as i64
    }
}

impl RatingCalculator for TrueSkillCalculator {
    fn calculate_rating_changes(
        &self,
        players: &[(PlayerId, PlayerRating)],
        rankings: &[(PlayerId, u32)], // (player_id, rank) where 1 = first place
    ) -> Result<RatingCalculationResult> {
        if players.is_empty() {
            return Err(invalid_match(
                "No players provided for rating calculation".to_string(),
            ));
        }

        if rankings.is_empty() {
            return Err(invalid_match(
                "No rankings provided for rating calculation".to_string(),
            ));
        }

        let ranking_map: HashMap<&str, u32> = rankings
            .iter()
            .map(|(player_id, rank)| (player_id.as_str(), *rank))
            .collect();

        let mut ranked = Vec::with_capacity(players.len());
        for (index, (player_id, _)) in players.iter().enumerate() {
            match ranking_map.get(player_id.as_str()) {
                Some(&rank) => ranked.push((rank, index)),
                None => {
                    return Err(invalid_match(format!(
                        "No ranking provided for player {}",
                        player_id
                    )))
                }
            }
        }

        // Stable, so tied players keep their input order.
        ranked.sort_by_key(|&(rank, _)| rank);

        let ordered: Vec<PlayerRating> = ranked.iter().map(|&(_, index)| players[index].1).collect();
        let draws: Vec<bool> = ranked.windows(2).map(|pair| pair[0].0 == pair[1].0).collect();

        let update = self.adjust_skills(&ordered, &draws)?;

        let mut new_ratings = vec![PlayerRating::default(); players.len()];
        for (&(_, index), &rating) in ranked.iter().zip(&update.ratings) {
            new_ratings[index] = rating;
        }

        let rating_changes = players
            .iter()
            .zip(new_ratings)
            .map(|((player_id, old_rating), new_rating)| RatingChange {
                player_id: player_id.clone(),
                old_rating: *old_rating,
                new_rating,
                rank: ranking_map[player_id.as_str()],
            })
            .collect();

        let match_quality = self
            .match_quality(&players.iter().map(|(_, r)| *r).collect::<Vec<_>>())
            .ok();

        Ok(RatingCalculationResult {
            rating_changes,
            outcome_probability: update.probability,
            match_quality,
        })
    }

    fn get_initial_rating(&self) -> PlayerRating {
        self.default_rating()
    }

    fn config(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or(serde_json::Value::Null)
    }

    fn update_config(&mut self, config: serde_json::Value) -> Result<()> {
        let new_config: TrueSkillConfig =
            serde_json::from_value(config).map_err(|e| SkillError::ConfigurationError {
                message: format!("Invalid TrueSkill configuration: {}", e),
            })?;

        new_config.validate()?;
        self.config = new_config;
        Ok(())
    }
}

//! TrueSkill rating on top of the factor-graph engine
//!
//! This module builds the per-match factor graph, converts between draw
//! probabilities and margins, scores prospective pairings and exposes the
//! rank-based calculator interface.

pub mod calculator;
pub mod draw;
pub mod graph;
pub mod quality;

// Re-export commonly used types
pub use calculator::{RatingCalculationResult, RatingCalculator, SkillUpdate, TrueSkillCalculator};
pub use draw::{draw_margin, draw_probability};
pub use graph::{GraphParams, Inference, SkillGraph};
pub use quality::match_quality;

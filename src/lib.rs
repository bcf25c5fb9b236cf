//! TrueSkill Graph - factor-graph inference for multi-player skill ratings
//!
//! This crate provides Gaussian message passing over a per-match factor
//! graph, a small schedule interpreter driving it to convergence, and a
//! rating calculator that turns match placements into updated ratings.

pub mod config;
pub mod error;
pub mod factor;
pub mod gaussian;
pub mod rating;
pub mod schedule;
pub mod types;

// Re-export commonly used types and traits
pub use error::{Result, SkillError};
pub use types::*;

// Re-export key components
pub use config::TrueSkillConfig;
pub use gaussian::Gaussian;
pub use rating::{RatingCalculator, SkillUpdate, TrueSkillCalculator};
pub use schedule::{RunStats, Schedule};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

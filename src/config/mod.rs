//! Configuration management for the rating engine
//!
//! This module handles model parameters, their defaults, validation and
//! loading from environment variables or TOML.

pub mod rating;

// Re-export commonly used types
pub use rating::TrueSkillConfig;

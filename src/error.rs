//! Error types for the rating engine
//!
//! Recoverable, caller-facing failures are modelled with `SkillError` and
//! carried through `anyhow` for consistent error handling. Malformed factor
//! graphs (bad port or handle) are programming defects and panic instead.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for rating calculations
#[derive(Debug, thiserror::Error)]
pub enum SkillError {
    #[error("Invalid match: {reason}")]
    InvalidMatch { reason: String },

    #[error("Match quality is only defined for 2 players, got {players}")]
    UnsupportedMatchSize { players: usize },

    #[error("Inference did not converge after {passes} passes (last delta {delta})")]
    NotConverged { passes: usize, delta: f64 },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}

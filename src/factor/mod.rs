//! Factor graph building blocks
//!
//! This module provides the belief arena, the truncated-Gaussian
//! corrections, the factor contract shared by every node kind, and the
//! factory that binds concrete factors to arena handles.

pub mod arena;
pub mod factory;
pub mod node;
pub mod truncated;

// Re-export commonly used types
pub use arena::{DistributionArena, Handle};
pub use factory::FactorFactory;
pub use node::{Factor, FactorId, FactorKind, FactorList};

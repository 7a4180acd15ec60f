//! Shared module - Common types used by every feature
//!
//! Nothing in here depends on a feature module.

pub mod models;

// Re-exports for convenience
pub use models::*;

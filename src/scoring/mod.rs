//! Risk scoring engine.
//!
//! Public API:
//! - [`calculate_risk_score`]
//! - [`calculate_risk_rating`]
//! - [`requires_after_controls`]

pub mod engine;

pub use engine::*;

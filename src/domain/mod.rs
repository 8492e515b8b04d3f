//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the rating scale (`RiskRating`)
//! - register rows (`RiskAssessment`) and their computed outcomes
//! - run configuration (`RegisterConfig`) and the saved register schema

pub mod types;

pub use types::*;

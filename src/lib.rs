//! `site-risk` library crate.
//!
//! The binary (`risk`) is a thin wrapper around this library so that:
//!
//! - the scoring engine is usable without the CLI
//! - register evaluation is testable without spawning processes

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod evaluate;
pub mod io;
pub mod plot;
pub mod report;
pub mod scoring;

pub use domain::RiskRating;
pub use scoring::{calculate_risk_rating, calculate_risk_score, requires_after_controls};

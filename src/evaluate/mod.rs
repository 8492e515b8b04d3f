//! Register evaluation.
//!
//! - per-row scoring and compliance status (`assessment`)
//! - register counts and rankings (`summary`)

pub mod assessment;
pub mod summary;

pub use assessment::{evaluate_assessment, evaluate_register};
pub use summary::{action_required, rank_by_risk, summarize};

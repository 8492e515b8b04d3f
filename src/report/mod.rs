//! Reporting utilities: formatted terminal output for scores and registers.
//!
//! Formatting lives here so the scoring and ingest code stays free of
//! presentation concerns.

pub mod format;

pub use format::*;

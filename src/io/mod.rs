//! Input/output helpers.
//!
//! - register CSV ingest + validation (`ingest`)
//! - evaluated-row CSV export (`export`)
//! - register JSON read/write (`register`)

pub mod export;
pub mod ingest;
pub mod register;

pub use export::*;
pub use ingest::*;
pub use register::*;

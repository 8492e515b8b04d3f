//! Terminal rendering of the severity × probability grid.

pub mod matrix;

pub use matrix::*;

//! Read/write evaluated register JSON files.
//!
//! Register JSON is the portable record of a run:
//! - as-of date and site filter
//! - register summary
//! - every assessment with its computed outcome
//!
//! The schema is defined by `domain::RegisterFile`.

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use chrono::NaiveDate;

use crate::domain::{EvaluatedAssessment, RegisterFile, RegisterSummary};
use crate::error::{AppError, EXIT_INPUT, EXIT_INTERNAL};

/// Tool name recorded in saved files.
pub const TOOL_NAME: &str = "risk";

/// Assemble the saved representation of a run.
pub fn build_register_file(
    asof_date: NaiveDate,
    site: Option<String>,
    summary: &RegisterSummary,
    rows: &[EvaluatedAssessment],
) -> RegisterFile {
    RegisterFile {
        tool: TOOL_NAME.to_string(),
        asof_date,
        site,
        summary: summary.clone(),
        assessments: rows.to_vec(),
    }
}

/// Write a register JSON file.
pub fn write_register_json(path: &Path, register: &RegisterFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to create register JSON '{}': {e}", path.display())))?;
    write_register(file, register)
}

pub fn write_register<W: Write>(sink: W, register: &RegisterFile) -> Result<(), AppError> {
    serde_json::to_writer_pretty(sink, register)
        .map_err(|e| AppError::new(EXIT_INTERNAL, format!("Failed to write register JSON: {e}")))
}

/// Read a register JSON file.
pub fn read_register_json(path: &Path) -> Result<RegisterFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to open register JSON '{}': {e}", path.display())))?;
    read_register(BufReader::new(file))
}

pub fn read_register<R: Read>(source: R) -> Result<RegisterFile, AppError> {
    serde_json::from_reader(source).map_err(|e| AppError::new(EXIT_INPUT, format!("Invalid register JSON: {e}")))
}

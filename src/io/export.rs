//! Export evaluated assessments to CSV.
//!
//! One row per assessment with the original factors alongside the computed
//! scores, so the file can be re-opened in a spreadsheet.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;

use crate::domain::{EvaluatedAssessment, Factor};
use crate::error::{AppError, EXIT_INTERNAL, EXIT_INPUT};

const HEADER: [&str; 17] = [
    "id",
    "site",
    "hazard",
    "persons_at_risk",
    "controls",
    "severity",
    "probability",
    "score",
    "rating",
    "after_controls_required",
    "severity_after",
    "probability_after",
    "residual_score",
    "residual_rating",
    "status",
    "review_due",
    "review_overdue",
];

/// Write evaluated rows to a CSV file.
pub fn write_results_csv(path: &Path, rows: &[EvaluatedAssessment]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_results(file, rows)
}

/// Write evaluated rows as CSV to any sink.
pub fn write_results<W: Write>(sink: W, rows: &[EvaluatedAssessment]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(sink);
    writer
        .write_record(HEADER)
        .map_err(|e| AppError::new(EXIT_INTERNAL, format!("Failed to write export CSV header: {e}")))?;

    for row in rows {
        let a = &row.assessment;
        let o = &row.outcome;
        let record = [
            a.id.clone(),
            a.site.clone().unwrap_or_default(),
            a.hazard.clone(),
            a.persons_at_risk.clone().unwrap_or_default(),
            a.controls.clone().unwrap_or_default(),
            fmt_factor(a.severity),
            fmt_factor(a.probability),
            o.score.to_string(),
            o.rating.key().to_string(),
            o.after_controls_required.to_string(),
            fmt_factor(a.severity_after),
            fmt_factor(a.probability_after),
            o.residual_score.map(|s| s.to_string()).unwrap_or_default(),
            o.residual_rating.map(|r| r.key().to_string()).unwrap_or_default(),
            o.status.key().to_string(),
            fmt_date(a.review_due),
            o.review_overdue.to_string(),
        ];
        writer
            .write_record(&record)
            .map_err(|e| AppError::new(EXIT_INTERNAL, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(EXIT_INTERNAL, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

fn fmt_factor(v: Factor) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

fn fmt_date(d: Option<NaiveDate>) -> String {
    d.map(|d| d.to_string()).unwrap_or_default()
}

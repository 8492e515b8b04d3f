//! Shared register pipeline.
//!
//! ingest -> evaluate -> summarize -> rank
//!
//! `risk register` prints and exports from the returned `RegisterRun`; tests
//! drive the same path from in-memory CSV.

use std::io::Read;

use tracing::{debug, warn};

use crate::domain::{EvaluatedAssessment, RegisterConfig, RegisterSummary};
use crate::error::AppError;
use crate::evaluate::{action_required, evaluate_register, rank_by_risk, summarize};
use crate::io::ingest::{IngestedRegister, load_register, load_register_from_reader};

/// All computed outputs of a single `risk register` run.
#[derive(Debug, Clone)]
pub struct RegisterRun {
    pub ingest: IngestedRegister,
    pub rows: Vec<EvaluatedAssessment>,
    pub summary: RegisterSummary,
    pub ranking: Vec<EvaluatedAssessment>,
    pub action_required: Vec<EvaluatedAssessment>,
}

/// Execute the full register pipeline from `config.csv_path`.
pub fn run_register(config: &RegisterConfig) -> Result<RegisterRun, AppError> {
    let ingest = load_register(config)?;
    Ok(run_with_ingest(config, ingest))
}

/// Execute the register pipeline from any CSV source.
pub fn run_register_from_reader<R: Read>(source: R, config: &RegisterConfig) -> Result<RegisterRun, AppError> {
    let ingest = load_register_from_reader(source, config)?;
    Ok(run_with_ingest(config, ingest))
}

fn run_with_ingest(config: &RegisterConfig, ingest: IngestedRegister) -> RegisterRun {
    for e in &ingest.row_errors {
        warn!(line = e.line, id = e.id.as_deref().unwrap_or(""), "skipped row: {}", e.message);
    }

    let rows = evaluate_register(&ingest.assessments, config.asof_date);
    let summary = summarize(&rows);
    let ranking = rank_by_risk(&rows, config.top_n);
    let action_required = action_required(&rows);
    debug!(
        n = summary.n_assessments,
        action_required = action_required.len(),
        overdue = summary.reviews_overdue,
        "register evaluated"
    );

    RegisterRun {
        ingest,
        rows,
        summary,
        ranking,
        action_required,
    }
}

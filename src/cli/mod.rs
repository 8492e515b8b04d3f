//! Command-line parsing for the site risk register tool.
//!
//! Argument parsing and command dispatch stay separate from the scoring and
//! ingest code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::domain::MatrixPass;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "risk", version, about = "Site risk assessment scoring and register checks")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Score a single severity × probability pair.
    Score(ScoreArgs),
    /// Evaluate a risk-assessment register CSV.
    Register(RegisterArgs),
    /// Print the reference risk matrix.
    Matrix,
    /// Summarize a previously exported register JSON.
    Show(ShowArgs),
}

/// Options for scoring a single pair.
#[derive(Debug, Args, Clone)]
pub struct ScoreArgs {
    /// Severity of harm (1-5). Omit or pass 0 to leave unset.
    #[arg(short = 's', long, allow_negative_numbers = true)]
    pub severity: Option<i32>,

    /// Probability of occurrence (1-5). Omit or pass 0 to leave unset.
    #[arg(short = 'p', long, alias = "likelihood", allow_negative_numbers = true)]
    pub probability: Option<i32>,

    /// Accept values outside 1-5 and score them as given.
    #[arg(long)]
    pub no_strict: bool,
}

/// Options for evaluating a register.
#[derive(Debug, Args, Clone)]
pub struct RegisterArgs {
    /// Register CSV to evaluate.
    #[arg(long, value_name = "CSV", env = "RISK_REGISTER")]
    pub csv: PathBuf,

    /// Only evaluate assessments for this site (case-insensitive).
    #[arg(long, env = "RISK_SITE")]
    pub site: Option<String>,

    /// Date used for review-overdue checks (defaults to today).
    #[arg(long, value_parser = parse_asof)]
    pub asof: Option<NaiveDate>,

    /// Show the top-N highest risks.
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Accept severity/probability values outside 1-5.
    #[arg(long)]
    pub no_strict: bool,

    /// Print the risk matrix with per-cell assessment counts
    /// (`--matrix` alone counts the initial pass).
    #[arg(long, value_enum, num_args = 0..=1, default_missing_value = "initial", value_name = "PASS")]
    pub matrix: Option<MatrixPass>,

    /// Exit with a non-zero code when any assessment needs action.
    #[arg(long)]
    pub check: bool,

    /// Export evaluated rows to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the evaluated register (summary + rows) to JSON.
    #[arg(long = "export-json")]
    pub export_json: Option<PathBuf>,
}

/// Options for summarizing a saved register.
#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    /// Register JSON produced by `risk register --export-json`.
    #[arg(long, value_name = "JSON")]
    pub json: PathBuf,

    /// Show the top-N highest risks.
    #[arg(long, default_value_t = 10)]
    pub top: usize,
}

fn parse_asof(s: &str) -> Result<NaiveDate, String> {
    crate::io::ingest::parse_date(s)
}

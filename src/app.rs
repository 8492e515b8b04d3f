//! Top-level application orchestration.
//!
//! `src/main.rs` is tiny; this module is the "real main" that:
//! - loads `.env` and installs logging
//! - parses CLI arguments
//! - runs scoring or the register pipeline
//! - prints reports and writes optional exports

use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, RegisterArgs, ScoreArgs, ShowArgs};
use crate::domain::{Factor, RegisterConfig, RegisterSummary};
use crate::error::{AppError, EXIT_CHECK_FAILED};
use crate::evaluate::{action_required, rank_by_risk};
use crate::io::ingest::{FACTOR_MAX, FACTOR_MIN};
use crate::plot::{cell_counts, render_risk_matrix};

pub mod pipeline;

/// Env var holding the `tracing` filter directive.
pub const LOG_ENV: &str = "RISK_LOG";

/// Row errors listed before collapsing into "... and N more".
const MAX_ROW_ERRORS_SHOWN: usize = 10;

/// Entry point for the `risk` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env is fine; env vars and flags still apply.
    dotenvy::dotenv().ok();
    init_logging();

    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Score(args) => handle_score(args),
        Command::Register(args) => handle_register(args),
        Command::Matrix => {
            print!("{}", render_risk_matrix(None));
            Ok(())
        }
        Command::Show(args) => handle_show(args),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_score(args: ScoreArgs) -> Result<(), AppError> {
    if !args.no_strict {
        check_factor_range(args.severity, "severity")?;
        check_factor_range(args.probability, "probability")?;
    }
    print!("{}", crate::report::format_score(args.severity, args.probability));
    Ok(())
}

fn check_factor_range(value: Factor, name: &str) -> Result<(), AppError> {
    match value {
        Some(v) if v != 0 && !(FACTOR_MIN..=FACTOR_MAX).contains(&v) => Err(AppError::input(format!(
            "`--{name}` must be between {FACTOR_MIN} and {FACTOR_MAX} (got {v}); use --no-strict to score it anyway."
        ))),
        _ => Ok(()),
    }
}

fn handle_register(args: RegisterArgs) -> Result<(), AppError> {
    let config = register_config_from_args(&args, Local::now().date_naive());
    let run = pipeline::run_register(&config)?;

    println!(
        "{}",
        crate::report::format_run_summary(&run.ingest, &run.summary, &config)
    );
    let errors = crate::report::format_row_errors(&run.ingest.row_errors, MAX_ROW_ERRORS_SHOWN);
    if !errors.is_empty() {
        println!("{errors}");
    }
    println!("{}", crate::report::format_ranking(&run.ranking));
    print!("{}", crate::report::format_action_required(&run.action_required));

    if let Some(pass) = config.matrix {
        let counts = cell_counts(&run.rows, pass);
        println!();
        println!("Counts: {} pass", pass.display_name());
        print!("{}", render_risk_matrix(Some(&counts)));
    }

    // Optional exports.
    if let Some(path) = &config.export_results {
        crate::io::export::write_results_csv(path, &run.rows)?;
        info!(path = %path.display(), rows = run.rows.len(), "wrote results CSV");
    }
    if let Some(path) = &config.export_json {
        let file = crate::io::register::build_register_file(
            config.asof_date,
            config.filter_site.clone(),
            &run.summary,
            &run.rows,
        );
        crate::io::register::write_register_json(path, &file)?;
        info!(path = %path.display(), "wrote register JSON");
    }

    check_register(&run.summary, &config)
}

/// Fail with [`EXIT_CHECK_FAILED`] when `--check` is on and any assessment
/// still needs an effective after-controls pass.
pub fn check_register(summary: &RegisterSummary, config: &RegisterConfig) -> Result<(), AppError> {
    let pending = summary.action_required();
    if config.check && pending > 0 {
        return Err(AppError::new(
            EXIT_CHECK_FAILED,
            format!("Register check failed: {pending} assessment(s) need an effective after-controls assessment."),
        ));
    }
    Ok(())
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let file = crate::io::register::read_register_json(&args.json)?;

    println!(
        "{}",
        crate::report::format_register_summary(&file.summary, file.asof_date, file.site.as_deref())
    );
    println!(
        "{}",
        crate::report::format_ranking(&rank_by_risk(&file.assessments, args.top))
    );
    print!(
        "{}",
        crate::report::format_action_required(&action_required(&file.assessments))
    );
    Ok(())
}

pub fn register_config_from_args(args: &RegisterArgs, today: NaiveDate) -> RegisterConfig {
    RegisterConfig {
        csv_path: args.csv.clone(),
        asof_date: args.asof.unwrap_or(today),
        filter_site: args.site.clone().filter(|s| !s.trim().is_empty()),
        strict: !args.no_strict,
        top_n: args.top,
        matrix: args.matrix,
        check: args.check,
        export_results: args.export.clone(),
        export_json: args.export_json.clone(),
    }
}

/// Rewrite argv so common short forms work.
///
/// Rules:
/// - `risk`                         -> `risk matrix`
/// - `risk -s 4 -p 5 ...`           -> `risk score -s 4 -p 5 ...`
/// - `risk --help/--version/-h`     -> unchanged
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("matrix".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    // A leading flag means "score flags".
    if arg1.starts_with('-') {
        argv.insert(1, "score".to_string());
    }
    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::domain::MatrixPass;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_prints_matrix() {
        assert_eq!(rewrite_args(argv(&["risk"])), argv(&["risk", "matrix"]));
    }

    #[test]
    fn leading_flags_become_score() {
        assert_eq!(
            rewrite_args(argv(&["risk", "-s", "4", "-p", "5"])),
            argv(&["risk", "score", "-s", "4", "-p", "5"])
        );
    }

    #[test]
    fn help_and_subcommands_untouched() {
        assert_eq!(rewrite_args(argv(&["risk", "--help"])), argv(&["risk", "--help"]));
        assert_eq!(rewrite_args(argv(&["risk", "-V"])), argv(&["risk", "-V"]));
        assert_eq!(
            rewrite_args(argv(&["risk", "register", "--csv", "r.csv"])),
            argv(&["risk", "register", "--csv", "r.csv"])
        );
    }

    #[test]
    fn score_range_check() {
        assert!(check_factor_range(Some(5), "severity").is_ok());
        assert!(check_factor_range(Some(0), "severity").is_ok());
        assert!(check_factor_range(None, "severity").is_ok());
        let err = check_factor_range(Some(6), "severity").unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("--severity"));
    }

    fn check_config(check: bool) -> RegisterConfig {
        RegisterConfig {
            csv_path: PathBuf::from("r.csv"),
            asof_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            filter_site: None,
            strict: true,
            top_n: 10,
            matrix: None,
            check,
            export_results: None,
            export_json: None,
        }
    }

    #[test]
    fn check_fails_with_pending_actions() {
        let summary = RegisterSummary {
            after_controls_missing: 1,
            controls_ineffective: 2,
            ..RegisterSummary::default()
        };
        let err = check_register(&summary, &check_config(true)).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_CHECK_FAILED);
        assert_eq!(err.exit_code(), 5);
        assert!(err.message().contains("3 assessment(s)"));
    }

    #[test]
    fn check_passes_without_pending_actions() {
        let summary = RegisterSummary {
            compliant: 4,
            not_assessed: 1,
            ..RegisterSummary::default()
        };
        assert!(check_register(&summary, &check_config(true)).is_ok());
    }

    #[test]
    fn check_off_never_fails() {
        let summary = RegisterSummary {
            after_controls_missing: 1,
            ..RegisterSummary::default()
        };
        assert!(check_register(&summary, &check_config(false)).is_ok());
    }

    #[test]
    fn config_defaults_asof_to_today() {
        let args = RegisterArgs {
            csv: PathBuf::from("r.csv"),
            site: Some("  ".to_string()),
            asof: None,
            top: 5,
            no_strict: true,
            matrix: None,
            check: false,
            export: None,
            export_json: None,
        };
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let config = register_config_from_args(&args, today);
        assert_eq!(config.asof_date, today);
        assert_eq!(config.filter_site, None);
        assert!(!config.strict);
        assert_eq!(config.top_n, 5);
        assert_eq!(config.matrix, None);

        let args = RegisterArgs {
            matrix: Some(MatrixPass::AfterControls),
            ..args
        };
        let config = register_config_from_args(&args, today);
        assert_eq!(config.matrix, Some(MatrixPass::AfterControls));
    }
}

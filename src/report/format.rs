//! Formatted terminal output.
//!
//! Output changes are localized here, which keeps them easy to pin with
//! snapshot-style tests.

use chrono::NaiveDate;

use crate::domain::{ComplianceStatus, EvaluatedAssessment, Factor, RegisterConfig, RegisterSummary, RiskRating};
use crate::io::ingest::{IngestedRegister, RowError};
use crate::scoring::{UNSET_SCORE, calculate_risk_rating, calculate_risk_score, requires_after_controls};

/// Explain a single severity × probability assessment.
pub fn format_score(severity: Factor, probability: Factor) -> String {
    let score = calculate_risk_score(severity, probability);
    let rating = calculate_risk_rating(score);

    let mut out = String::new();
    out.push_str(&format!(
        "Severity: {} | Probability: {}\n",
        fmt_factor(severity),
        fmt_factor(probability)
    ));
    if score == UNSET_SCORE {
        out.push_str("Score: 0 (not yet assessed)\n");
    } else {
        out.push_str(&format!("Score: {score}\n"));
    }
    out.push_str(&format!("Rating: {}\n", rating.display_name()));
    let after = if requires_after_controls(rating) {
        "required"
    } else {
        "not required"
    };
    out.push_str(&format!("After-controls assessment: {after}\n"));
    out
}

/// Format the full run summary (ingest counters + register summary).
pub fn format_run_summary(ingest: &IngestedRegister, summary: &RegisterSummary, config: &RegisterConfig) -> String {
    let mut out = String::new();
    out.push_str("=== risk - Site Risk Register ===\n");
    out.push_str(&format!("Register: {}\n", config.csv_path.display()));
    out.push_str(&format!(
        "Rows: read={} | used={} | filtered={} | errors={}\n",
        ingest.rows_read,
        ingest.rows_used,
        ingest.rows_filtered,
        ingest.row_errors.len()
    ));
    out.push_str(&format_register_summary(
        summary,
        config.asof_date,
        config.filter_site.as_deref(),
    ));
    out
}

/// Format a register summary (shared by `register` and `show`).
pub fn format_register_summary(summary: &RegisterSummary, asof: NaiveDate, site: Option<&str>) -> String {
    let mut out = String::new();
    out.push_str(&format!("As-of: {asof}\n"));
    out.push_str(&format!("Site: {}\n", site.unwrap_or("(all)")));
    if !summary.sites.is_empty() {
        out.push_str(&format!("Sites: {}\n", summary.sites.join(", ")));
    }
    out.push_str(&format!(
        "Assessments: n={} | max score={}\n",
        summary.n_assessments, summary.max_score
    ));

    out.push_str("\nRating distribution:\n");
    out.push_str(&format!("{:<18} {:>8} {:>8}\n", "rating", "initial", "residual"));
    for rating in RiskRating::ALL.iter().rev() {
        out.push_str(&format!(
            "{:<18} {:>8} {:>8}\n",
            rating.display_name(),
            summary.initial_by_rating.get(rating.index()).copied().unwrap_or(0),
            summary.residual_by_rating.get(rating.index()).copied().unwrap_or(0),
        ));
    }

    out.push_str("\nCompliance:\n");
    for status in ComplianceStatus::ALL {
        let marker = if status.is_action_required() && summary.count_for(status) > 0 {
            "!"
        } else {
            " "
        };
        out.push_str(&format!(
            "{marker} {:<24} {:>6}\n",
            status.display_name(),
            summary.count_for(status)
        ));
    }
    out.push_str(&format!("  {:<24} {:>6}\n", "reviews overdue", summary.reviews_overdue));
    out
}

/// Format the highest-risk assessments.
pub fn format_ranking(rows: &[EvaluatedAssessment]) -> String {
    let mut out = String::new();
    out.push_str("Top risks (by residual score, else initial):\n");
    out.push_str(&format_table(rows));
    out
}

/// Format assessments that fail the after-controls policy.
pub fn format_action_required(rows: &[EvaluatedAssessment]) -> String {
    let mut out = String::new();
    if rows.is_empty() {
        out.push_str("Action required: none\n");
        return out;
    }
    out.push_str(&format!("Action required ({}):\n", rows.len()));
    out.push_str(&format_table(rows));
    out
}

/// List row errors, capped at `max` with a count of the rest.
pub fn format_row_errors(errors: &[RowError], max: usize) -> String {
    let mut out = String::new();
    if errors.is_empty() {
        return out;
    }
    out.push_str(&format!("Skipped rows ({}):\n", errors.len()));
    for e in errors.iter().take(max) {
        match &e.id {
            Some(id) => out.push_str(&format!("- line {} ({id}): {}\n", e.line, e.message)),
            None => out.push_str(&format!("- line {}: {}\n", e.line, e.message)),
        }
    }
    if errors.len() > max {
        out.push_str(&format!("- ... and {} more\n", errors.len() - max));
    }
    out
}

fn format_table(rows: &[EvaluatedAssessment]) -> String {
    let mut out = String::new();
    push_line(
        &mut out,
        format!(
            "{:<12} {:<14} {:<28} {:>5} {:<16} {:>8} {:<22}",
            "id", "site", "hazard", "score", "rating", "residual", "status"
        ),
    );
    push_line(
        &mut out,
        format!(
            "{:-<12} {:-<14} {:-<28} {:-<5} {:-<16} {:-<8} {:-<22}",
            "", "", "", "", "", "", ""
        ),
    );

    for r in rows {
        let a = &r.assessment;
        let o = &r.outcome;
        push_line(
            &mut out,
            format!(
                "{:<12} {:<14} {:<28} {:>5} {:<16} {:>8} {:<22}",
                truncate(&a.id, 12),
                truncate(a.site.as_deref().unwrap_or(""), 14),
                truncate(&a.hazard, 28),
                o.score,
                o.rating.display_name(),
                o.residual_score.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string()),
                o.status.display_name(),
            ),
        );
    }
    out
}

fn push_line(out: &mut String, line: String) {
    out.push_str(line.trim_end());
    out.push('\n');
}

fn fmt_factor(v: Factor) -> String {
    match v {
        Some(x) if x != 0 => x.to_string(),
        _ => "unset".to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

//! Register-level aggregation and ranking.

use std::collections::BTreeSet;

use crate::domain::{ComplianceStatus, EvaluatedAssessment, RegisterSummary, RiskRating};

/// Count ratings, statuses, overdue reviews and sites across a register.
pub fn summarize(rows: &[EvaluatedAssessment]) -> RegisterSummary {
    let mut summary = RegisterSummary {
        n_assessments: rows.len(),
        initial_by_rating: vec![0; RiskRating::ALL.len()],
        residual_by_rating: vec![0; RiskRating::ALL.len()],
        ..RegisterSummary::default()
    };
    let mut sites = BTreeSet::new();

    for row in rows {
        let out = &row.outcome;
        if out.status != ComplianceStatus::NotAssessed {
            summary.initial_by_rating[out.rating.index()] += 1;
            if let Some(r) = out.residual_rating {
                summary.residual_by_rating[r.index()] += 1;
            }
        }

        match out.status {
            ComplianceStatus::NotAssessed => summary.not_assessed += 1,
            ComplianceStatus::Compliant => summary.compliant += 1,
            ComplianceStatus::AfterControlsMissing => summary.after_controls_missing += 1,
            ComplianceStatus::ControlsIneffective => summary.controls_ineffective += 1,
        }
        if out.review_overdue {
            summary.reviews_overdue += 1;
        }

        summary.max_score = summary.max_score.max(out.score);
        if let Some(site) = &row.assessment.site {
            sites.insert(site.clone());
        }
    }

    summary.sites = sites.into_iter().collect();
    summary
}

/// Top-N rows by effective score (residual if re-assessed, else initial).
///
/// Ties fall back to the initial score, then to the id so output is stable.
pub fn rank_by_risk(rows: &[EvaluatedAssessment], top_n: usize) -> Vec<EvaluatedAssessment> {
    let mut sorted: Vec<&EvaluatedAssessment> = rows
        .iter()
        .filter(|r| r.outcome.status != ComplianceStatus::NotAssessed)
        .collect();
    sorted.sort_by(|a, b| {
        b.outcome
            .effective_score()
            .cmp(&a.outcome.effective_score())
            .then_with(|| b.outcome.score.cmp(&a.outcome.score))
            .then_with(|| a.assessment.id.cmp(&b.assessment.id))
    });
    sorted.into_iter().take(top_n).cloned().collect()
}

/// Rows whose status needs action, in register order.
pub fn action_required(rows: &[EvaluatedAssessment]) -> Vec<EvaluatedAssessment> {
    rows.iter()
        .filter(|r| r.outcome.status.is_action_required())
        .cloned()
        .collect()
}

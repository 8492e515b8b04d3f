//! Evaluate register rows against the scoring engine and the after-controls
//! policy.

use chrono::NaiveDate;

use crate::domain::{AssessmentOutcome, ComplianceStatus, EvaluatedAssessment, RiskAssessment};
use crate::scoring::{UNSET_SCORE, calculate_risk_rating, calculate_risk_score, requires_after_controls};

/// Score, rate and classify one assessment.
///
/// The residual (after-controls) pass is only reported when it produces a
/// real score; a half-filled second pass counts as missing.
pub fn evaluate_assessment(assessment: &RiskAssessment, asof: NaiveDate) -> AssessmentOutcome {
    let score = calculate_risk_score(assessment.severity, assessment.probability);
    let rating = calculate_risk_rating(score);
    let after_controls_required = requires_after_controls(rating);

    let residual_score = match calculate_risk_score(assessment.severity_after, assessment.probability_after) {
        UNSET_SCORE => None,
        s => Some(s),
    };
    let residual_rating = residual_score.map(calculate_risk_rating);

    let status = if score == UNSET_SCORE {
        ComplianceStatus::NotAssessed
    } else {
        match (after_controls_required, residual_rating) {
            (true, None) => ComplianceStatus::AfterControlsMissing,
            (_, Some(r)) if requires_after_controls(r) => ComplianceStatus::ControlsIneffective,
            _ => ComplianceStatus::Compliant,
        }
    };

    let review_overdue = assessment.review_due.is_some_and(|due| due < asof);

    AssessmentOutcome {
        score,
        rating,
        after_controls_required,
        residual_score,
        residual_rating,
        status,
        review_overdue,
    }
}

/// Evaluate every row, preserving register order.
pub fn evaluate_register(assessments: &[RiskAssessment], asof: NaiveDate) -> Vec<EvaluatedAssessment> {
    assessments
        .iter()
        .map(|a| EvaluatedAssessment {
            assessment: a.clone(),
            outcome: evaluate_assessment(a, asof),
        })
        .collect()
}

#[cfg(test)]
pub(crate) fn assessment(id: &str, before: (i32, i32), after: Option<(i32, i32)>) -> RiskAssessment {
    RiskAssessment {
        id: id.to_string(),
        site: None,
        hazard: format!("hazard {id}"),
        persons_at_risk: None,
        controls: None,
        severity: Some(before.0),
        probability: Some(before.1),
        severity_after: after.map(|a| a.0),
        probability_after: after.map(|a| a.1),
        assessor: None,
        assessed_on: None,
        review_due: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RiskRating;

    fn asof() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn low_initial_rating_is_compliant_without_second_pass() {
        let out = evaluate_assessment(&assessment("A", (3, 4), None), asof());
        assert_eq!(out.score, 12);
        assert_eq!(out.rating, RiskRating::SubstantialRisk);
        assert!(!out.after_controls_required);
        assert_eq!(out.residual_score, None);
        assert_eq!(out.status, ComplianceStatus::Compliant);
    }

    #[test]
    fn high_rating_without_second_pass_is_missing() {
        let out = evaluate_assessment(&assessment("A", (4, 5), None), asof());
        assert_eq!(out.rating, RiskRating::HighRisk);
        assert!(out.after_controls_required);
        assert_eq!(out.status, ComplianceStatus::AfterControlsMissing);
    }

    #[test]
    fn effective_controls_bring_rating_down() {
        let out = evaluate_assessment(&assessment("A", (5, 5), Some((5, 1))), asof());
        assert_eq!(out.rating, RiskRating::Critical);
        assert_eq!(out.residual_score, Some(5));
        assert_eq!(out.residual_rating, Some(RiskRating::PossibleRisk));
        assert_eq!(out.status, ComplianceStatus::Compliant);
        assert_eq!(out.effective_score(), 5);
    }

    #[test]
    fn residual_still_high_is_ineffective() {
        let out = evaluate_assessment(&assessment("A", (5, 5), Some((4, 4))), asof());
        assert_eq!(out.residual_rating, Some(RiskRating::HighRisk));
        assert_eq!(out.status, ComplianceStatus::ControlsIneffective);
    }

    #[test]
    fn half_filled_second_pass_counts_as_missing() {
        let mut a = assessment("A", (4, 4), None);
        a.severity_after = Some(2);
        let out = evaluate_assessment(&a, asof());
        assert_eq!(out.residual_score, None);
        assert_eq!(out.status, ComplianceStatus::AfterControlsMissing);
    }

    #[test]
    fn unset_initial_factors_are_not_assessed() {
        let mut a = assessment("A", (0, 5), None);
        a.severity = None;
        let out = evaluate_assessment(&a, asof());
        assert_eq!(out.score, 0);
        assert_eq!(out.rating, RiskRating::LowRisk);
        assert!(!out.after_controls_required);
        assert_eq!(out.status, ComplianceStatus::NotAssessed);
    }

    #[test]
    fn review_overdue_is_strictly_before_asof() {
        let mut a = assessment("A", (1, 1), None);
        a.review_due = Some(asof());
        assert!(!evaluate_assessment(&a, asof()).review_overdue);
        a.review_due = asof().pred_opt();
        assert!(evaluate_assessment(&a, asof()).review_overdue);
    }

    #[test]
    fn register_order_is_preserved() {
        let rows = vec![assessment("B", (1, 1), None), assessment("A", (5, 5), None)];
        let out = evaluate_register(&rows, asof());
        assert_eq!(out[0].assessment.id, "B");
        assert_eq!(out[1].assessment.id, "A");
        assert_eq!(out[1].outcome.rating, RiskRating::Critical);
    }
}

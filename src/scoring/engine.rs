//! Severity × probability scoring and the rating cascade.
//!
//! All three functions are pure and total. Inputs are not range-checked here;
//! callers that want 1–5 validation do it before scoring (see `io::ingest`).

use crate::domain::RiskRating;

/// Score assigned when either factor is unset ("not yet assessed").
pub const UNSET_SCORE: i32 = 0;

/// Highest score reachable with in-range factors (5 × 5).
pub const MAX_SCORE: i32 = 25;

/// Multiply severity by probability.
///
/// `None` and `Some(0)` both mean "unset"; if either side is unset the result
/// is [`UNSET_SCORE`]. Out-of-range inputs still produce their product
/// (saturating rather than overflowing).
pub fn calculate_risk_score(severity: Option<i32>, probability: Option<i32>) -> i32 {
    match (severity, probability) {
        (Some(s), Some(p)) if s != 0 && p != 0 => s.saturating_mul(p),
        _ => UNSET_SCORE,
    }
}

/// Classify a score into a [`RiskRating`].
///
/// First match wins:
///
/// | rule          | rating            |
/// |---------------|-------------------|
/// | `score == 25` | `Critical`        |
/// | `score >= 15` | `HighRisk`        |
/// | `score >= 12` | `SubstantialRisk` |
/// | `score >= 4`  | `PossibleRisk`    |
/// | otherwise     | `LowRisk`         |
///
/// Only the exact maximum is `Critical`: 16–24 stay `HighRisk`. The unset
/// sentinel `0` rates as `LowRisk`; callers that care must check the score.
pub fn calculate_risk_rating(score: i32) -> RiskRating {
    if score == MAX_SCORE {
        RiskRating::Critical
    } else if score >= 15 {
        RiskRating::HighRisk
    } else if score >= 12 {
        RiskRating::SubstantialRisk
    } else if score >= 4 {
        RiskRating::PossibleRisk
    } else {
        RiskRating::LowRisk
    }
}

/// Whether a rating mandates a second, post-mitigation assessment.
pub fn requires_after_controls(rating: RiskRating) -> bool {
    matches!(rating, RiskRating::Critical | RiskRating::HighRisk)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_factors_score_zero() {
        assert_eq!(calculate_risk_score(None, Some(3)), 0);
        assert_eq!(calculate_risk_score(Some(3), None), 0);
        assert_eq!(calculate_risk_score(None, None), 0);
        assert_eq!(calculate_risk_score(Some(0), Some(5)), 0);
        assert_eq!(calculate_risk_score(Some(5), Some(0)), 0);
    }

    #[test]
    fn in_range_score_is_product_and_commutative() {
        for s in 1..=5 {
            for p in 1..=5 {
                assert_eq!(calculate_risk_score(Some(s), Some(p)), s * p);
                assert_eq!(
                    calculate_risk_score(Some(s), Some(p)),
                    calculate_risk_score(Some(p), Some(s))
                );
            }
        }
    }

    #[test]
    fn out_of_range_inputs_pass_through() {
        assert_eq!(calculate_risk_score(Some(-2), Some(3)), -6);
        assert_eq!(calculate_risk_score(Some(6), Some(6)), 36);
        assert_eq!(calculate_risk_score(Some(i32::MAX), Some(2)), i32::MAX);
    }

    #[test]
    fn rating_thresholds() {
        assert_eq!(calculate_risk_rating(25), RiskRating::Critical);
        assert_eq!(calculate_risk_rating(15), RiskRating::HighRisk);
        assert_eq!(calculate_risk_rating(14), RiskRating::SubstantialRisk);
        assert_eq!(calculate_risk_rating(12), RiskRating::SubstantialRisk);
        assert_eq!(calculate_risk_rating(11), RiskRating::PossibleRisk);
        assert_eq!(calculate_risk_rating(4), RiskRating::PossibleRisk);
        assert_eq!(calculate_risk_rating(3), RiskRating::LowRisk);
        assert_eq!(calculate_risk_rating(0), RiskRating::LowRisk);
    }

    #[test]
    fn only_the_exact_maximum_is_critical() {
        assert_eq!(calculate_risk_rating(20), RiskRating::HighRisk);
        for score in 16..25 {
            assert_eq!(calculate_risk_rating(score), RiskRating::HighRisk, "score {score}");
        }
        assert_eq!(calculate_risk_rating(26), RiskRating::HighRisk);
        assert_eq!(calculate_risk_rating(-4), RiskRating::LowRisk);
    }

    #[test]
    fn after_controls_policy() {
        assert!(requires_after_controls(RiskRating::Critical));
        assert!(requires_after_controls(RiskRating::HighRisk));
        assert!(!requires_after_controls(RiskRating::SubstantialRisk));
        assert!(!requires_after_controls(RiskRating::PossibleRisk));
        assert!(!requires_after_controls(RiskRating::LowRisk));
    }

    #[test]
    fn end_to_end_scenarios() {
        let cases = [
            (5, 5, 25, RiskRating::Critical, true),
            (4, 5, 20, RiskRating::HighRisk, true),
            (3, 4, 12, RiskRating::SubstantialRisk, false),
            (2, 2, 4, RiskRating::PossibleRisk, false),
            (1, 1, 1, RiskRating::LowRisk, false),
        ];
        for (s, p, score, rating, after) in cases {
            let got = calculate_risk_score(Some(s), Some(p));
            assert_eq!(got, score);
            let got_rating = calculate_risk_rating(got);
            assert_eq!(got_rating, rating);
            assert_eq!(requires_after_controls(got_rating), after);
        }
    }
}

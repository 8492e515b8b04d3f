//! Shared domain types.
//!
//! These types are kept small and serializable so they can be:
//!
//! - built from register CSV rows
//! - evaluated in-memory by the scoring engine
//! - exported to CSV/JSON and reloaded later for `risk show`

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Five ordered rating tiers, least to most severe.
///
/// Declaration order is the severity order, so `Ord` compares tiers directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskRating {
    LowRisk,
    PossibleRisk,
    SubstantialRisk,
    HighRisk,
    Critical,
}

impl RiskRating {
    /// All tiers in ascending order.
    pub const ALL: [RiskRating; 5] = [
        RiskRating::LowRisk,
        RiskRating::PossibleRisk,
        RiskRating::SubstantialRisk,
        RiskRating::HighRisk,
        RiskRating::Critical,
    ];

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            RiskRating::LowRisk => "Low Risk",
            RiskRating::PossibleRisk => "Possible Risk",
            RiskRating::SubstantialRisk => "Substantial Risk",
            RiskRating::HighRisk => "High Risk",
            RiskRating::Critical => "Critical",
        }
    }

    /// Stable machine label (matches the serde representation).
    pub fn key(self) -> &'static str {
        match self {
            RiskRating::LowRisk => "low_risk",
            RiskRating::PossibleRisk => "possible_risk",
            RiskRating::SubstantialRisk => "substantial_risk",
            RiskRating::HighRisk => "high_risk",
            RiskRating::Critical => "critical",
        }
    }

    /// One-letter cell marker for the matrix view.
    pub fn abbreviation(self) -> char {
        match self {
            RiskRating::LowRisk => 'L',
            RiskRating::PossibleRisk => 'P',
            RiskRating::SubstantialRisk => 'S',
            RiskRating::HighRisk => 'H',
            RiskRating::Critical => 'C',
        }
    }

    /// Position in [`RiskRating::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for RiskRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A severity or probability value as recorded on a register row.
///
/// `None` (and `Some(0)`) mean the factor has not been assessed yet.
pub type Factor = Option<i32>;

/// One row of a risk-assessment register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub id: String,
    pub site: Option<String>,
    pub hazard: String,
    pub persons_at_risk: Option<String>,
    pub controls: Option<String>,

    /// Factors before controls are applied.
    pub severity: Factor,
    pub probability: Factor,

    /// Factors re-assessed after controls (the second pass).
    pub severity_after: Factor,
    pub probability_after: Factor,

    pub assessor: Option<String>,
    pub assessed_on: Option<NaiveDate>,
    pub review_due: Option<NaiveDate>,
}

/// Where an assessment stands against the after-controls policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    /// Initial factors are unset (score is the `0` sentinel).
    NotAssessed,
    /// No second pass needed, or the second pass brought the rating down.
    Compliant,
    /// A second pass is mandatory but has not been recorded.
    AfterControlsMissing,
    /// The second pass was recorded but still lands in a mandatory tier.
    ControlsIneffective,
}

impl ComplianceStatus {
    pub const ALL: [ComplianceStatus; 4] = [
        ComplianceStatus::NotAssessed,
        ComplianceStatus::Compliant,
        ComplianceStatus::AfterControlsMissing,
        ComplianceStatus::ControlsIneffective,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            ComplianceStatus::NotAssessed => "not assessed",
            ComplianceStatus::Compliant => "compliant",
            ComplianceStatus::AfterControlsMissing => "after-controls missing",
            ComplianceStatus::ControlsIneffective => "controls ineffective",
        }
    }

    /// Stable machine label (matches the serde representation).
    pub fn key(self) -> &'static str {
        match self {
            ComplianceStatus::NotAssessed => "not_assessed",
            ComplianceStatus::Compliant => "compliant",
            ComplianceStatus::AfterControlsMissing => "after_controls_missing",
            ComplianceStatus::ControlsIneffective => "controls_ineffective",
        }
    }

    /// Statuses that fail `risk register --check`.
    pub fn is_action_required(self) -> bool {
        matches!(
            self,
            ComplianceStatus::AfterControlsMissing | ComplianceStatus::ControlsIneffective
        )
    }
}

/// Computed view of a single assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentOutcome {
    pub score: i32,
    pub rating: RiskRating,
    pub after_controls_required: bool,

    /// Present only when both after-controls factors are set.
    pub residual_score: Option<i32>,
    pub residual_rating: Option<RiskRating>,

    pub status: ComplianceStatus,
    pub review_overdue: bool,
}

impl AssessmentOutcome {
    /// Score used for ranking: residual if re-assessed, else initial.
    pub fn effective_score(&self) -> i32 {
        self.residual_score.unwrap_or(self.score)
    }
}

/// An assessment paired with its outcome (used for ranking and exports).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluatedAssessment {
    pub assessment: RiskAssessment,
    pub outcome: AssessmentOutcome,
}

/// Register-level counts.
///
/// Per-rating vectors are indexed by [`RiskRating::index`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterSummary {
    pub n_assessments: usize,
    pub initial_by_rating: Vec<usize>,
    pub residual_by_rating: Vec<usize>,
    pub not_assessed: usize,
    pub compliant: usize,
    pub after_controls_missing: usize,
    pub controls_ineffective: usize,
    pub reviews_overdue: usize,
    pub sites: Vec<String>,
    pub max_score: i32,
}

impl RegisterSummary {
    pub fn count_for(&self, status: ComplianceStatus) -> usize {
        match status {
            ComplianceStatus::NotAssessed => self.not_assessed,
            ComplianceStatus::Compliant => self.compliant,
            ComplianceStatus::AfterControlsMissing => self.after_controls_missing,
            ComplianceStatus::ControlsIneffective => self.controls_ineffective,
        }
    }

    pub fn action_required(&self) -> usize {
        self.after_controls_missing + self.controls_ineffective
    }
}

/// Which pair of factors places an assessment on the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MatrixPass {
    /// Severity/probability before controls.
    Initial,
    /// Severity/probability re-assessed after controls.
    AfterControls,
}

impl MatrixPass {
    pub fn display_name(self) -> &'static str {
        match self {
            MatrixPass::Initial => "initial",
            MatrixPass::AfterControls => "after controls",
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// Built from CLI flags, env and defaults, then passed down explicitly.
#[derive(Debug, Clone)]
pub struct RegisterConfig {
    pub csv_path: PathBuf,
    pub asof_date: NaiveDate,
    /// Only keep rows whose `site` matches (case-insensitive).
    pub filter_site: Option<String>,
    /// Reject factors outside 1–5 at ingest.
    pub strict: bool,

    pub top_n: usize,
    /// Render the matrix with per-cell counts for this pass.
    pub matrix: Option<MatrixPass>,
    pub check: bool,

    pub export_results: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}

/// A saved register file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterFile {
    pub tool: String,
    pub asof_date: NaiveDate,
    pub site: Option<String>,
    pub summary: RegisterSummary,
    pub assessments: Vec<EvaluatedAssessment>,
}

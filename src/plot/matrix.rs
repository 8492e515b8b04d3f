//! ASCII risk matrix for terminal output.
//!
//! Fixed 5×5 grid, severity rows from 5 (top) down to 1, probability columns
//! 1 to 5. Each cell shows the rating letter and the cell score; when a
//! register is supplied, the number of assessments sitting in that cell.
//!
//! Output is deterministic so it can be compared in golden tests.

use crate::domain::{EvaluatedAssessment, MatrixPass, RiskRating};
use crate::io::ingest::{FACTOR_MAX, FACTOR_MIN};
use crate::scoring::{calculate_risk_rating, calculate_risk_score};

const SIDE: usize = (FACTOR_MAX - FACTOR_MIN + 1) as usize;

/// Assessment counts per cell, indexed `[severity - 1][probability - 1]`.
pub type CellCounts = [[usize; SIDE]; SIDE];

/// Count assessments per cell. Rows with unset or out-of-range factors are skipped.
pub fn cell_counts(rows: &[EvaluatedAssessment], pass: MatrixPass) -> CellCounts {
    let mut counts = [[0; SIDE]; SIDE];
    for row in rows {
        let a = &row.assessment;
        let (severity, probability) = match pass {
            MatrixPass::Initial => (a.severity, a.probability),
            MatrixPass::AfterControls => (a.severity_after, a.probability_after),
        };
        if let (Some(s), Some(p)) = (severity.and_then(cell_index), probability.and_then(cell_index)) {
            counts[s][p] += 1;
        }
    }
    counts
}

fn cell_index(factor: i32) -> Option<usize> {
    (FACTOR_MIN..=FACTOR_MAX)
        .contains(&factor)
        .then(|| (factor - FACTOR_MIN) as usize)
}

/// Render the matrix, optionally overlaying per-cell counts.
pub fn render_risk_matrix(counts: Option<&CellCounts>) -> String {
    let cell_width = if counts.is_some() { 8 } else { 4 };

    let mut out = String::new();
    out.push_str("Risk matrix: severity (rows) x probability (columns)\n");

    let mut header = String::from("    |");
    for p in FACTOR_MIN..=FACTOR_MAX {
        header.push_str(&format!(" {p:>cell_width$}"));
    }
    out.push_str(header.trim_end());
    out.push('\n');

    out.push_str("----+");
    out.push_str(&"-".repeat((cell_width + 1) * SIDE));
    out.push('\n');

    for s in (FACTOR_MIN..=FACTOR_MAX).rev() {
        let mut line = format!("{s:>3} |");
        for p in FACTOR_MIN..=FACTOR_MAX {
            let score = calculate_risk_score(Some(s), Some(p));
            let rating = calculate_risk_rating(score);
            line.push(' ');
            line.push_str(&format!("{}{score:>3}", rating.abbreviation()));
            if let Some(counts) = counts {
                let n = counts[(s - FACTOR_MIN) as usize][(p - FACTOR_MIN) as usize];
                let n = if n == 0 { ".".to_string() } else { n.to_string() };
                line.push_str(&format!("{n:>4}"));
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out.push_str(&legend());
    out.push('\n');
    out
}

fn legend() -> String {
    let parts: Vec<String> = RiskRating::ALL
        .iter()
        .map(|r| format!("{}={}", r.abbreviation(), r.display_name()))
        .collect();
    parts.join("  ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::evaluate::assessment::{assessment, evaluate_register};

    #[test]
    fn matrix_golden_snapshot() {
        let txt = render_risk_matrix(None);
        let expected = concat!(
            "Risk matrix: severity (rows) x probability (columns)\n",
            "    |    1    2    3    4    5\n",
            "----+-------------------------\n",
            "  5 | P  5 P 10 H 15 H 20 C 25\n",
            "  4 | P  4 P  8 S 12 H 16 H 20\n",
            "  3 | L  3 P  6 P  9 S 12 H 15\n",
            "  2 | L  2 P  4 P  6 P  8 P 10\n",
            "  1 | L  1 L  2 L  3 P  4 P  5\n",
            "L=Low Risk  P=Possible Risk  S=Substantial Risk  H=High Risk  C=Critical\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn counts_overlay() {
        let asof = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let mut unset = assessment("U", (1, 1), None);
        unset.severity = None;
        let rows = evaluate_register(
            &[
                assessment("A", (5, 5), Some((2, 1))),
                assessment("B", (5, 5), None),
                assessment("C", (1, 4), None),
                assessment("D", (7, 2), None),
                unset,
            ],
            asof,
        );

        let counts = cell_counts(&rows, MatrixPass::Initial);
        assert_eq!(counts[4][4], 2);
        assert_eq!(counts[0][3], 1);
        assert_eq!(counts.iter().flatten().sum::<usize>(), 3);

        let after = cell_counts(&rows, MatrixPass::AfterControls);
        assert_eq!(after[1][0], 1);
        assert_eq!(after.iter().flatten().sum::<usize>(), 1);

        let txt = render_risk_matrix(Some(&counts));
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines[1], "    |        1        2        3        4        5");
        assert_eq!(lines[3], "  5 | P  5   . P 10   . H 15   . H 20   . C 25   2");
        assert_eq!(lines[7], "  1 | L  1   . L  2   . L  3   . P  4   1 P  5   .");
    }
}

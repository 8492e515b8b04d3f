//! Register CSV ingest and validation.
//!
//! This module turns a risk-assessment register export into clean
//! `RiskAssessment` rows that are safe to score.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **No scoring here**: factors are parsed and range-checked, nothing more

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;

use chrono::NaiveDate;
use csv::StringRecord;
use tracing::{debug, info};

use crate::domain::{Factor, RegisterConfig, RiskAssessment};
use crate::error::{AppError, EXIT_NO_ROWS};

/// Lowest and highest factor values accepted when strict checking is on.
pub const FACTOR_MIN: i32 = 1;
pub const FACTOR_MAX: i32 = 5;

const REQUIRED_COLUMNS: [&str; 4] = ["id", "hazard", "severity", "probability"];

/// Header aliases seen in register exports, mapped to canonical names.
const HEADER_ALIASES: [(&str, &str); 4] = [
    ("likelihood", "probability"),
    ("likelihood_after", "probability_after"),
    ("severity_after_controls", "severity_after"),
    ("probability_after_controls", "probability_after"),
];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub line: usize,
    pub id: Option<String>,
    pub message: String,
}

/// Ingest output: validated rows + row errors + counters.
#[derive(Debug, Clone)]
pub struct IngestedRegister {
    pub assessments: Vec<RiskAssessment>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
    /// Valid rows dropped by the site filter.
    pub rows_filtered: usize,
}

/// Load the register CSV named by `config.csv_path`.
pub fn load_register(config: &RegisterConfig) -> Result<IngestedRegister, AppError> {
    let file = File::open(&config.csv_path).map_err(|e| {
        AppError::input(format!(
            "Failed to open register CSV '{}': {e}",
            config.csv_path.display()
        ))
    })?;
    load_register_from_reader(file, config)
}

/// Load a register from any CSV source.
pub fn load_register_from_reader<R: Read>(source: R, config: &RegisterConfig) -> Result<IngestedRegister, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map)?;
    if config.filter_site.is_some() && !header_map.contains_key("site") {
        return Err(AppError::input("Filter `--site` requires a `site` column in the CSV."));
    }

    let mut assessments = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;
    let mut rows_filtered = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    id: None,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &header_map, config.strict) {
            Ok(row) => {
                if matches_filter(row.site.as_deref(), config.filter_site.as_deref()) {
                    assessments.push(row);
                } else {
                    debug!(line, id = %row.id, "row filtered out by site");
                    rows_filtered += 1;
                }
            }
            Err(message) => row_errors.push(RowError {
                line,
                id: get_optional(&record, &header_map, "id").map(str::to_string),
                message,
            }),
        }
    }

    let rows_used = assessments.len();
    info!(rows_read, rows_used, rows_filtered, row_errors = row_errors.len(), "register ingested");

    if rows_used == 0 {
        return Err(AppError::new(
            EXIT_NO_ROWS,
            "No valid rows remain after validation/filtering.",
        ));
    }

    Ok(IngestedRegister {
        assessments,
        row_errors,
        rows_read,
        rows_used,
        rows_filtered,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        let name = normalize_header_name(name);
        let canonical = HEADER_ALIASES
            .iter()
            .find(|(alias, _)| *alias == name)
            .map(|(_, canonical)| canonical.to_string())
            .unwrap_or(name);
        // First occurrence wins so an explicit canonical column beats a later alias.
        map.entry(canonical).or_insert(idx);
    }
    map
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase().replace([' ', '-'], "_")
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    for name in REQUIRED_COLUMNS {
        if !header_map.contains_key(name) {
            return Err(AppError::input(format!("Missing required column: `{name}`")));
        }
    }
    Ok(())
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>, strict: bool) -> Result<RiskAssessment, String> {
    let id = get_required(record, header_map, "id")?.to_string();
    let hazard = get_required(record, header_map, "hazard")?.to_string();

    let severity = parse_factor(get_optional(record, header_map, "severity"), "severity", strict)?;
    let probability = parse_factor(get_optional(record, header_map, "probability"), "probability", strict)?;
    let severity_after = parse_factor(get_optional(record, header_map, "severity_after"), "severity_after", strict)?;
    let probability_after = parse_factor(
        get_optional(record, header_map, "probability_after"),
        "probability_after",
        strict,
    )?;

    let assessed_on = get_optional(record, header_map, "assessed_on").map(parse_date).transpose()?;
    let review_due = get_optional(record, header_map, "review_due").map(parse_date).transpose()?;

    Ok(RiskAssessment {
        id,
        site: get_optional(record, header_map, "site").map(str::to_string),
        hazard,
        persons_at_risk: get_optional(record, header_map, "persons_at_risk").map(str::to_string),
        controls: get_optional(record, header_map, "controls").map(str::to_string),
        severity,
        probability,
        severity_after,
        probability_after,
        assessor: get_optional(record, header_map, "assessor").map(str::to_string),
        assessed_on,
        review_due,
    })
}

/// Parse a severity/probability cell.
///
/// Blank, `-` and `0` all mean unset. With `strict`, set values must be 1–5;
/// without it they are passed through untouched.
pub fn parse_factor(value: Option<&str>, name: &str, strict: bool) -> Result<Factor, String> {
    let Some(s) = value else {
        return Ok(None);
    };
    if s == "-" {
        return Ok(None);
    }
    let v = s
        .parse::<i32>()
        .map_err(|_| format!("Invalid `{name}` value '{s}': expected a whole number."))?;
    if v == 0 {
        return Ok(None);
    }
    if strict && !(FACTOR_MIN..=FACTOR_MAX).contains(&v) {
        return Err(format!(
            "`{name}` value {v} is outside {FACTOR_MIN}-{FACTOR_MAX} (use --no-strict to accept it)."
        ));
    }
    Ok(Some(v))
}

fn matches_filter(value: Option<&str>, filter: Option<&str>) -> bool {
    match filter {
        None => true,
        Some(f) => value.is_some_and(|v| v.eq_ignore_ascii_case(f.trim())),
    }
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_optional<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

/// Parse a date in one of the formats register exports commonly use.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    const FMTS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, DD/MM/YYYY, DD-MM-YYYY, YYYY/MM/DD."
    ))
}

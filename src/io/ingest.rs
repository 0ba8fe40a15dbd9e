//! CSV ingest and normalization.
//!
//! Turns a CSV with `x`, `y` and an optional `weight` column into a clean
//! `Dataset` that is safe to fit.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **No fitting logic here**

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{Dataset, Observation};
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: normalized dataset + row errors.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub dataset: Dataset,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Load a dataset from a CSV file.
pub fn load_dataset(path: &Path) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::invalid_input(format!("Failed to open CSV '{}': {e}", path.display())))?;
    let ingest = read_dataset(file, &path.display().to_string())?;

    log::info!(
        "loaded {} of {} rows from '{}'",
        ingest.dataset.len(),
        ingest.rows_read,
        path.display()
    );
    for err in &ingest.row_errors {
        log::warn!("{}: line {}: {}", path.display(), err.line, err.message);
    }

    Ok(ingest)
}

/// Read a dataset from any CSV source.
pub fn read_dataset<R: Read>(source: R, label: &str) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| AppError::invalid_input(format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    for required in ["x", "y"] {
        if !header_map.contains_key(required) {
            return Err(AppError::invalid_input(format!("Missing required column: `{required}`")));
        }
    }

    let mut points = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: header is line 1 and lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &header_map) {
            Ok(point) => points.push(point),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    if points.is_empty() {
        return Err(AppError::insufficient_data(format!(
            "No valid rows in '{label}' ({rows_read} read, {} rejected).",
            row_errors.len()
        )));
    }

    Ok(IngestedData {
        dataset: Dataset {
            label: label.to_string(),
            points,
        },
        row_errors,
        rows_read,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<Observation, String> {
    let x = parse_required_f64(record, header_map, "x")?;
    let y = parse_required_f64(record, header_map, "y")?;

    let weight = match get_optional(record, header_map, "weight") {
        None => 1.0,
        Some(s) => s
            .parse::<f64>()
            .ok()
            .filter(|w| w.is_finite() && *w > 0.0)
            .ok_or_else(|| format!("Invalid `weight` '{s}' (must be finite and > 0)."))?,
    };

    Ok(Observation { x, y, weight })
}

fn parse_required_f64(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<f64, String> {
    let s = get_optional(record, header_map, name).ok_or_else(|| format!("Missing required value: `{name}`"))?;
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("Invalid `{name}` '{s}' (must be a finite number)."))
}

fn get_optional<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_points_and_default_weights() {
        let csv = "x,y\n0,5\n1,4.9\n2.5,4.7\n";
        let ingest = read_dataset(csv.as_bytes(), "mem").unwrap();
        assert_eq!(ingest.rows_read, 3);
        assert!(ingest.row_errors.is_empty());
        assert_eq!(ingest.dataset.points[2], Observation { x: 2.5, y: 4.7, weight: 1.0 });
        assert_eq!(ingest.dataset.label, "mem");
    }

    #[test]
    fn headers_are_case_insensitive_and_bom_tolerant() {
        let csv = "\u{feff}X, Y ,Weight\n1,2,3\n";
        let ingest = read_dataset(csv.as_bytes(), "mem").unwrap();
        assert_eq!(ingest.dataset.points[0], Observation { x: 1.0, y: 2.0, weight: 3.0 });
    }

    #[test]
    fn bad_rows_are_skipped_with_line_numbers() {
        let csv = "x,y,weight\n1,2,\nfoo,3,\n4,,\n5,6,-1\n7,8,2\n";
        let ingest = read_dataset(csv.as_bytes(), "mem").unwrap();
        assert_eq!(ingest.dataset.len(), 2);
        let lines: Vec<usize> = ingest.row_errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![3, 4, 5]);
        assert!(ingest.row_errors[2].message.contains("weight"));
    }

    #[test]
    fn missing_column_is_schema_error() {
        let err = read_dataset("x,z\n1,2\n".as_bytes(), "mem").unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("`y`"));
    }

    #[test]
    fn no_valid_rows_is_insufficient_data() {
        let err = read_dataset("x,y\nnan,1\n".as_bytes(), "mem").unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn load_dataset_reports_missing_file() {
        let path = std::env::temp_dir().join("forcefit-does-not-exist.csv");
        let err = load_dataset(&path).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}

//! Read/write curve JSON files.
//!
//! Curve JSON is the portable representation of a fitted polynomial:
//! - degree + coefficients (highest power first)
//! - fit diagnostics and the fitted x domain
//! - a precomputed grid for quick plotting
//!
//! The schema is defined by `domain::CurveFile`.

use std::fs::File;
use std::path::Path;

use chrono::Utc;

use crate::domain::{CurveFile, CurveGrid, Dataset, DatasetStats, FitResult};
use crate::error::AppError;
use crate::models::predict_many;

pub const TOOL_NAME: &str = "forcefit";

/// Build the curve file contents for a fit evaluated on `grid`.
pub fn build_curve_file(best: &FitResult, dataset: &Dataset, stats: &DatasetStats, grid: &[f64]) -> CurveFile {
    CurveFile {
        tool: TOOL_NAME.to_string(),
        generated_at: Utc::now(),
        dataset: dataset.label.clone(),
        model: best.model.clone(),
        fit_quality: best.quality.clone(),
        domain: [stats.x_min, stats.x_max],
        grid: CurveGrid {
            x: grid.to_vec(),
            y: predict_many(&best.model.coefficients, grid),
        },
    }
}

/// Write a curve JSON file.
pub fn write_curve_json(path: &Path, curve: &CurveFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::invalid_input(format!("Failed to create curve JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, curve)
        .map_err(|e| AppError::invalid_input(format!("Failed to write curve JSON: {e}")))?;

    log::info!("wrote curve JSON to '{}'", path.display());
    Ok(())
}

/// Read a curve JSON file.
pub fn read_curve_json(path: &Path) -> Result<CurveFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::invalid_input(format!("Failed to open curve JSON '{}': {e}", path.display())))?;
    let curve: CurveFile = serde_json::from_reader(file)
        .map_err(|e| AppError::invalid_input(format!("Invalid curve JSON: {e}")))?;

    validate_curve(&curve)?;
    Ok(curve)
}

fn validate_curve(curve: &CurveFile) -> Result<(), AppError> {
    if curve.model.coefficients.len() != curve.model.degree + 1 {
        return Err(AppError::invalid_input(format!(
            "Invalid curve JSON: degree {} needs {} coefficients, found {}.",
            curve.model.degree,
            curve.model.degree + 1,
            curve.model.coefficients.len()
        )));
    }
    if curve.grid.x.len() != curve.grid.y.len() {
        return Err(AppError::invalid_input(
            "Invalid curve JSON: grid `x` and `y` lengths differ.",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::builtin_dataset;
    use crate::fit::fit_dataset;

    #[test]
    fn curve_json_written_and_read_back() {
        let ds = builtin_dataset();
        let stats = ds.stats().unwrap();
        let fit = fit_dataset(&ds, 5).unwrap();
        let curve = build_curve_file(&fit, &ds, &stats, &[0.0, 10.0, 30.0]);
        assert_eq!(curve.domain, [0.0, 30.0]);
        assert_eq!(curve.grid.y.len(), 3);

        let path = std::env::temp_dir().join(format!("forcefit-curve-{}.json", std::process::id()));
        write_curve_json(&path, &curve).unwrap();
        let back = read_curve_json(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(back.tool, TOOL_NAME);
        assert_eq!(back.model, curve.model);
        assert_eq!(back.grid.x, curve.grid.x);
    }

    #[test]
    fn inconsistent_curve_is_rejected() {
        let ds = builtin_dataset();
        let stats = ds.stats().unwrap();
        let fit = fit_dataset(&ds, 2).unwrap();
        let mut curve = build_curve_file(&fit, &ds, &stats, &[0.0, 1.0]);
        curve.model.coefficients.pop();
        assert_eq!(validate_curve(&curve).unwrap_err().exit_code(), 2);
    }
}

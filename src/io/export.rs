//! Export per-point results to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::PointResidual;
use crate::error::AppError;

const HEADER: &str = "x,y_obs,y_fit,y_fit_expanded,residual,weight";

/// Write per-point results to a CSV file.
pub fn write_results_csv(path: &Path, residuals: &[PointResidual]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::invalid_input(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_results(file, residuals)?;
    log::info!("wrote {} rows to '{}'", residuals.len(), path.display());
    Ok(())
}

fn write_results<W: Write>(mut out: W, residuals: &[PointResidual]) -> Result<(), AppError> {
    writeln!(out, "{HEADER}")
        .map_err(|e| AppError::invalid_input(format!("Failed to write export CSV header: {e}")))?;

    for r in residuals {
        writeln!(
            out,
            "{},{},{:.10},{:.10},{:.10},{}",
            r.point.x, r.point.y, r.y_fit, r.y_fit_expanded, r.residual, r.point.weight,
        )
        .map_err(|e| AppError::invalid_input(format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Observation;

    #[test]
    fn writes_header_and_rows() {
        let rows = vec![PointResidual {
            point: Observation { x: 2.5, y: 4.7, weight: 1.0 },
            y_fit: 4.6,
            y_fit_expanded: 4.6,
            residual: 0.1,
        }];
        let mut buf = Vec::new();
        write_results(&mut buf, &rows).unwrap();
        let txt = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines[0], HEADER);
        assert_eq!(lines[1], "2.5,4.7,4.6000000000,4.6000000000,0.1000000000,1");
    }
}

//! Reporting utilities: residuals, evaluation checks, and formatted output.

pub mod format;

pub use format::*;

use crate::domain::{Dataset, FitResult, PointResidual};
use crate::error::AppError;
use crate::models::{predict, predict_expanded};

/// Compute fitted values (both evaluation paths) and residuals for each point.
pub fn compute_residuals(dataset: &Dataset, fit: &FitResult) -> Result<Vec<PointResidual>, AppError> {
    let c = &fit.model.coefficients;
    let mut out = Vec::with_capacity(dataset.len());
    for p in &dataset.points {
        let y_fit = predict(c, p.x);
        let y_fit_expanded = predict_expanded(c, p.x);
        if !y_fit.is_finite() || !y_fit_expanded.is_finite() {
            return Err(AppError::numerical(
                "Non-finite polynomial prediction during residual computation.",
            ));
        }
        out.push(PointResidual {
            point: *p,
            y_fit,
            y_fit_expanded,
            residual: p.y - y_fit,
        });
    }
    Ok(out)
}

/// The `top_n` points with the largest absolute residual, largest first.
pub fn largest_residuals(residuals: &[PointResidual], top_n: usize) -> Vec<PointResidual> {
    let mut sorted = residuals.to_vec();
    sorted.sort_by(|a, b| {
        b.residual
            .abs()
            .partial_cmp(&a.residual.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    sorted.truncate(top_n);
    sorted
}

/// Agreement between Horner and expanded evaluation over a set of abscissae.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationCheck {
    pub n: usize,
    pub max_abs_diff: f64,
    /// Where the largest difference occurred.
    pub at_x: f64,
}

/// Compare the two evaluation paths at every `x`.
pub fn evaluation_check(coefficients: &[f64], xs: &[f64]) -> EvaluationCheck {
    let mut check = EvaluationCheck {
        n: xs.len(),
        max_abs_diff: 0.0,
        at_x: f64::NAN,
    };
    for &x in xs {
        let d = (predict(coefficients, x) - predict_expanded(coefficients, x)).abs();
        if d > check.max_abs_diff || check.at_x.is_nan() {
            check.max_abs_diff = d;
            check.at_x = x;
        }
    }
    check
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CurveModel, FitQuality, Observation};

    fn line_fit() -> FitResult {
        FitResult {
            model: CurveModel {
                degree: 1,
                coefficients: vec![1.0, 0.0],
            },
            quality: FitQuality { sse: 0.0, rmse: 0.0, r_squared: 1.0, bic: 0.0, n: 3, rank: 2 },
        }
    }

    fn dataset() -> Dataset {
        Dataset {
            label: "t".to_string(),
            points: vec![
                Observation { x: 1.0, y: 1.0, weight: 1.0 },
                Observation { x: 2.0, y: 5.0, weight: 1.0 },
                Observation { x: 3.0, y: 1.0, weight: 1.0 },
            ],
        }
    }

    #[test]
    fn compute_residuals_basic() {
        let residuals = compute_residuals(&dataset(), &line_fit()).unwrap();
        assert_eq!(residuals.len(), 3);
        assert_eq!(residuals[0].residual, 0.0);
        assert_eq!(residuals[1].residual, 3.0);
        assert_eq!(residuals[2].residual, -2.0);
        assert_eq!(residuals[1].y_fit, residuals[1].y_fit_expanded);
    }

    #[test]
    fn largest_residuals_by_magnitude() {
        let residuals = compute_residuals(&dataset(), &line_fit()).unwrap();
        let top = largest_residuals(&residuals, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].point.x, 2.0);
        assert_eq!(top[1].point.x, 3.0);
    }

    #[test]
    fn evaluation_check_reports_tiny_difference() {
        let c = [1e-5, -3e-4, 2e-3, -0.1, 0.05, 5.0];
        let xs: Vec<f64> = (0..=30).map(|i| i as f64).collect();
        let check = evaluation_check(&c, &xs);
        assert_eq!(check.n, 31);
        assert!(check.max_abs_diff < 1e-9);
        assert!(check.at_x.is_finite());
    }
}

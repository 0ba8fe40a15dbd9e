//! Chart data preparation shared by the SVG export and the TUI chart.
//!
//! All series and bounds are computed here, outside any render call, so the
//! renderers stay focused on drawing.

use crate::domain::{CurveFile, ForceKind, PointResidual};
use crate::math::sample_range;
use crate::models::{ForceModel, predict, predict_expanded};

/// Number of samples for the smooth curve over the observed range.
const DENSE_SAMPLES: usize = 200;

/// Expanded-evaluation markers drawn for a saved curve.
const CURVE_MARKERS: usize = 20;

/// Plot-ready series for one fit.
#[derive(Debug, Clone, Default)]
pub struct ChartSeries {
    /// Observed `(x, y)` pairs.
    pub observed: Vec<(f64, f64)>,
    /// Observed points with the largest residuals.
    pub highlighted: Vec<(f64, f64)>,
    /// Horner evaluation at the observed x values (sorted by x).
    pub fit_observed: Vec<(f64, f64)>,
    /// Expanded evaluation at the observed x values (sorted by x).
    pub expanded_observed: Vec<(f64, f64)>,
    /// Smooth curve across the observed x range.
    pub fit_dense: Vec<(f64, f64)>,
    /// Horner evaluation on the extrapolation grid.
    pub fit_grid: Vec<(f64, f64)>,
    /// Finite force samples on the extrapolation grid (empty without overlay).
    pub force_grid: Vec<(f64, f64)>,
    pub force_kind: Option<ForceKind>,
}

impl ChartSeries {
    pub fn build(
        residuals: &[PointResidual],
        highlights: &[PointResidual],
        coefficients: &[f64],
        grid: &[f64],
        force: Option<ForceModel>,
    ) -> Self {
        let observed: Vec<(f64, f64)> = residuals.iter().map(|r| (r.point.x, r.point.y)).collect();
        let highlighted = highlights.iter().map(|r| (r.point.x, r.point.y)).collect();

        let mut xs: Vec<f64> = residuals.iter().map(|r| r.point.x).collect();
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let fit_observed = xs.iter().map(|&x| (x, predict(coefficients, x))).collect();
        let expanded_observed = xs.iter().map(|&x| (x, predict_expanded(coefficients, x))).collect();

        let (x_min, x_max) = match (xs.first(), xs.last()) {
            (Some(&a), Some(&b)) => (a, b),
            _ => (0.0, 1.0),
        };
        let fit_dense = sample_range(x_min, x_max, DENSE_SAMPLES)
            .into_iter()
            .map(|x| (x, predict(coefficients, x)))
            .collect();

        let fit_grid = grid.iter().map(|&x| (x, predict(coefficients, x))).collect();
        let force_grid = force.map(|f| f.sample(grid)).unwrap_or_default();

        Self {
            observed,
            highlighted,
            fit_observed,
            expanded_observed,
            fit_dense,
            fit_grid,
            force_grid,
            force_kind: force.map(|f| f.kind),
        }
    }

    /// Series for a saved curve: no observations, the fit sampled over its domain.
    pub fn from_curve(curve: &CurveFile) -> Self {
        let c = &curve.model.coefficients;
        let [lo, hi] = curve.domain;
        let fit_dense: Vec<(f64, f64)> = sample_range(lo, hi, DENSE_SAMPLES)
            .into_iter()
            .map(|x| (x, predict(c, x)))
            .collect();
        let expanded_observed = sample_range(lo, hi, CURVE_MARKERS)
            .into_iter()
            .map(|x| (x, predict_expanded(c, x)))
            .collect();
        let fit_grid = curve.grid.x.iter().copied().zip(curve.grid.y.iter().copied()).collect();

        Self {
            fit_observed: fit_dense.clone(),
            expanded_observed,
            fit_dense,
            fit_grid,
            ..Self::default()
        }
    }
}

/// Padded `(x_bounds, y_bounds)` covering every finite point of every series.
///
/// Falls back to the unit square when nothing finite is present.
pub fn bounds(series: &[&[(f64, f64)]]) -> ([f64; 2], [f64; 2]) {
    let (mut x0, mut x1) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y0, mut y1) = (f64::INFINITY, f64::NEG_INFINITY);
    for s in series {
        for &(x, y) in s.iter() {
            if x.is_finite() && y.is_finite() {
                x0 = x0.min(x);
                x1 = x1.max(x);
                y0 = y0.min(y);
                y1 = y1.max(y);
            }
        }
    }

    (padded([x0, x1], 0.02), padded([y0, y1], 0.05))
}

fn padded(range: [f64; 2], frac: f64) -> [f64; 2] {
    let [lo, hi] = range;
    if !(lo.is_finite() && hi.is_finite()) {
        return [0.0, 1.0];
    }
    if hi <= lo {
        return [lo - 0.5, hi + 0.5];
    }
    let pad = ((hi - lo) * frac).max(1e-12);
    [lo - pad, hi + pad]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Observation;

    fn residual(x: f64, y: f64) -> PointResidual {
        PointResidual {
            point: Observation { x, y, weight: 1.0 },
            y_fit: y,
            y_fit_expanded: y,
            residual: 0.0,
        }
    }

    #[test]
    fn series_sorted_and_force_filtered() {
        let residuals = vec![residual(3.0, 1.0), residual(1.0, 2.0)];
        let force = ForceModel::new(ForceKind::Inverse, 1.0, 0.1);
        let s = ChartSeries::build(&residuals, &[], &[1.0, 0.0], &[0.0, 2.0, 4.0], Some(force));

        assert_eq!(s.fit_observed, vec![(1.0, 1.0), (3.0, 3.0)]);
        assert_eq!(s.fit_observed, s.expanded_observed);
        assert_eq!(s.fit_dense.len(), DENSE_SAMPLES);
        assert_eq!(s.fit_grid.len(), 3);
        assert_eq!(s.force_grid, vec![(2.0, 0.5), (4.0, 0.25)]);
        assert_eq!(s.force_kind, Some(ForceKind::Inverse));
    }

    #[test]
    fn saved_curve_series_has_no_observations() {
        use crate::domain::{CurveGrid, CurveModel, FitQuality};

        let curve = CurveFile {
            tool: "forcefit".to_string(),
            generated_at: chrono::Utc::now(),
            dataset: "builtin".to_string(),
            model: CurveModel { degree: 1, coefficients: vec![2.0, 1.0] },
            fit_quality: FitQuality { sse: 0.0, rmse: 0.0, r_squared: 1.0, bic: 0.0, n: 2, rank: 2 },
            domain: [0.0, 10.0],
            grid: CurveGrid { x: vec![0.0, 100.0], y: vec![1.0, 201.0] },
        };
        let s = ChartSeries::from_curve(&curve);
        assert!(s.observed.is_empty() && s.force_grid.is_empty());
        assert_eq!(s.fit_dense.len(), DENSE_SAMPLES);
        assert_eq!(s.expanded_observed.len(), CURVE_MARKERS);
        assert_eq!(s.expanded_observed[CURVE_MARKERS - 1], (10.0, 21.0));
        assert_eq!(s.fit_grid, vec![(0.0, 1.0), (100.0, 201.0)]);
    }

    #[test]
    fn bounds_pad_and_ignore_non_finite() {
        let a = [(0.0, 0.0), (10.0, 100.0), (5.0, f64::INFINITY)];
        let (xb, yb) = bounds(&[&a]);
        assert!((xb[0] + 0.2).abs() < 1e-12 && (xb[1] - 10.2).abs() < 1e-12);
        assert!((yb[0] + 5.0).abs() < 1e-12 && (yb[1] - 105.0).abs() < 1e-12);
    }

    #[test]
    fn bounds_fall_back_for_empty() {
        assert_eq!(bounds(&[]), ([0.0, 1.0], [0.0, 1.0]));
    }
}

//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON/CSV
//! - reloaded later for plotting

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Which force model (if any) to overlay on plots.
///
/// The force model never takes part in the fit; it is a visual reference only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ForceOverlay {
    /// No overlay (the default).
    None,
    /// `F(x) = 1 / x`.
    Inverse,
    /// `F(x) = -a / x - k * sqrt(x)`.
    Screened,
}

/// Concrete force model kind after resolving `ForceOverlay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForceKind {
    Inverse,
    Screened,
}

impl ForceOverlay {
    pub fn to_kind(self) -> Option<ForceKind> {
        match self {
            ForceOverlay::None => None,
            ForceOverlay::Inverse => Some(ForceKind::Inverse),
            ForceOverlay::Screened => Some(ForceKind::Screened),
        }
    }

    /// Cycle order used by the TUI.
    pub fn next(self) -> Self {
        match self {
            ForceOverlay::None => ForceOverlay::Inverse,
            ForceOverlay::Inverse => ForceOverlay::Screened,
            ForceOverlay::Screened => ForceOverlay::None,
        }
    }
}

impl ForceKind {
    /// Human-readable label for terminal output and chart legends.
    pub fn display_name(self) -> &'static str {
        match self {
            ForceKind::Inverse => "F(x) = 1/x",
            ForceKind::Screened => "F(x) = -a/x - k*sqrt(x)",
        }
    }
}

/// How the polynomial degree is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegreeMode {
    /// Fit exactly this degree.
    Fixed(usize),
    /// Fit every degree in `1..=max` and select by BIC.
    Auto { max: usize },
}

/// A single `(x, y)` observation with its objective weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub x: f64,
    pub y: f64,
    /// Weight of the squared residual in the fit objective (higher means more influence).
    pub weight: f64,
}

/// A labelled set of observations.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Where the data came from (`builtin` or a file path).
    pub label: String,
    pub points: Vec<Observation>,
}

impl Dataset {
    pub fn xs(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.x).collect()
    }

    pub fn ys(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.y).collect()
    }

    pub fn weights(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.weight).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Summary ranges; `None` if the dataset is empty or contains non-finite values.
    pub fn stats(&self) -> Option<DatasetStats> {
        let mut x_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;

        for p in &self.points {
            x_min = x_min.min(p.x);
            x_max = x_max.max(p.x);
            y_min = y_min.min(p.y);
            y_max = y_max.max(p.y);
        }

        if !x_min.is_finite() || !x_max.is_finite() || !y_min.is_finite() || !y_max.is_finite() {
            return None;
        }

        Some(DatasetStats {
            n_points: self.points.len(),
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }
}

/// Summary stats about the points used for fitting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatasetStats {
    pub n_points: usize,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

/// Fitted polynomial.
///
/// Coefficients are stored highest power first, so `coefficients[0]` multiplies
/// `x^degree` and the last entry is the constant term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveModel {
    pub degree: usize,
    pub coefficients: Vec<f64>,
}

/// Fit quality diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitQuality {
    /// Weighted sum of squared residuals.
    pub sse: f64,
    pub rmse: f64,
    pub r_squared: f64,
    pub bic: f64,
    pub n: usize,
    /// Numerical rank of the scaled design matrix.
    pub rank: usize,
}

/// Fit output for a single degree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub model: CurveModel,
    pub quality: FitQuality,
}

/// A per-point fitted result (used for tables, highlights and exports).
#[derive(Debug, Clone, PartialEq)]
pub struct PointResidual {
    pub point: Observation,
    /// Fitted value from Horner evaluation.
    pub y_fit: f64,
    /// Fitted value from the expanded power-sum evaluation.
    pub y_fit_expanded: f64,
    pub residual: f64,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct FitConfig {
    /// Optional CSV dataset; the built-in dataset is used when absent.
    pub data_path: Option<PathBuf>,
    pub degree_mode: DegreeMode,

    pub force: ForceOverlay,
    pub force_a: f64,
    pub force_k: f64,

    /// Extrapolation grid (inclusive endpoints).
    pub grid_min: f64,
    pub grid_max: f64,
    pub grid_steps: usize,

    pub top_n: usize,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub svg: Option<PathBuf>,
    pub export_results: Option<PathBuf>,
    pub export_curve: Option<PathBuf>,
}

/// A saved curve file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub dataset: String,
    pub model: CurveModel,
    pub fit_quality: FitQuality,
    /// Observed x range the polynomial was fitted on.
    pub domain: [f64; 2],
    pub grid: CurveGrid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveGrid {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_cover_all_points() {
        let ds = Dataset {
            label: "t".to_string(),
            points: vec![
                Observation { x: 2.0, y: -1.0, weight: 1.0 },
                Observation { x: -3.0, y: 4.0, weight: 1.0 },
            ],
        };
        let s = ds.stats().unwrap();
        assert_eq!((s.x_min, s.x_max, s.y_min, s.y_max), (-3.0, 2.0, -1.0, 4.0));
        assert_eq!(s.n_points, 2);
    }

    #[test]
    fn stats_none_for_empty() {
        let ds = Dataset { label: "t".to_string(), points: Vec::new() };
        assert!(ds.stats().is_none());
    }

    #[test]
    fn force_overlay_cycles_back_to_none() {
        let mut f = ForceOverlay::None;
        for _ in 0..3 {
            f = f.next();
        }
        assert_eq!(f, ForceOverlay::None);
    }
}

//! Shared "fit pipeline" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load data -> fit/select degree -> residuals -> evaluation checks -> grid + overlay
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use crate::data::builtin_dataset;
use crate::domain::{Dataset, DatasetStats, FitConfig, PointResidual};
use crate::error::AppError;
use crate::fit::selection::FitSelection;
use crate::io::ingest::{RowError, load_dataset};
use crate::math::linspace;
use crate::models::ForceModel;
use crate::plot::ChartSeries;
use crate::report::EvaluationCheck;

/// All computed outputs of a single `forcefit fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub dataset: Dataset,
    pub row_errors: Vec<RowError>,
    pub stats: DatasetStats,
    pub selection: FitSelection,
    pub residuals: Vec<PointResidual>,
    /// Largest absolute residuals, largest first.
    pub largest: Vec<PointResidual>,
    /// Extrapolation grid.
    pub grid: Vec<f64>,
    pub eval_observed: EvaluationCheck,
    pub eval_grid: EvaluationCheck,
    pub force: Option<ForceModel>,
}

impl RunOutput {
    /// Plot-ready series for the chosen fit.
    pub fn chart_series(&self) -> ChartSeries {
        ChartSeries::build(
            &self.residuals,
            &self.largest,
            &self.selection.best.model.coefficients,
            &self.grid,
            self.force,
        )
    }
}

/// Load the configured dataset (CSV or built-in).
pub fn load_input(config: &FitConfig) -> Result<(Dataset, Vec<RowError>), AppError> {
    match &config.data_path {
        Some(path) => {
            let ingest = load_dataset(path)?;
            Ok((ingest.dataset, ingest.row_errors))
        }
        None => {
            log::debug!("using built-in dataset");
            Ok((builtin_dataset(), Vec::new()))
        }
    }
}

/// Execute the full fitting pipeline and return the computed outputs.
pub fn run_fit(config: &FitConfig) -> Result<RunOutput, AppError> {
    let (dataset, row_errors) = load_input(config)?;
    run_fit_with_dataset(config, dataset, row_errors)
}

/// Execute the fitting pipeline on an already loaded dataset.
///
/// The TUI uses this to refit without re-reading the CSV.
pub fn run_fit_with_dataset(
    config: &FitConfig,
    dataset: Dataset,
    row_errors: Vec<RowError>,
) -> Result<RunOutput, AppError> {
    let stats = dataset
        .stats()
        .ok_or_else(|| AppError::insufficient_data("Dataset has no usable points."))?;

    let selection = crate::fit::selection::fit_and_select(&dataset, config.degree_mode)?;

    let residuals = crate::report::compute_residuals(&dataset, &selection.best)?;
    let largest = crate::report::largest_residuals(&residuals, config.top_n);

    let grid = linspace(config.grid_min, config.grid_max, config.grid_steps)?;
    let coefficients = &selection.best.model.coefficients;
    let eval_observed = crate::report::evaluation_check(coefficients, &dataset.xs());
    let eval_grid = crate::report::evaluation_check(coefficients, &grid);
    log::debug!(
        "evaluation paths differ by at most {:.3e} (observed) / {:.3e} (grid)",
        eval_observed.max_abs_diff,
        eval_grid.max_abs_diff
    );

    let force = config
        .force
        .to_kind()
        .map(|kind| ForceModel::new(kind, config.force_a, config.force_k));

    Ok(RunOutput {
        dataset,
        row_errors,
        stats,
        selection,
        residuals,
        largest,
        grid,
        eval_observed,
        eval_grid,
        force,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DegreeMode, ForceKind, ForceOverlay};

    fn default_config() -> FitConfig {
        FitConfig {
            data_path: None,
            degree_mode: DegreeMode::Fixed(5),
            force: ForceOverlay::None,
            force_a: 1.0,
            force_k: 0.1,
            grid_min: 0.0,
            grid_max: 1000.0,
            grid_steps: 1000,
            top_n: 3,
            plot: false,
            plot_width: 80,
            plot_height: 20,
            svg: None,
            export_results: None,
            export_curve: None,
        }
    }

    #[test]
    fn builtin_run_with_default_settings() {
        let run = run_fit(&default_config()).unwrap();
        assert_eq!(run.dataset.len(), 17);
        assert_eq!(run.selection.best.model.degree, 5);
        assert_eq!(run.grid.len(), 1000);
        assert_eq!(run.grid[999], 1000.0);
        assert_eq!(run.largest.len(), 3);
        assert!(run.force.is_none());
        assert!(run.eval_observed.max_abs_diff < 1e-9);

        let series = run.chart_series();
        assert!(series.force_grid.is_empty());
        assert_eq!(series.fit_grid.len(), 1000);
    }

    #[test]
    fn screened_overlay_drops_the_pole() {
        let mut config = default_config();
        config.force = ForceOverlay::Screened;
        let run = run_fit(&config).unwrap();
        assert_eq!(run.force.map(|f| f.kind), Some(ForceKind::Screened));

        let series = run.chart_series();
        assert_eq!(series.force_grid.len(), 999);
        assert!(series.force_grid.iter().all(|&(_, y)| y.is_finite()));
    }

    #[test]
    fn missing_csv_is_invalid_input() {
        let mut config = default_config();
        config.data_path = Some("/nonexistent/forcefit.csv".into());
        assert_eq!(run_fit(&config).unwrap_err().exit_code(), 2);
    }

    #[test]
    fn bad_grid_is_invalid_input() {
        let mut config = default_config();
        config.grid_steps = 1;
        assert_eq!(run_fit(&config).unwrap_err().exit_code(), 2);
    }
}

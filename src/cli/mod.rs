//! Command-line parsing for the polynomial force fitter.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the fitting/math code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::data::{DEFAULT_DEGREE, DEFAULT_GRID_MAX, DEFAULT_GRID_MIN, DEFAULT_GRID_STEPS, FORCE_A, FORCE_K};
use crate::domain::ForceOverlay;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "forcefit", version, about = "Least-squares polynomial fit with force-model overlays")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit the dataset, print diagnostics and optionally plot/export.
    Fit(FitArgs),
    /// Plot a previously exported curve JSON.
    Plot(PlotArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same fit pipeline as `forcefit fit`, but renders results
    /// in a terminal UI using Ratatui.
    Tui(FitArgs),
}

/// Options shared by `fit` and `tui`.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// CSV dataset with `x`, `y` and optional `weight` columns (built-in data when omitted).
    #[arg(short = 'd', long, value_name = "CSV")]
    pub data: Option<PathBuf>,

    /// Polynomial degree.
    #[arg(long, default_value_t = DEFAULT_DEGREE)]
    pub degree: usize,

    /// Select the degree by BIC instead of using `--degree`.
    #[arg(long)]
    pub auto_degree: bool,

    /// Highest degree tried by `--auto-degree`.
    #[arg(long, default_value_t = 8)]
    pub max_degree: usize,

    /// Force model overlay drawn on the extrapolation grid.
    #[arg(long, value_enum, default_value_t = ForceOverlay::None)]
    pub force: ForceOverlay,

    /// Coefficient `a` of the screened force.
    #[arg(long, default_value_t = FORCE_A, allow_negative_numbers = true)]
    pub force_a: f64,

    /// Coefficient `k` of the screened force.
    #[arg(long, default_value_t = FORCE_K, allow_negative_numbers = true)]
    pub force_k: f64,

    /// Start of the extrapolation grid.
    #[arg(long, default_value_t = DEFAULT_GRID_MIN, allow_negative_numbers = true)]
    pub grid_min: f64,

    /// End of the extrapolation grid (inclusive).
    #[arg(long, default_value_t = DEFAULT_GRID_MAX, allow_negative_numbers = true)]
    pub grid_max: f64,

    /// Number of grid points.
    #[arg(long, default_value_t = DEFAULT_GRID_STEPS)]
    pub grid_steps: usize,

    /// Show the top-N largest residuals.
    #[arg(long, default_value_t = 5)]
    pub top: usize,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Write the two-panel chart to an SVG file.
    #[arg(long, value_name = "SVG")]
    pub svg: Option<PathBuf>,

    /// Export per-point results to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export curve (coefficients + diagnostics + fitted grid) to JSON.
    #[arg(long = "export-curve")]
    pub export_curve: Option<PathBuf>,
}

/// Options for plotting a saved curve.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Curve JSON file produced by `forcefit fit --export-curve`.
    #[arg(long, value_name = "JSON")]
    pub curve: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Also write the saved curve as an SVG chart.
    #[arg(long, value_name = "SVG")]
    pub svg: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_defaults_use_degree_five_and_wide_grid() {
        let cli = Cli::parse_from(["forcefit", "fit"]);
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(args.degree, 5);
        assert!(!args.auto_degree);
        assert_eq!(args.force, ForceOverlay::None);
        assert_eq!((args.grid_min, args.grid_max, args.grid_steps), (0.0, 1000.0, 1000));
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn verbosity_is_global_and_counted() {
        let cli = Cli::parse_from(["forcefit", "fit", "-vv", "--force", "screened", "--force-k", "-0.2"]);
        assert_eq!(cli.verbose, 2);
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(args.force, ForceOverlay::Screened);
        assert_eq!(args.force_k, -0.2);
    }
}

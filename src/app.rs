//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and installs the logger
//! - loads the dataset (CSV or built-in)
//! - runs the polynomial fit + degree selection
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, FitArgs, PlotArgs};
use crate::domain::{DegreeMode, FitConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `forcefit` binary.
pub fn run() -> Result<(), AppError> {
    // We want `forcefit` and `forcefit --degree 3` to behave like `forcefit fit ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    // The TUI owns the terminal; only errors may reach stderr while it runs.
    let level = match cli.command {
        Command::Tui(_) => log::LevelFilter::Error,
        _ => crate::logging::level_for_verbosity(cli.verbose),
    };
    crate::logging::setup_global_logger(level)?;

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Plot(args) => handle_plot(args),
        Command::Tui(args) => handle_tui(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(&args);
    let run = pipeline::run_fit(&config)?;
    let coefficients = &run.selection.best.model.coefficients;

    println!(
        "{}",
        crate::report::format_run_summary(&run.dataset, &run.stats, &run.selection, &config)
    );
    if !run.row_errors.is_empty() {
        println!("Skipped {} invalid CSV rows (see warnings).\n", run.row_errors.len());
    }
    println!("Coefficients (highest power first):");
    println!("{}\n", crate::report::format_coefficients(coefficients));
    print!("{}", crate::report::format_evaluation_check("observed", &run.eval_observed));
    println!("{}", crate::report::format_evaluation_check("grid", &run.eval_grid));
    println!("{}", crate::report::format_residual_table(&run.largest));

    if config.plot {
        let plot = crate::plot::render_ascii_plot(
            &run.residuals,
            coefficients,
            config.plot_width,
            config.plot_height,
            &run.largest,
        );
        println!("{plot}");
    }

    // Optional exports.
    if let Some(path) = &config.svg {
        let title = format!("{} | degree {}", run.dataset.label, run.selection.best.model.degree);
        crate::plot::render_svg(path, &run.chart_series(), &title, 1200, 500)?;
    }
    if let Some(path) = &config.export_results {
        crate::io::export::write_results_csv(path, &run.residuals)?;
    }
    if let Some(path) = &config.export_curve {
        let curve = crate::io::curve::build_curve_file(&run.selection.best, &run.dataset, &run.stats, &run.grid);
        crate::io::curve::write_curve_json(path, &curve)?;
    }

    Ok(())
}

fn handle_tui(args: FitArgs) -> Result<(), AppError> {
    crate::tui::run(args)
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let curve = crate::io::curve::read_curve_json(&args.curve)?;

    println!(
        "{} | degree {} | {}",
        curve.dataset,
        curve.model.degree,
        crate::models::expression(&curve.model.coefficients)
    );
    let plot = crate::plot::render_ascii_plot_from_curve_file(&curve, args.width, args.height);
    println!("{plot}");

    if let Some(path) = &args.svg {
        let title = format!("{} | degree {}", curve.dataset, curve.model.degree);
        crate::plot::render_svg(path, &crate::plot::ChartSeries::from_curve(&curve), &title, 1200, 500)?;
    }
    Ok(())
}

pub fn fit_config_from_args(args: &FitArgs) -> FitConfig {
    let degree_mode = if args.auto_degree {
        DegreeMode::Auto { max: args.max_degree }
    } else {
        DegreeMode::Fixed(args.degree)
    };

    FitConfig {
        data_path: args.data.clone(),
        degree_mode,
        force: args.force,
        force_a: args.force_a,
        force_k: args.force_k,
        grid_min: args.grid_min,
        grid_max: args.grid_max,
        grid_steps: args.grid_steps,
        top_n: args.top,
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        svg: args.svg.clone(),
        export_results: args.export.clone(),
        export_curve: args.export_curve.clone(),
    }
}

/// Rewrite argv so `forcefit` defaults to `forcefit fit`.
///
/// Rules:
/// - `forcefit`                      -> `forcefit fit`
/// - `forcefit --degree 3 ...`       -> `forcefit fit --degree 3 ...`
/// - `forcefit --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("fit".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "fit" | "plot" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "fit flags".
    if arg1.starts_with('-') {
        argv.insert(1, "fit".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_runs_fit() {
        assert_eq!(rewrite_args(argv(&["forcefit"])), argv(&["forcefit", "fit"]));
    }

    #[test]
    fn leading_flags_go_to_fit() {
        assert_eq!(
            rewrite_args(argv(&["forcefit", "--degree", "3"])),
            argv(&["forcefit", "fit", "--degree", "3"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        let cases: [&[&str]; 3] = [
            &["forcefit", "tui"],
            &["forcefit", "--help"],
            &["forcefit", "plot", "--curve", "c.json"],
        ];
        for args in cases {
            assert_eq!(rewrite_args(argv(args)), argv(args));
        }
    }

    #[test]
    fn auto_degree_flag_selects_auto_mode() {
        let cli = crate::cli::Cli::parse_from(["forcefit", "fit", "--auto-degree", "--max-degree", "6", "--no-plot"]);
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        let config = fit_config_from_args(&args);
        assert_eq!(config.degree_mode, DegreeMode::Auto { max: 6 });
        assert!(!config.plot);
    }
}

//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized (important for snapshot tests)

use crate::domain::{Dataset, DatasetStats, FitConfig, PointResidual};
use crate::fit::selection::FitSelection;
use crate::models::expression;
use crate::report::EvaluationCheck;

/// Format the full run summary (dataset stats + fit diagnostics + chosen model).
pub fn format_run_summary(
    dataset: &Dataset,
    stats: &DatasetStats,
    selection: &FitSelection,
    config: &FitConfig,
) -> String {
    let mut out = String::new();

    out.push_str("=== forcefit - polynomial fit ===\n");
    out.push_str(&format!("Data: {}\n", dataset.label));
    out.push_str(&format!(
        "Points: n={} | x=[{:.3}, {:.3}] | y=[{:.3}, {:.3}]\n",
        stats.n_points, stats.x_min, stats.x_max, stats.y_min, stats.y_max
    ));
    out.push_str(&format!(
        "Grid: [{}, {}] with {} points\n",
        config.grid_min, config.grid_max, config.grid_steps
    ));
    if let Some(kind) = config.force.to_kind() {
        out.push_str(&format!(
            "Force overlay: {} (a={}, k={})\n",
            kind.display_name(),
            config.force_a,
            config.force_k
        ));
    }

    out.push_str("\nFit diagnostics:\n");
    for fit in &selection.fits {
        let chosen = if fit.model.degree == selection.best.model.degree { "*" } else { " " };
        out.push_str(&format!(
            "{chosen} degree {:<2} SSE={:.6} RMSE={:.6} R2={:.6} BIC={:.3} rank={}\n",
            fit.model.degree,
            fit.quality.sse,
            fit.quality.rmse,
            fit.quality.r_squared,
            fit.quality.bic,
            fit.quality.rank,
        ));
    }
    for (degree, reason) in &selection.skipped {
        out.push_str(&format!("  (skipped degree {degree}) {reason}\n"));
    }

    out.push_str("\nChosen polynomial:\n");
    out.push_str(&format!("{}\n", expression(&selection.best.model.coefficients)));

    out
}

/// Format the coefficient vector, highest power first.
pub fn format_coefficients(coefficients: &[f64]) -> String {
    let parts: Vec<String> = coefficients.iter().map(|&c| fmt_sci(c)).collect();
    format!("[{}]", parts.join(" "))
}

/// Format the agreement between the two evaluation paths.
pub fn format_evaluation_check(label: &str, check: &EvaluationCheck) -> String {
    format!(
        "Evaluation check ({label}, n={}): max |horner - expanded| = {:.3e} at x={}\n",
        check.n, check.max_abs_diff, check.at_x
    )
}

/// Format the per-point residual table.
pub fn format_residual_table(rows: &[PointResidual]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:>10} {:>12} {:>12} {:>12} {:>12}\n",
            "x", "y_obs", "y_fit", "y_expanded", "residual"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:-<10} {:-<12} {:-<12} {:-<12} {:-<12}", "", "", "", "", "").trim_end());
    out.push('\n');

    for r in rows {
        out.push_str(&format!(
            "{:>10.3} {:>12.6} {:>12.6} {:>12.6} {:>12.6}\n",
            r.point.x, r.point.y, r.y_fit, r.y_fit_expanded, r.residual
        ));
    }

    out
}

/// Scientific notation with a signed, zero-padded exponent (`-4.56854966e-06`).
///
/// Positive values get a leading space so columns line up.
fn fmt_sci(v: f64) -> String {
    if !v.is_finite() {
        return format!("{v}");
    }
    let s = format!("{v:.8e}");
    let Some((mantissa, exp)) = s.split_once('e') else {
        return s;
    };
    let exp: i32 = exp.parse().unwrap_or(0);
    let sign = if exp < 0 { '-' } else { '+' };
    let lead = if v.is_sign_negative() { "" } else { " " };
    format!("{lead}{mantissa}e{sign}{:02}", exp.abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CurveModel, FitQuality, FitResult, ForceOverlay, DegreeMode, Observation};

    #[test]
    fn fmt_sci_pads_exponent() {
        assert_eq!(fmt_sci(-4.568549658395727e-06), "-4.56854966e-06");
        assert_eq!(fmt_sci(4.991518983075935), " 4.99151898e+00");
        assert_eq!(fmt_sci(0.0), " 0.00000000e+00");
    }

    #[test]
    fn coefficients_are_bracketed() {
        assert_eq!(format_coefficients(&[1.0, -0.5]), "[ 1.00000000e+00 -5.00000000e-01]");
    }

    #[test]
    fn residual_table_has_header_and_rows() {
        let rows = vec![PointResidual {
            point: Observation { x: 2.5, y: 4.7, weight: 1.0 },
            y_fit: 4.6,
            y_fit_expanded: 4.6,
            residual: 0.1,
        }];
        let txt = format_residual_table(&rows);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].trim_start().starts_with('x'));
        assert!(lines[1].starts_with("----------"));
        assert!(lines[2].contains("2.500"));
        assert!(lines[2].contains("0.100000"));
    }

    #[test]
    fn summary_marks_chosen_degree() {
        let fit = |degree: usize, bic: f64| FitResult {
            model: CurveModel {
                degree,
                coefficients: vec![1.0; degree + 1],
            },
            quality: FitQuality { sse: 0.1, rmse: 0.1, r_squared: 0.9, bic, n: 10, rank: degree + 1 },
        };
        let selection = FitSelection {
            best: fit(2, -5.0),
            fits: vec![fit(1, 3.0), fit(2, -5.0)],
            skipped: vec![(3, "Underdetermined".to_string())],
        };
        let dataset = Dataset {
            label: "builtin".to_string(),
            points: vec![Observation { x: 0.0, y: 1.0, weight: 1.0 }],
        };
        let stats = DatasetStats { n_points: 10, x_min: 0.0, x_max: 1.0, y_min: 0.0, y_max: 1.0 };
        let config = FitConfig {
            data_path: None,
            degree_mode: DegreeMode::Auto { max: 3 },
            force: ForceOverlay::Inverse,
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
        };

        let txt = format_run_summary(&dataset, &stats, &selection, &config);
        assert!(txt.contains("* degree 2 "));
        assert!(txt.contains("  degree 1 "));
        assert!(txt.contains("(skipped degree 3) Underdetermined"));
        assert!(txt.contains("Force overlay: F(x) = 1/x"));
    }
}

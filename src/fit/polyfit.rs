//! Least-squares polynomial fit for a single degree.
//!
//! Given:
//! - abscissae `x_i`
//! - observed values `y_i`
//! - weights `w_i`
//!
//! we solve
//!
//! ```text
//! minimize Σ w_i (y_i - p(x_i))^2,   p(x) = c_0 x^d + … + c_d
//! ```
//!
//! The Vandermonde design matrix is badly scaled for large `x` (column `x^5`
//! at `x = 30` is ~2.4e7 while the constant column is 1), so each column is
//! divided by its Euclidean norm before the SVD solve and the coefficients are
//! un-scaled afterwards.

use nalgebra::{DMatrix, DVector};

use crate::domain::{CurveModel, Dataset, FitQuality, FitResult};
use crate::error::AppError;
use crate::math::solve_least_squares;
use crate::models::{fill_design_row, predict};

/// Fit a polynomial of `degree` to a dataset.
pub fn fit_dataset(dataset: &Dataset, degree: usize) -> Result<FitResult, AppError> {
    polyfit(&dataset.xs(), &dataset.ys(), &dataset.weights(), degree)
}

/// Warning text for a design matrix whose numerical rank is below `p`.
fn rank_warning(degree: usize, rank: usize, p: usize) -> Option<String> {
    (rank < p).then(|| format!("degree {degree} fit may be poorly conditioned: design rank {rank} < {p}"))
}

/// Fit a polynomial of `degree` to `(x, y)` pairs with objective weights `w`.
pub fn polyfit(x: &[f64], y: &[f64], w: &[f64], degree: usize) -> Result<FitResult, AppError> {
    if x.len() != y.len() || x.len() != w.len() {
        return Err(AppError::invalid_input(format!(
            "Mismatched input lengths: x={}, y={}, w={}.",
            x.len(),
            y.len(),
            w.len()
        )));
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(AppError::invalid_input("Non-finite x or y value in fit input."));
    }
    if w.iter().any(|v| !v.is_finite() || *v <= 0.0) {
        return Err(AppError::invalid_input("Fit weights must be finite and > 0."));
    }

    let n = x.len();
    let p = degree + 1;
    if n < p {
        return Err(AppError::insufficient_data(format!(
            "Underdetermined: degree {degree} needs at least {p} points, got {n}."
        )));
    }

    // Weighted design matrix X_w and observation vector y_w.
    let mut xw = DMatrix::<f64>::zeros(n, p);
    let mut yw = DVector::<f64>::zeros(n);
    let mut row = vec![0.0; p];

    for i in 0..n {
        fill_design_row(x[i], &mut row);
        let sw = w[i].sqrt();
        for j in 0..p {
            xw[(i, j)] = row[j] * sw;
        }
        yw[i] = y[i] * sw;
    }

    // Column scaling. An all-zero column (every x = 0) keeps scale 1.
    let mut scale = vec![1.0; p];
    for (j, s) in scale.iter_mut().enumerate() {
        let norm = xw.column(j).norm();
        if norm.is_finite() && norm > 0.0 {
            *s = norm;
        }
    }
    for i in 0..n {
        for j in 0..p {
            xw[(i, j)] /= scale[j];
        }
    }

    let solution = solve_least_squares(&xw, &yw).ok_or_else(|| {
        AppError::numerical(format!("Least squares solve failed for degree {degree}."))
    })?;

    if let Some(msg) = rank_warning(degree, solution.rank, p) {
        log::warn!("{msg}");
    }

    let coefficients: Vec<f64> = solution
        .beta
        .iter()
        .zip(scale.iter())
        .map(|(&b, &s)| b / s)
        .collect();

    let quality = fit_quality(x, y, w, &coefficients, solution.rank)?;
    log::debug!(
        "degree {degree}: sse={:.6e} rmse={:.6e} r2={:.6} bic={:.3}",
        quality.sse,
        quality.rmse,
        quality.r_squared,
        quality.bic
    );

    Ok(FitResult {
        model: CurveModel {
            degree,
            coefficients,
        },
        quality,
    })
}

fn fit_quality(
    x: &[f64],
    y: &[f64],
    w: &[f64],
    coefficients: &[f64],
    rank: usize,
) -> Result<FitQuality, AppError> {
    let n = x.len();

    let w_sum: f64 = w.iter().sum();
    let y_bar = y.iter().zip(w.iter()).map(|(&yi, &wi)| wi * yi).sum::<f64>() / w_sum;

    let mut sse = 0.0;
    let mut sst = 0.0;
    for i in 0..n {
        let r = y[i] - predict(coefficients, x[i]);
        sse += w[i] * r * r;
        let d = y[i] - y_bar;
        sst += w[i] * d * d;
    }

    if !sse.is_finite() {
        return Err(AppError::numerical("Non-finite SSE after polynomial fit."));
    }

    let r_squared = if sst > 0.0 { 1.0 - sse / sst } else { 1.0 };

    Ok(FitQuality {
        sse,
        rmse: (sse / n as f64).sqrt(),
        r_squared,
        bic: bic(n, sse, coefficients.len()),
        n,
        rank,
    })
}

/// Bayesian information criterion for a Gaussian least-squares fit.
pub fn bic(n: usize, sse: f64, k: usize) -> f64 {
    let n_f = n as f64;
    let sse_per = (sse / n_f).max(1e-12);
    n_f * sse_per.ln() + (k as f64) * n_f.ln()
}

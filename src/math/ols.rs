//! Least squares solver.
//!
//! We solve small, tall linear regression problems of the form:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! Weighting is applied by the caller (rows scaled by `sqrt(w_i)`).
//!
//! Implementation choices:
//! - SVD handles tall and rank-deficient design matrices; nalgebra's
//!   `QR::solve` is intended for square systems.
//! - The numerical rank is reported alongside the solution so callers can warn
//!   about ill-conditioned Vandermonde systems instead of failing outright.

use nalgebra::{DMatrix, DVector};

/// Relative cutoff factor; scaled by `max(rows, cols)` and the largest singular
/// value (numpy's `rcond = len(x) * eps`).
const RCOND_EPS: f64 = f64::EPSILON;

/// Solution of a least squares problem.
#[derive(Debug, Clone)]
pub struct LeastSquares {
    pub beta: DVector<f64>,
    /// Numerical rank of the design matrix.
    pub rank: usize,
}

/// Solve a least squares problem using SVD.
///
/// Returns `None` if no finite solution can be found.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<LeastSquares> {
    if x.nrows() == 0 || x.ncols() == 0 || x.nrows() != y.len() {
        return None;
    }

    let svd = x.clone().svd(true, true);
    let s_max = svd.singular_values.max();
    if !s_max.is_finite() {
        return None;
    }
    // One cutoff for both the rank and the solve: every singular value that
    // counts toward the rank is used, every other one is zeroed.
    let cutoff = (s_max * RCOND_EPS * x.nrows().max(x.ncols()) as f64).max(f64::MIN_POSITIVE);
    let rank = svd.rank(cutoff);

    let beta = svd.solve(y, cutoff).ok()?;
    if !beta.iter().all(|v| v.is_finite()) {
        return None;
    }
    Some(LeastSquares { beta, rank })
}

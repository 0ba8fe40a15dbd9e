//! Evaluation grids.
//!
//! Plots and curve exports evaluate the fitted polynomial on an evenly spaced
//! grid (`np.linspace` semantics: both endpoints included).

use crate::error::AppError;

/// Generate `steps` evenly spaced points between `min` and `max` (inclusive).
pub fn linspace(min: f64, max: f64, steps: usize) -> Result<Vec<f64>, AppError> {
    if !(min.is_finite() && max.is_finite() && max > min) {
        return Err(AppError::invalid_input(format!(
            "Invalid grid range: min={min}, max={max} (must be finite and max>min)."
        )));
    }
    if steps < 2 {
        return Err(AppError::invalid_input("Grid steps must be >= 2."));
    }

    let step = (max - min) / (steps as f64 - 1.0);
    let mut out = Vec::with_capacity(steps);
    for i in 0..steps {
        out.push(min + step * i as f64);
    }
    // Pin the last point so rounding never overshoots `max`.
    if let Some(last) = out.last_mut() {
        *last = max;
    }
    Ok(out)
}

/// Sample `n` points across `[min, max]`, widening degenerate ranges.
///
/// Unlike [`linspace`] this never fails; it is used for plotting where a
/// single-point dataset should still produce a visible curve.
pub fn sample_range(min: f64, max: f64, n: usize) -> Vec<f64> {
    let n = n.max(2);
    let (mut x0, mut x1) = (min, max);
    if !(x0.is_finite() && x1.is_finite()) || x1 < x0 {
        x0 = 0.0;
        x1 = 1.0;
    }
    if (x1 - x0).abs() < 1e-9 {
        x0 -= 0.5;
        x1 += 0.5;
    }

    (0..n)
        .map(|i| {
            let u = i as f64 / (n as f64 - 1.0);
            x0 + u * (x1 - x0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_includes_endpoints() {
        let v = linspace(0.0, 1000.0, 1000).unwrap();
        assert_eq!(v.len(), 1000);
        assert_eq!(v[0], 0.0);
        assert_eq!(v[999], 1000.0);
        let step = 1000.0 / 999.0;
        assert!((v[1] - step).abs() < 1e-12);
    }

    #[test]
    fn linspace_rejects_bad_input() {
        assert!(linspace(1.0, 1.0, 10).is_err());
        assert!(linspace(0.0, f64::NAN, 10).is_err());
        assert_eq!(linspace(0.0, 1.0, 1).unwrap_err().exit_code(), 2);
    }

    #[test]
    fn sample_range_widens_degenerate_range() {
        let v = sample_range(3.0, 3.0, 3);
        assert_eq!(v, vec![2.5, 3.0, 3.5]);
    }
}

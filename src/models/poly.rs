//! Polynomial evaluation.
//!
//! The fitter and reporting code rely on a few primitive operations:
//! - build a design (Vandermonde) row for a given `x` (for least squares)
//! - predict `y(x)` from coefficients, in two independent ways
//!
//! Coefficients are ordered highest power first: `c[0]·x^d + … + c[d]`.

/// Fill a Vandermonde row `[x^d, x^(d-1), …, x, 1]` for degree `out.len() - 1`.
pub fn fill_design_row(x: f64, out: &mut [f64]) {
    let mut acc = 1.0;
    for slot in out.iter_mut().rev() {
        *slot = acc;
        acc *= x;
    }
}

/// Predict `y(x)` with Horner's scheme.
///
/// This is the "library" evaluation path (the equivalent of calling a
/// `poly1d` object).
pub fn predict(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().fold(0.0, |acc, &c| acc * x + c)
}

/// Predict `y(x)` as an explicit sum of `c_i · x^p` terms.
///
/// Spelled out term by term instead of nesting, so it serves as an
/// independent check of [`predict`].
pub fn predict_expanded(coefficients: &[f64], x: f64) -> f64 {
    let degree = coefficients.len().saturating_sub(1);
    coefficients
        .iter()
        .enumerate()
        .map(|(i, &c)| c * x.powi((degree - i) as i32))
        .sum()
}

/// Evaluate the polynomial at every `x`.
pub fn predict_many(coefficients: &[f64], xs: &[f64]) -> Vec<f64> {
    xs.iter().map(|&x| predict(coefficients, x)).collect()
}

/// Render the polynomial as `y = …` for terminal output.
pub fn expression(coefficients: &[f64]) -> String {
    let degree = coefficients.len().saturating_sub(1);
    let mut out = String::from("y =");
    for (i, &c) in coefficients.iter().enumerate() {
        let power = degree - i;
        let sign = if c < 0.0 { '-' } else { '+' };
        let mag = format!("{:.6e}", c.abs());
        if i == 0 {
            out.push_str(&format!(" {}{mag}", if c < 0.0 { "-" } else { "" }));
        } else {
            out.push_str(&format!(" {sign} {mag}"));
        }
        match power {
            0 => {}
            1 => out.push_str("·x"),
            p => out.push_str(&format!("·x^{p}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn design_row_is_highest_power_first() {
        let mut row = [0.0; 4];
        fill_design_row(2.0, &mut row);
        assert_eq!(row, [8.0, 4.0, 2.0, 1.0]);
    }

    #[test]
    fn horner_matches_known_values() {
        // 2x^2 - 3x + 1
        let c = [2.0, -3.0, 1.0];
        assert_eq!(predict(&c, 0.0), 1.0);
        assert_eq!(predict(&c, 1.0), 0.0);
        assert_eq!(predict(&c, 2.0), 3.0);
    }

    #[test]
    fn expanded_agrees_with_horner() {
        let c = [-3.2e-5, 1.1e-3, -1.4e-2, 7.0e-2, -0.25, 5.0];
        for &x in &[0.0, 1.0, 2.5, 7.0, 13.0, 30.0] {
            let a = predict(&c, x);
            let b = predict_expanded(&c, x);
            assert!((a - b).abs() <= 1e-9 * a.abs().max(1.0), "x={x}: {a} vs {b}");
        }
    }

    #[test]
    fn constant_polynomial() {
        assert_eq!(predict(&[4.0], 123.0), 4.0);
        assert_eq!(predict_expanded(&[4.0], 123.0), 4.0);
    }

    #[test]
    fn expression_formats_signs_and_powers() {
        let s = expression(&[1.0, -2.0, 0.5]);
        assert_eq!(s, "y = 1.000000e0·x^2 - 2.000000e0·x + 5.000000e-1");
    }
}

//! Candidate force models.
//!
//! These are reference curves drawn next to the fitted polynomial; they are
//! never fitted. Both blow up at `x = 0`, and the screened form is undefined
//! for `x < 0`, so sampling drops non-finite values.

use crate::domain::ForceKind;

/// A force model with its constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceModel {
    pub kind: ForceKind,
    /// Strength of the `1/x` term in the screened form.
    pub a: f64,
    /// Strength of the `sqrt(x)` term in the screened form.
    pub k: f64,
}

impl ForceModel {
    pub fn new(kind: ForceKind, a: f64, k: f64) -> Self {
        Self { kind, a, k }
    }

    /// Evaluate `F(x)`. May be non-finite.
    pub fn eval(&self, x: f64) -> f64 {
        match self.kind {
            ForceKind::Inverse => 1.0 / x,
            ForceKind::Screened => -self.a / x - self.k * x.sqrt(),
        }
    }

    /// Evaluate on a grid, keeping only finite `(x, F(x))` pairs.
    pub fn sample(&self, xs: &[f64]) -> Vec<(f64, f64)> {
        xs.iter()
            .map(|&x| (x, self.eval(x)))
            .filter(|(_, y)| y.is_finite())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverse_force_values() {
        let f = ForceModel::new(ForceKind::Inverse, 1.0, 0.1);
        assert_eq!(f.eval(2.0), 0.5);
        assert!(f.eval(0.0).is_infinite());
    }

    #[test]
    fn screened_force_values() {
        let f = ForceModel::new(ForceKind::Screened, 1.0, 0.1);
        // -1/4 - 0.1 * 2
        assert!((f.eval(4.0) - (-0.45)).abs() < 1e-12);
        assert!(f.eval(-1.0).is_nan());
    }

    #[test]
    fn sample_drops_singularity() {
        let f = ForceModel::new(ForceKind::Inverse, 1.0, 0.1);
        let pts = f.sample(&[0.0, 1.0, 4.0]);
        assert_eq!(pts, vec![(1.0, 1.0), (4.0, 0.25)]);
    }
}

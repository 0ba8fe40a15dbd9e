//! Hand-entered measurements and constants.

use crate::domain::{Dataset, Observation};

/// Observed x values.
pub const BUILTIN_X: [f64; 17] = [
    0.0, 1.0, 2.0, 2.5, 3.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 30.0,
];

/// Observed y values, paired index-wise with [`BUILTIN_X`].
pub const BUILTIN_Y: [f64; 17] = [
    5.0, 4.9, 4.8, 4.7, 4.5, 3.5, 3.0, 2.5, 2.0, 1.5, 1.0, 0.5, 0.25, 0.0, 0.0, 0.0, 0.0,
];

/// Screened force constant `a`.
pub const FORCE_A: f64 = 1.0;
/// Screened force constant `k`.
pub const FORCE_K: f64 = 0.1;

pub const DEFAULT_DEGREE: usize = 5;

pub const DEFAULT_GRID_MIN: f64 = 0.0;
pub const DEFAULT_GRID_MAX: f64 = 1000.0;
pub const DEFAULT_GRID_STEPS: usize = 1000;

pub const BUILTIN_LABEL: &str = "builtin";

/// The built-in dataset with unit weights.
pub fn builtin_dataset() -> Dataset {
    let points = BUILTIN_X
        .iter()
        .zip(BUILTIN_Y.iter())
        .map(|(&x, &y)| Observation { x, y, weight: 1.0 })
        .collect();

    Dataset {
        label: BUILTIN_LABEL.to_string(),
        points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_dataset_pairs_values() {
        let ds = builtin_dataset();
        assert_eq!(ds.len(), 17);
        assert_eq!(ds.points[3], Observation { x: 2.5, y: 4.7, weight: 1.0 });
        assert_eq!(ds.points[16], Observation { x: 30.0, y: 0.0, weight: 1.0 });
    }
}

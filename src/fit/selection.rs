//! Degree selection using BIC with guardrails.
//!
//! In `DegreeMode::Fixed` the requested degree is fitted directly. In
//! `DegreeMode::Auto` every degree in `1..=max` is fitted (in parallel) and:
//!
//! 1. underdetermined degrees are excluded: require `n >= k + MIN_N_BUFFER`
//! 2. the fit with minimum BIC wins
//! 3. a lower degree within `BIC_SLACK` of the best is preferred

use rayon::prelude::*;

use crate::domain::{Dataset, DegreeMode, FitResult};
use crate::error::AppError;
use crate::fit::polyfit::fit_dataset;

/// Minimum number of extra observations beyond parameter count (auto mode only).
const MIN_N_BUFFER: usize = 5;

/// BIC difference below which the simpler polynomial is preferred.
const BIC_SLACK: f64 = 2.0;

/// Output of fitting + selection.
#[derive(Debug, Clone)]
pub struct FitSelection {
    pub best: FitResult,
    /// Fits for all attempted degrees (after guardrails), lowest degree first.
    pub fits: Vec<FitResult>,
    /// Any degrees that were skipped and why (for diagnostics).
    pub skipped: Vec<(usize, String)>,
}

/// Fit and select the polynomial degree.
pub fn fit_and_select(dataset: &Dataset, mode: DegreeMode) -> Result<FitSelection, AppError> {
    let n = dataset.len();

    match mode {
        DegreeMode::Fixed(degree) => {
            let fit = fit_dataset(dataset, degree)?;
            Ok(FitSelection {
                best: fit.clone(),
                fits: vec![fit],
                skipped: Vec::new(),
            })
        }
        DegreeMode::Auto { max } => {
            if max == 0 {
                return Err(AppError::invalid_input("`--max-degree` must be >= 1."));
            }

            let mut candidates = Vec::new();
            let mut skipped = Vec::new();
            for degree in 1..=max {
                let k = degree + 1;
                if n < k + MIN_N_BUFFER {
                    skipped.push((
                        degree,
                        format!("Underdetermined: n={n} < k+{MIN_N_BUFFER}={}", k + MIN_N_BUFFER),
                    ));
                } else {
                    candidates.push(degree);
                }
            }

            let results: Vec<Result<FitResult, AppError>> = candidates
                .par_iter()
                .map(|&degree| fit_dataset(dataset, degree))
                .collect();

            let mut fits = Vec::with_capacity(results.len());
            for (degree, result) in candidates.iter().zip(results) {
                match result {
                    Ok(fit) => fits.push(fit),
                    Err(err) if err.exit_code() == AppError::NUMERICAL => {
                        log::warn!("degree {degree} skipped: {err}");
                        skipped.push((*degree, err.to_string()));
                    }
                    Err(err) => return Err(err),
                }
            }

            if fits.is_empty() {
                return Err(AppError::insufficient_data(format!(
                    "Insufficient data to fit any degree in 1..={max} (n={n})."
                )));
            }

            let best = select_by_bic(&fits);
            log::info!(
                "auto degree: picked {} (bic={:.3}) from {} candidates",
                best.model.degree,
                best.quality.bic,
                fits.len()
            );

            Ok(FitSelection { best, fits, skipped })
        }
    }
}

/// Pick the minimum-BIC fit, preferring lower degrees within `BIC_SLACK`.
///
/// `fits` must be non-empty.
fn select_by_bic(fits: &[FitResult]) -> FitResult {
    let mut best = &fits[0];
    for f in &fits[1..] {
        if f.quality.bic < best.quality.bic {
            best = f;
        }
    }

    let best_bic = best.quality.bic;

    let mut by_degree: Vec<&FitResult> = fits.iter().collect();
    by_degree.sort_by_key(|f| f.model.degree);
    for f in by_degree {
        if f.quality.bic <= best_bic + BIC_SLACK {
            return f.clone();
        }
    }

    best.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::builtin_dataset;
    use crate::domain::{CurveModel, FitQuality, Observation};

    fn fake_fit(degree: usize, bic: f64) -> FitResult {
        FitResult {
            model: CurveModel {
                degree,
                coefficients: vec![0.0; degree + 1],
            },
            quality: FitQuality {
                sse: 1.0,
                rmse: 1.0,
                r_squared: 0.0,
                bic,
                n: 20,
                rank: degree + 1,
            },
        }
    }

    #[test]
    fn bic_prefers_simpler_when_close() {
        let fits = vec![fake_fit(2, 10.0), fake_fit(3, 8.5), fake_fit(4, 12.0)];
        assert_eq!(select_by_bic(&fits).model.degree, 2);
    }

    #[test]
    fn bic_picks_clear_winner() {
        let fits = vec![fake_fit(2, 10.0), fake_fit(3, 4.0)];
        assert_eq!(select_by_bic(&fits).model.degree, 3);
    }

    #[test]
    fn fixed_mode_fits_requested_degree() {
        let sel = fit_and_select(&builtin_dataset(), DegreeMode::Fixed(5)).unwrap();
        assert_eq!(sel.best.model.degree, 5);
        assert_eq!(sel.fits.len(), 1);
        assert!(sel.skipped.is_empty());
    }

    #[test]
    fn auto_mode_on_builtin_data_picks_quintic() {
        // BIC by degree: 4 -> -85.03, 5 -> -88.21, 6 -> -88.20.
        let sel = fit_and_select(&builtin_dataset(), DegreeMode::Auto { max: 6 }).unwrap();
        assert_eq!(sel.best.model.degree, 5);
        assert_eq!(sel.fits.len(), 6);
        let degrees: Vec<usize> = sel.fits.iter().map(|f| f.model.degree).collect();
        assert_eq!(degrees, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn auto_mode_skips_underdetermined() {
        let ds = Dataset {
            label: "t".to_string(),
            points: (0..8)
                .map(|i| Observation { x: i as f64, y: (i * i) as f64, weight: 1.0 })
                .collect(),
        };
        let sel = fit_and_select(&ds, DegreeMode::Auto { max: 4 }).unwrap();
        // n=8 allows k <= 3, i.e. degree <= 2.
        assert_eq!(sel.fits.len(), 2);
        assert_eq!(sel.skipped.iter().map(|(d, _)| *d).collect::<Vec<_>>(), vec![3, 4]);
        assert_eq!(sel.best.model.degree, 2);
    }

    #[test]
    fn auto_mode_errors_when_nothing_fits() {
        let ds = Dataset {
            label: "t".to_string(),
            points: vec![Observation { x: 0.0, y: 1.0, weight: 1.0 }],
        };
        let err = fit_and_select(&ds, DegreeMode::Auto { max: 3 }).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}

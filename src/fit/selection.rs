//! Model family selection and initial-guess policy.
//!
//! Charts normally declare their family; `--family auto` asks the selector to pick
//! one from the series' growth shape instead:
//!
//! 1. LogLinear when every y is positive, `ln y` is almost exactly linear in x
//!    (`R² ≥ 0.98`), increasing, and y spans at least three orders of magnitude.
//! 2. LogRational when every x and y is positive and the series trends downwards.
//! 3. LogPower otherwise (slow, saturating growth).
//!
//! The choice is a pure function of the series, so a given chart always resolves to
//! the same family.

use crate::domain::{DataSeries, FamilyKind};
use crate::math::fit_line;

/// Minimum R² of the `(x, ln y)` line before a series is treated as exponential.
const LOG_LINEAR_MIN_R2: f64 = 0.98;
/// Minimum `log10(y_max / y_min)` before a series is treated as exponential.
const LOG_LINEAR_MIN_DECADES: f64 = 3.0;

/// Pick a model family for `series`.
pub fn select_family(series: &DataSeries) -> FamilyKind {
    let xs = series.xs();
    let ys = series.ys();

    if ys.iter().all(|&y| y > 0.0) {
        let ln_y: Vec<f64> = ys.iter().map(|y| y.ln()).collect();
        let (y_min, y_max) = ys
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &y| {
                (lo.min(y), hi.max(y))
            });
        let decades = (y_max / y_min).log10();

        if let Some(line) = fit_line(&xs, &ln_y) {
            if line.slope > 0.0
                && line.r_squared >= LOG_LINEAR_MIN_R2
                && decades >= LOG_LINEAR_MIN_DECADES
            {
                return FamilyKind::LogLinear;
            }
        }

        if xs.iter().all(|&x| x > 0.0) {
            if let Some(line) = fit_line(&xs, &ys) {
                if line.slope < 0.0 {
                    return FamilyKind::LogRational;
                }
            }
        }
    }

    FamilyKind::LogPower
}

/// Starting parameters for a nonlinear family.
///
/// - LogPower: `c = x_min − 1` puts the first sample at `ln(x − c) = 0`, so `d = y_first`;
///   with `b = 1`, `a` is chosen so the seed also passes through the last sample.
/// - LogRational: `(1, −1, 1, 0)`, i.e. `y = 1/x²`, a generic decaying ratio.
/// - LogLinear is closed-form and has no seed (empty vector).
pub fn default_guess(kind: FamilyKind, series: &DataSeries) -> Vec<f64> {
    match kind {
        FamilyKind::LogPower => {
            let ys = series.ys();
            let c = series.x_min() - 1.0;
            let d = ys[0];
            let span = (series.x_max() - c).ln();
            let a = if span > 0.0 { (ys[ys.len() - 1] - d) / span } else { 1.0 };
            vec![a, 1.0, c, d]
        }
        FamilyKind::LogRational => vec![1.0, -1.0, 1.0, 0.0],
        FamilyKind::LogLinear => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::predict;

    fn series(xs: &[f64], ys: &[f64]) -> DataSeries {
        DataSeries::new(xs, ys).unwrap()
    }

    #[test]
    fn exponential_series_selects_log_linear() {
        let xs: Vec<f64> = (0..12).map(f64::from).collect();
        let ys: Vec<f64> = xs.iter().map(|x| (3.0 * x).exp()).collect();
        assert_eq!(select_family(&series(&xs, &ys)), FamilyKind::LogLinear);
    }

    #[test]
    fn decaying_ratio_selects_log_rational() {
        let xs: Vec<f64> = (2..16).map(f64::from).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 8.0 / x + 1.0).collect();
        assert_eq!(select_family(&series(&xs, &ys)), FamilyKind::LogRational);
    }

    #[test]
    fn saturating_or_signed_series_selects_log_power() {
        let xs: Vec<f64> = (1..16).map(f64::from).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 20.0 + 5.0 * x.ln()).collect();
        assert_eq!(select_family(&series(&xs, &ys)), FamilyKind::LogPower);

        let signed = series(&[1.0, 2.0, 3.0, 4.0], &[0.0, 112.0, -50.0, 46.0]);
        assert_eq!(select_family(&signed), FamilyKind::LogPower);
    }

    #[test]
    fn log_power_guess_passes_through_first_and_last_samples() {
        let s = series(&[1.0, 2.0, 5.0, 15.0], &[20.0, 21.0, 25.0, 32.0]);
        let guess = default_guess(FamilyKind::LogPower, &s);
        assert_eq!(guess.len(), 4);
        assert_eq!(predict(FamilyKind::LogPower, 1.0, &guess), 20.0);
        assert!((predict(FamilyKind::LogPower, 15.0, &guess) - 32.0).abs() < 1e-12);
    }

    #[test]
    fn log_linear_has_no_seed() {
        let s = series(&[0.0, 1.0], &[1.0, 2.0]);
        assert!(default_guess(FamilyKind::LogLinear, &s).is_empty());
        assert_eq!(default_guess(FamilyKind::LogRational, &s), vec![1.0, -1.0, 1.0, 0.0]);
    }
}

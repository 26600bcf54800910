//! Closed-form ordinary least squares for a straight line.
//!
//! ```text
//! minimize Σ (y_i - (m x_i + k))^2
//! ```
//!
//! The log-linear family fits this on `(x, ln y)`, and family selection uses the
//! same fit to judge how exponential a series looks. There is no iteration, so the
//! result is bit-identical for identical inputs.

/// A fitted line `y = slope·x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination on the fitted scale.
    pub r_squared: f64,
}

/// Fit a line through `(xs, ys)` using mean-centred sums.
///
/// Returns `None` if fewer than two points are given, the slices differ in length, or
/// all x values coincide.
pub fn fit_line(xs: &[f64], ys: &[f64]) -> Option<LineFit> {
    let n = xs.len();
    if n < 2 || ys.len() != n {
        return None;
    }

    let n_f = n as f64;
    let x_mean = xs.iter().sum::<f64>() / n_f;
    let y_mean = ys.iter().sum::<f64>() / n_f;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    let mut syy = 0.0;
    for (&x, &y) in xs.iter().zip(ys) {
        let dx = x - x_mean;
        let dy = y - y_mean;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }
    if sxx <= 0.0 || !sxx.is_finite() {
        return None;
    }

    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;
    // A flat response is explained perfectly by a flat line.
    let r_squared = if syy > 0.0 { (sxy * sxy) / (sxx * syy) } else { 1.0 };

    Some(LineFit {
        slope,
        intercept,
        r_squared,
    })
}

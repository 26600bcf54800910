//! Prediction grid generation.
//!
//! A fitted curve is materialized on a dense, evenly spaced grid between a
//! caller-supplied lower and upper x-bound (both inclusive). The grid only
//! depends on its arguments, so identical ranges always produce identical
//! samples.

use crate::domain::SampleRange;
use crate::error::FitError;

/// Generate `samples` evenly spaced points between `lower` and `upper` (inclusive).
pub fn linspace(lower: f64, upper: f64, samples: usize) -> Result<Vec<f64>, FitError> {
    if !(lower.is_finite() && upper.is_finite() && upper > lower) {
        return Err(FitError::InvalidRange(format!(
            "lower={lower}, upper={upper} (must be finite and upper > lower)"
        )));
    }
    if samples < 2 {
        return Err(FitError::InvalidRange(format!(
            "need at least 2 samples, got {samples}"
        )));
    }

    let step = (upper - lower) / (samples as f64 - 1.0);
    let mut out = Vec::with_capacity(samples);
    for i in 0..samples {
        out.push(lower + step * i as f64);
    }
    // Pin the last sample so rounding never leaves it short of the ceiling.
    out[samples - 1] = upper;
    Ok(out)
}

/// Grid for a [`SampleRange`].
pub fn sample_grid(range: &SampleRange) -> Result<Vec<f64>, FitError> {
    linspace(range.lower, range.upper, range.samples)
}

//! Model evaluation for the LogPower / LogRational / LogLinear families.
//!
//! The fitter relies on two primitive operations:
//! - predict `y(x)` from a kind and a raw parameter slice (inside the optimizer)
//! - check that every sample stays inside the family's domain
//!
//! `ModelFamily` is the resolved, typed form handed out with a fitted curve.

use serde::Serialize;

use crate::domain::FamilyKind;

/// A model family with resolved parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "family", rename_all = "kebab-case")]
pub enum ModelFamily {
    /// `y = a·ln(x − c)^b + d`
    LogPower { a: f64, b: f64, c: f64, d: f64 },
    /// `y = a·x^b / (x^c + d)`
    LogRational { a: f64, b: f64, c: f64, d: f64 },
    /// `y = exp(slope·x + intercept)`
    LogLinear { slope: f64, intercept: f64 },
}

impl ModelFamily {
    /// Build from a raw parameter slice in `(a, b, c, d)` / `(slope, intercept)` order.
    ///
    /// Returns `None` when the slice length does not match the kind.
    pub fn from_params(kind: FamilyKind, params: &[f64]) -> Option<Self> {
        match (kind, params) {
            (FamilyKind::LogPower, &[a, b, c, d]) => Some(ModelFamily::LogPower { a, b, c, d }),
            (FamilyKind::LogRational, &[a, b, c, d]) => {
                Some(ModelFamily::LogRational { a, b, c, d })
            }
            (FamilyKind::LogLinear, &[slope, intercept]) => {
                Some(ModelFamily::LogLinear { slope, intercept })
            }
            _ => None,
        }
    }

    pub fn kind(&self) -> FamilyKind {
        match self {
            ModelFamily::LogPower { .. } => FamilyKind::LogPower,
            ModelFamily::LogRational { .. } => FamilyKind::LogRational,
            ModelFamily::LogLinear { .. } => FamilyKind::LogLinear,
        }
    }

    pub fn params(&self) -> Vec<f64> {
        match *self {
            ModelFamily::LogPower { a, b, c, d } | ModelFamily::LogRational { a, b, c, d } => {
                vec![a, b, c, d]
            }
            ModelFamily::LogLinear { slope, intercept } => vec![slope, intercept],
        }
    }

    /// Evaluate the model at `x`. Out-of-domain inputs yield a non-finite value.
    pub fn predict(&self, x: f64) -> f64 {
        match *self {
            ModelFamily::LogPower { a, b, c, d } => log_power(x, a, b, c, d),
            ModelFamily::LogRational { a, b, c, d } => log_rational(x, a, b, c, d),
            ModelFamily::LogLinear { slope, intercept } => (slope * x + intercept).exp(),
        }
    }

    /// The closed form with the resolved parameters, for terminal output.
    pub fn formula(&self) -> String {
        match *self {
            ModelFamily::LogPower { a, b, c, d } => {
                format!("y = {a:.6}·ln(x − {c:.6})^{b:.6} + {d:.6}")
            }
            ModelFamily::LogRational { a, b, c, d } => {
                format!("y = {a:.6}·x^{b:.6} / (x^{c:.6} + {d:.6})")
            }
            ModelFamily::LogLinear { slope, intercept } => {
                format!("y = exp({slope:.6}·x + {intercept:.6})")
            }
        }
    }
}

/// Predict `y(x)` for a kind and a raw parameter slice.
///
/// # Panics
/// Panics if `params` is shorter than `kind.param_count()`. The optimizer always
/// passes correctly sized vectors.
pub fn predict(kind: FamilyKind, x: f64, params: &[f64]) -> f64 {
    match kind {
        FamilyKind::LogPower => log_power(x, params[0], params[1], params[2], params[3]),
        FamilyKind::LogRational => log_rational(x, params[0], params[1], params[2], params[3]),
        FamilyKind::LogLinear => (params[0] * x + params[1]).exp(),
    }
}

/// First sample that leaves the family's domain for `params`, described for an error.
///
/// LogPower needs `x > c` and, for non-integer `b`, `ln(x − c) ≥ 0`; LogRational needs
/// `x > 0` and a non-vanishing denominator. Either way a non-finite prediction means the
/// point is out of domain.
pub fn domain_violation(kind: FamilyKind, xs: &[f64], params: &[f64]) -> Option<String> {
    for (i, &x) in xs.iter().enumerate() {
        match kind {
            FamilyKind::LogPower if x <= params[2] => {
                return Some(format!("x[{i}] = {x} is not greater than c = {}", params[2]));
            }
            FamilyKind::LogRational if x <= 0.0 => {
                return Some(format!("x[{i}] = {x} must be positive"));
            }
            _ => {}
        }
        let y = predict(kind, x, params);
        if !y.is_finite() {
            return Some(format!(
                "prediction at x[{i}] = {x} is not finite for parameters {params:?}"
            ));
        }
    }
    None
}

fn log_power(x: f64, a: f64, b: f64, c: f64, d: f64) -> f64 {
    a * (x - c).ln().powf(b) + d
}

fn log_rational(x: f64, a: f64, b: f64, c: f64, d: f64) -> f64 {
    a * x.powf(b) / (x.powf(c) + d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_power_is_d_at_unit_offset() {
        // ln(1) = 0, so the curve passes through d at x = c + 1.
        let y = predict(FamilyKind::LogPower, 1.0, &[20.0, 1.0, 0.0, 3.0]);
        assert_eq!(y, 3.0);
    }

    #[test]
    fn log_power_out_of_domain_is_not_finite() {
        assert!(!predict(FamilyKind::LogPower, 0.5, &[1.0, 1.0, 1.0, 0.0]).is_finite());
        // ln(x - c) < 0 with a fractional exponent has no real value.
        assert!(predict(FamilyKind::LogPower, 1.5, &[1.0, 0.5, 1.0, 0.0]).is_nan());
        // An integer exponent keeps negative logs real.
        assert!(predict(FamilyKind::LogPower, 1.5, &[1.0, 1.0, 1.0, 0.0]).is_finite());
    }

    #[test]
    fn log_rational_matches_closed_form() {
        let y = predict(FamilyKind::LogRational, 2.0, &[1.0, -1.0, 1.0, 0.0]);
        assert!((y - 0.25).abs() < 1e-15);
    }

    #[test]
    fn domain_violation_reports_first_bad_sample() {
        let msg = domain_violation(FamilyKind::LogPower, &[3.0, 2.0, 1.0], &[1.0, 1.0, 1.5, 0.0]);
        assert!(msg.unwrap().contains("x[2]"));
        assert!(domain_violation(FamilyKind::LogRational, &[0.0, 1.0], &[1.0, 1.0, 1.0, 0.0]).is_some());
        assert!(domain_violation(FamilyKind::LogPower, &[1.0, 2.0], &[20.0, 1.0, 0.0, 0.0]).is_none());
    }

    #[test]
    fn from_params_checks_arity() {
        assert!(ModelFamily::from_params(FamilyKind::LogLinear, &[1.0, 2.0, 3.0]).is_none());
        let m = ModelFamily::from_params(FamilyKind::LogLinear, &[0.0, 0.0]).unwrap();
        assert_eq!(m.predict(5.0), 1.0);
        assert_eq!(m.kind(), FamilyKind::LogLinear);
        assert_eq!(m.params(), vec![0.0, 0.0]);
    }
}

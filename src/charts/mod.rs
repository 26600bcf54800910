//! Chart definitions.
//!
//! Each chart pairs a literal data table with a fit and an annotation policy and
//! produces a [`ChartPlan`]. The pipeline per chart is:
//!
//! raw series → `fit::fit` → `annotate::classify` → plan → renderer
//!
//! Nothing is cached between charts; every build starts from the literal tables.

pub mod catalog;
pub mod data;
pub mod plan;

pub use catalog::build;
pub use plan::*;

use crate::domain::{FamilyKind, DEFAULT_CURVE_SAMPLES, DEFAULT_MAX_EVALUATIONS};
use crate::fit::FittedCurve;

/// How the fitted family is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FamilyChoice {
    /// The family the chart declares.
    #[default]
    Declared,
    /// Let the selector pick from the series' growth shape.
    Auto,
    /// A specific family.
    Fixed(FamilyKind),
}

/// Per-invocation knobs for a chart build.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub family: FamilyChoice,
    /// Overrides the chart's seed (and the family's default guess).
    pub initial_guess: Option<Vec<f64>>,
    pub max_evaluations: usize,
    /// Number of prediction samples on the curve.
    pub samples: usize,
    /// Extrapolation ceiling; `None` keeps the chart's own.
    pub x_max: Option<f64>,
    /// Displayed value of the depth-80 estimate.
    pub estimate: Option<f64>,
    /// Value of the depth-80 point the fit consumes.
    pub pad: Option<f64>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            family: FamilyChoice::Declared,
            initial_guess: None,
            max_evaluations: DEFAULT_MAX_EVALUATIONS,
            samples: DEFAULT_CURVE_SAMPLES,
            x_max: None,
            estimate: None,
            pad: None,
        }
    }
}

/// A built chart: the plan plus the curve behind it (for terminal summaries).
#[derive(Debug, Clone)]
pub struct ChartBuild {
    pub plan: ChartPlan,
    pub curve: Option<FittedCurve>,
}

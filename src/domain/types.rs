//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - used in-memory during fitting and annotation
//! - handed to the renderers (SVG, terminal)
//! - exported to JSON as a render plan

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::FitError;

/// Which parametric model family to fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FamilyKind {
    /// `y = a·ln(x − c)^b + d`: slow, saturating growth.
    LogPower,
    /// `y = a·x^b / (x^c + d)`: monotonically decaying ratios.
    LogRational,
    /// `y = exp(m·x + k)`, fit by OLS on `(x, ln y)`.
    LogLinear,
}

impl FamilyKind {
    /// Human-readable label for legends and terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            FamilyKind::LogPower => "Logarithmic Fit",
            FamilyKind::LogRational => "Logarithmic Fit",
            FamilyKind::LogLinear => "Exponential Fit",
        }
    }

    /// Number of free parameters.
    pub fn param_count(self) -> usize {
        match self {
            FamilyKind::LogPower | FamilyKind::LogRational => 4,
            FamilyKind::LogLinear => 2,
        }
    }

    /// Whether the family is fit iteratively (and therefore needs a seed).
    pub fn is_nonlinear(self) -> bool {
        !matches!(self, FamilyKind::LogLinear)
    }
}

/// One sample of a data series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub x: f64,
    pub y: f64,
    /// Present only to steer the fit (or mark a far estimate); never drawn as a
    /// plain scatter marker.
    pub pad: bool,
}

/// An ordered `(x, y)` series with x non-decreasing.
///
/// The fitter always consumes every point, pad points included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataSeries {
    points: Vec<SeriesPoint>,
}

impl DataSeries {
    /// Build a series from parallel x / y slices.
    pub fn new(xs: &[f64], ys: &[f64]) -> Result<Self, FitError> {
        if xs.len() != ys.len() {
            return Err(FitError::InvalidSeries(format!(
                "x has {} values but y has {}",
                xs.len(),
                ys.len()
            )));
        }
        let points = xs
            .iter()
            .zip(ys)
            .map(|(&x, &y)| SeriesPoint { x, y, pad: false })
            .collect();
        Self::from_points(points)
    }

    /// Build a series from already-tagged points.
    pub fn from_points(points: Vec<SeriesPoint>) -> Result<Self, FitError> {
        if points.is_empty() {
            return Err(FitError::InvalidSeries("series is empty".to_string()));
        }
        for (i, p) in points.iter().enumerate() {
            if !(p.x.is_finite() && p.y.is_finite()) {
                return Err(FitError::InvalidSeries(format!(
                    "point {i} is not finite: ({}, {})",
                    p.x, p.y
                )));
            }
        }
        if let Some(i) = points.windows(2).position(|w| w[1].x < w[0].x) {
            return Err(FitError::InvalidSeries(format!(
                "x must be non-decreasing: x[{}] = {} follows x[{i}] = {}",
                i + 1,
                points[i + 1].x,
                points[i].x
            )));
        }
        Ok(Self { points })
    }

    /// Append a pad point at the tail.
    pub fn with_pad(self, x: f64, y: f64) -> Result<Self, FitError> {
        let mut points = self.points;
        points.push(SeriesPoint { x, y, pad: true });
        Self::from_points(points)
    }

    /// Append an ordinary point at the tail.
    pub fn with_point(self, x: f64, y: f64) -> Result<Self, FitError> {
        let mut points = self.points;
        points.push(SeriesPoint { x, y, pad: false });
        Self::from_points(points)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn xs(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.x).collect()
    }

    pub fn ys(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.y).collect()
    }

    /// Smallest x (the first point, since x is ordered).
    pub fn x_min(&self) -> f64 {
        self.points[0].x
    }

    /// Largest x (the last point).
    pub fn x_max(&self) -> f64 {
        self.points[self.points.len() - 1].x
    }

    /// Number of distinct x values.
    pub fn distinct_x(&self) -> usize {
        1 + self.points.windows(2).filter(|w| w[1].x > w[0].x).count()
    }
}

/// The x-range and density of a materialized prediction curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SampleRange {
    pub lower: f64,
    pub upper: f64,
    pub samples: usize,
}

impl SampleRange {
    pub fn new(lower: f64, upper: f64, samples: usize) -> Self {
        Self {
            lower,
            upper,
            samples,
        }
    }
}

/// Everything the fitter needs besides the series itself.
#[derive(Debug, Clone, PartialEq)]
pub struct FitConfig {
    pub family: FamilyKind,
    /// Starting parameter vector for the nonlinear families.
    ///
    /// `None` uses the family's initial-guess policy.
    pub initial_guess: Option<Vec<f64>>,
    /// Model-evaluation budget for the nonlinear optimizer.
    pub max_evaluations: usize,
    pub range: SampleRange,
}

/// Default model-evaluation budget (the scripts' `maxfev`).
pub const DEFAULT_MAX_EVALUATIONS: usize = 100_000;

/// Default number of prediction samples.
pub const DEFAULT_CURVE_SAMPLES: usize = 1000;

/// How a point takes part in the scatter rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PointRole {
    Regular,
    Highlighted,
    /// Present for the fit only; never drawn as a marker.
    Excluded,
}

/// A series point tagged with its role.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassifiedPoint {
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub role: PointRole,
}

/// A point drawn distinctly from the regular series, with its legend label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighlightPoint {
    pub x: f64,
    pub y: f64,
    pub label: String,
}

/// Offset from a data point to its text anchor.
///
/// The anchor is `(x + dx, y * y_factor + dy)`; `y_factor` keeps offsets readable on
/// log-scaled axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelOffset {
    pub dx: f64,
    pub dy: f64,
    pub y_factor: f64,
}

impl LabelOffset {
    pub const fn additive(dx: f64, dy: f64) -> Self {
        Self {
            dx,
            dy,
            y_factor: 1.0,
        }
    }

    pub const fn scaled(dx: f64, y_factor: f64) -> Self {
        Self {
            dx,
            dy: 0.0,
            y_factor,
        }
    }

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (x + self.dx, y * self.y_factor + self.dy)
    }
}

/// Horizontal alignment of a label relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelAlign {
    Left,
    Center,
}

/// A text callout for the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelRequest {
    /// The data point the label refers to.
    pub point: (f64, f64),
    /// Where the text is anchored.
    pub anchor: (f64, f64),
    pub text: String,
    pub align: LabelAlign,
    /// Palette index for the label box (`None` = white box).
    pub tone: Option<usize>,
}

/// The charts this tool knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ChartId {
    /// Branching factor b(d) vs depth.
    BranchingFactor,
    /// Possible games P(d) vs depth.
    PossibleGames,
    /// Growth rate g(d) vs depth.
    GrowthRate,
    /// Rating delta per game for a new player.
    RatingDelta,
    /// Actual vs projected rating.
    RatingProjection,
    /// Estimated branching factors of popular games.
    GameComparison,
}

impl ChartId {
    pub const ALL: [ChartId; 6] = [
        ChartId::BranchingFactor,
        ChartId::PossibleGames,
        ChartId::GrowthRate,
        ChartId::RatingDelta,
        ChartId::RatingProjection,
        ChartId::GameComparison,
    ];

    /// CLI spelling.
    pub fn slug(self) -> &'static str {
        match self {
            ChartId::BranchingFactor => "branching-factor",
            ChartId::PossibleGames => "possible-games",
            ChartId::GrowthRate => "growth-rate",
            ChartId::RatingDelta => "rating-delta",
            ChartId::RatingProjection => "rating-projection",
            ChartId::GameComparison => "game-comparison",
        }
    }

    /// Charts with a depth-80 estimate point, the only ones `estimate`/`pad` apply to.
    pub fn has_estimate(self) -> bool {
        matches!(
            self,
            ChartId::BranchingFactor | ChartId::PossibleGames | ChartId::GrowthRate
        )
    }

    pub fn title(self) -> &'static str {
        match self {
            ChartId::BranchingFactor => "Branching Factors (b(d) vs. d)",
            ChartId::PossibleGames => "Possible Games (P(d) vs. d)",
            ChartId::GrowthRate => "Growth Rates (g(d) vs. d)",
            ChartId::RatingDelta => "Delta Rating vs. Game Number",
            ChartId::RatingProjection => "Actual vs. Projected Rating",
            ChartId::GameComparison => "Common Games: Estimated Branching Factors",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_rejects_decreasing_x() {
        let err = DataSeries::new(&[1.0, 3.0, 2.0], &[1.0, 1.0, 1.0]).unwrap_err();
        assert!(matches!(err, FitError::InvalidSeries(_)));
    }

    #[test]
    fn series_rejects_length_mismatch_and_nan() {
        assert!(DataSeries::new(&[1.0, 2.0], &[1.0]).is_err());
        assert!(DataSeries::new(&[1.0, 2.0], &[1.0, f64::NAN]).is_err());
        assert!(DataSeries::new(&[], &[]).is_err());
    }

    #[test]
    fn pad_points_are_tagged_and_ordered() {
        let series = DataSeries::new(&[1.0, 2.0, 3.0], &[5.0, 6.0, 7.0])
            .unwrap()
            .with_pad(80.0, 42.5)
            .unwrap();
        assert_eq!(series.len(), 4);
        assert!(series.points()[3].pad);
        assert!(!series.points()[0].pad);
        assert_eq!(series.x_min(), 1.0);
        assert_eq!(series.x_max(), 80.0);
        assert!(series.clone().with_pad(10.0, 1.0).is_err());
    }

    #[test]
    fn distinct_x_counts_ties_once() {
        let series = DataSeries::new(&[1.0, 1.0, 2.0, 3.0, 3.0], &[0.0; 5]).unwrap();
        assert_eq!(series.distinct_x(), 3);
    }

    #[test]
    fn label_offset_scales_then_shifts() {
        let off = LabelOffset {
            dx: 2.0,
            dy: 1.0,
            y_factor: 1.5,
        };
        assert_eq!(off.apply(15.0, 10.0), (17.0, 16.0));
    }
}

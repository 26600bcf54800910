//! Render plans: everything a renderer needs to draw one chart.
//!
//! A plan is finished data (point groups, curve samples, label anchors). Renderers
//! never call back into the fitter or the annotator.

use serde::Serialize;

use crate::domain::{ChartId, FamilyKind, LabelRequest};

/// A finished chart, ready for any renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPlan {
    pub id: ChartId,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Plot y on a log10 axis.
    pub log_y: bool,
    /// Default pixel size `(width, height)`.
    pub size: (u32, u32),
    pub body: PlanBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PlanBody {
    Scatter(ScatterPlan),
    Bar(BarPlan),
}

/// Scatter markers plus an optional fitted curve and callouts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPlan {
    pub groups: Vec<PointGroup>,
    pub curve: Option<CurvePlan>,
    pub labels: Vec<LabelRequest>,
}

/// Markers sharing a color and a legend entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointGroup {
    pub name: String,
    /// Palette index.
    pub tone: usize,
    pub points: Vec<(f64, f64)>,
}

/// A sampled fit line. Carries the family, never its parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurvePlan {
    pub name: String,
    pub tone: usize,
    pub family: FamilyKind,
    pub samples: Vec<(f64, f64)>,
}

/// Categorical bars.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarPlan {
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub name: String,
    pub value: f64,
    pub tone: usize,
    /// Text drawn above the bar.
    pub label: String,
}

impl ChartPlan {
    /// Bounding box of everything drawn, as `(x_min, x_max, y_min, y_max)`.
    ///
    /// Bar charts span one unit per bar on x. Non-finite values are skipped; on a log
    /// axis non-positive y values are skipped too. Returns `None` when nothing is left.
    pub fn extent(&self) -> Option<(f64, f64, f64, f64)> {
        let points: Vec<(f64, f64)> = match &self.body {
            PlanBody::Scatter(s) => s
                .groups
                .iter()
                .flat_map(|g| g.points.iter().copied())
                .chain(s.curve.iter().flat_map(|c| c.samples.iter().copied()))
                .chain(s.labels.iter().map(|l| l.anchor))
                .collect(),
            PlanBody::Bar(b) => b
                .bars
                .iter()
                .enumerate()
                .map(|(i, bar)| (i as f64, bar.value))
                .collect(),
        };

        let mut extent: Option<(f64, f64, f64, f64)> = None;
        for (x, y) in points {
            if !(x.is_finite() && y.is_finite()) || (self.log_y && y <= 0.0) {
                continue;
            }
            extent = Some(match extent {
                None => (x, x, y, y),
                Some((x0, x1, y0, y1)) => (x0.min(x), x1.max(x), y0.min(y), y1.max(y)),
            });
        }
        extent
    }

    /// Legend-ordered group names, followed by the curve name.
    pub fn legend(&self) -> Vec<String> {
        match &self.body {
            PlanBody::Scatter(s) => s
                .groups
                .iter()
                .map(|g| g.name.clone())
                .chain(s.curve.iter().map(|c| c.name.clone()))
                .collect(),
            PlanBody::Bar(b) => b.bars.iter().map(|bar| bar.name.clone()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scatter(log_y: bool, points: Vec<(f64, f64)>) -> ChartPlan {
        ChartPlan {
            id: ChartId::BranchingFactor,
            title: "t".into(),
            x_label: "x".into(),
            y_label: "y".into(),
            log_y,
            size: (800, 400),
            body: PlanBody::Scatter(ScatterPlan {
                groups: vec![PointGroup {
                    name: "g".into(),
                    tone: 0,
                    points,
                }],
                curve: None,
                labels: Vec::new(),
            }),
        }
    }

    #[test]
    fn extent_skips_non_positive_on_log_axis() {
        let plan = scatter(true, vec![(0.0, 0.0), (1.0, 10.0), (2.0, 1000.0)]);
        assert_eq!(plan.extent(), Some((1.0, 2.0, 10.0, 1000.0)));
        let linear = scatter(false, vec![(0.0, 0.0), (1.0, 10.0)]);
        assert_eq!(linear.extent(), Some((0.0, 1.0, 0.0, 10.0)));
    }

    #[test]
    fn empty_plan_has_no_extent() {
        assert_eq!(scatter(false, Vec::new()).extent(), None);
    }
}

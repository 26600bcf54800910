//! Axis scaling shared by the SVG renderer and the terminal viewer.
//!
//! Log-scaled charts are drawn in log10 space on a linear axis; tick labels are
//! printed back as powers of ten.

use crate::charts::ChartPlan;

/// How y values map onto the plotted axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YScale {
    Linear,
    Log10,
}

impl YScale {
    pub fn for_plan(plan: &ChartPlan) -> Self {
        if plan.log_y {
            YScale::Log10
        } else {
            YScale::Linear
        }
    }

    /// Plotted coordinate for `y`, or `None` if it cannot be drawn on this axis.
    pub fn map(self, y: f64) -> Option<f64> {
        let v = match self {
            YScale::Linear => y,
            YScale::Log10 if y > 0.0 => y.log10(),
            YScale::Log10 => return None,
        };
        v.is_finite().then_some(v)
    }

    /// Tick text for a plotted coordinate.
    pub fn tick_label(self, v: f64) -> String {
        match self {
            YScale::Linear if v.abs() >= 100.0 || v == v.round() => format!("{v:.0}"),
            YScale::Linear => format!("{v:.2}"),
            YScale::Log10 if (v - v.round()).abs() < 1e-9 => format!("10^{}", v.round()),
            YScale::Log10 => format!("10^{v:.1}"),
        }
    }
}

/// Padded plot bounds in plotted coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotBounds {
    pub x: [f64; 2],
    pub y: [f64; 2],
}

/// Bounds covering everything in `plan`, padded by a few percent on each side.
///
/// Returns `None` for a plan with nothing drawable.
pub fn plot_bounds(plan: &ChartPlan, scale: YScale) -> Option<PlotBounds> {
    let (x0, x1, y0, y1) = plan.extent()?;
    let y0 = scale.map(y0)?;
    let y1 = scale.map(y1)?;
    Some(PlotBounds {
        x: pad(x0, x1, 0.04),
        y: pad(y0, y1, 0.08),
    })
}

fn pad(lo: f64, hi: f64, frac: f64) -> [f64; 2] {
    let span = hi - lo;
    let margin = if span > 0.0 { span * frac } else { lo.abs().max(1.0) * 0.5 };
    [lo - margin, hi + margin]
}

//! Series Annotator.
//!
//! Decides which points of a series are drawn as plain markers, which are drawn
//! distinctly, and which are not drawn at all, and where text callouts go.
//! Everything here is a pure function of its inputs.

pub mod label;

pub use label::*;

use crate::domain::{ClassifiedPoint, DataSeries, PointRole};

/// Which indices of a series are highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HighlightPolicy {
    /// Every non-pad point is regular.
    #[default]
    None,
    /// A single fixed index.
    Fixed(usize),
    /// The trailing `n` points (e.g. a long-horizon estimate at the series tail).
    Tail(usize),
    /// Every `period`-th index, starting at 0. A period of 0 highlights nothing.
    Periodic(usize),
}

impl HighlightPolicy {
    /// Whether `index` of a series of length `len` is selected.
    pub fn selects(self, index: usize, len: usize) -> bool {
        match self {
            HighlightPolicy::None => false,
            HighlightPolicy::Fixed(i) => index == i,
            HighlightPolicy::Tail(n) => index + n >= len,
            HighlightPolicy::Periodic(0) => false,
            HighlightPolicy::Periodic(k) => index % k == 0,
        }
    }
}

/// Tag every point of `series` with its rendering role.
///
/// Pad points are always `Excluded`, even when the policy selects them: they exist
/// to steer the fit and are never drawn.
pub fn classify(series: &DataSeries, policy: HighlightPolicy) -> Vec<ClassifiedPoint> {
    let len = series.len();
    series
        .points()
        .iter()
        .enumerate()
        .map(|(index, p)| {
            let role = if p.pad {
                PointRole::Excluded
            } else if policy.selects(index, len) {
                PointRole::Highlighted
            } else {
                PointRole::Regular
            };
            ClassifiedPoint {
                index,
                x: p.x,
                y: p.y,
                role,
            }
        })
        .collect()
}

/// Points with the given role, as `(x, y)` pairs in series order.
pub fn points_with_role(points: &[ClassifiedPoint], role: PointRole) -> Vec<(f64, f64)> {
    points
        .iter()
        .filter(|p| p.role == role)
        .map(|p| (p.x, p.y))
        .collect()
}

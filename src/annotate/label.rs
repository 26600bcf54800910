//! Label placement and text formatting.

use crate::domain::{ClassifiedPoint, LabelAlign, LabelOffset, LabelRequest, PointRole};

/// A callout for a single point.
pub fn label_at(
    point: (f64, f64),
    text: impl Into<String>,
    offset: LabelOffset,
    align: LabelAlign,
    tone: Option<usize>,
) -> LabelRequest {
    LabelRequest {
        point,
        anchor: offset.apply(point.0, point.1),
        text: text.into(),
        align,
        tone,
    }
}

/// One callout per highlighted point; `text` and `tone` are looked up by series index.
pub fn label_highlighted<T, C>(
    points: &[ClassifiedPoint],
    offset: LabelOffset,
    align: LabelAlign,
    text: T,
    tone: C,
) -> Vec<LabelRequest>
where
    T: Fn(usize) -> String,
    C: Fn(usize) -> Option<usize>,
{
    points
        .iter()
        .filter(|p| p.role == PointRole::Highlighted)
        .map(|p| label_at((p.x, p.y), text(p.index), offset, align, tone(p.index)))
        .collect()
}

/// Split a positive value into `(mantissa, exponent)` with `exponent = floor(log10 v)`.
///
/// Returns `None` for zero, negative or non-finite values.
pub fn scientific_parts(value: f64) -> Option<(f64, i32)> {
    if !(value.is_finite() && value > 0.0) {
        return None;
    }
    let exponent = value.log10().floor() as i32;
    Some((value / 10f64.powi(exponent), exponent))
}

/// `"3.35 × 10^123"` style text with `digits` decimals in the mantissa.
///
/// Values without a scientific form are printed as-is.
pub fn format_scientific(value: f64, digits: usize) -> String {
    let Some((mut mantissa, mut exponent)) = scientific_parts(value) else {
        return format!("{value}");
    };
    // 9.999 at two decimals would print as 10.00.
    let scale = 10f64.powi(digits as i32);
    if (mantissa * scale).round() / scale >= 10.0 {
        mantissa /= 10.0;
        exponent += 1;
    }
    format!("{mantissa:.digits$} × 10^{exponent}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scientific_labels_match_bar_chart_text() {
        assert_eq!(format_scientific(3.353e123, 2), "3.35 × 10^123");
        assert_eq!(format_scientific(19683.0, 2), "1.97 × 10^4");
        assert_eq!(format_scientific(2015099950053364471960.0, 3), "2.015 × 10^21");
    }

    #[test]
    fn scientific_rounding_carries_into_exponent() {
        assert_eq!(format_scientific(99_999.0, 2), "1.00 × 10^5");
        assert_eq!(format_scientific(-5.0, 2), "-5");
        assert!(scientific_parts(0.0).is_none());
    }

    #[test]
    fn labels_follow_highlighted_points() {
        let points = [
            ClassifiedPoint {
                index: 0,
                x: 1.0,
                y: 0.0,
                role: PointRole::Highlighted,
            },
            ClassifiedPoint {
                index: 1,
                x: 2.0,
                y: 112.0,
                role: PointRole::Regular,
            },
        ];
        let labels = label_highlighted(
            &points,
            LabelOffset::additive(-0.5, 2.0),
            LabelAlign::Left,
            |i| format!("#{i}"),
            |_| Some(2),
        );
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].anchor, (0.5, 2.0));
        assert_eq!(labels[0].text, "#0");
        assert_eq!(labels[0].tone, Some(2));
    }
}

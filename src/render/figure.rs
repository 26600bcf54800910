//! Scatter + fit-line figures.

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::charts::{ChartPlan, ScatterPlan};
use crate::domain::{LabelAlign, LabelRequest};
use crate::render::scale::{plot_bounds, YScale};
use crate::render::theme::Theme;

/// Draw a scatter plan onto `root`.
///
/// Draw order: grid, fit line, markers per group, callouts, legend.
pub fn draw_scatter<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    plan: &ChartPlan,
    scatter: &ScatterPlan,
    theme: &Theme,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;

    let scale = YScale::for_plan(plan);
    let Some(bounds) = plot_bounds(plan, scale) else {
        return Ok(());
    };

    let mut chart = ChartBuilder::on(root)
        .caption(&plan.title, theme.bold_font(theme.font_size + 4).color(&theme.text))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(if scale == YScale::Log10 { 70 } else { 55 })
        .build_cartesian_2d(bounds.x[0]..bounds.x[1], bounds.y[0]..bounds.y[1])?;

    chart.plotting_area().fill(&theme.background)?;

    let fmt_y = move |v: &f64| scale.tick_label(*v);
    chart
        .configure_mesh()
        .bold_line_style(theme.grid.stroke_width(1))
        .light_line_style(TRANSPARENT)
        .axis_style(TRANSPARENT)
        .x_desc(plan.x_label.as_str())
        .y_desc(plan.y_label.as_str())
        .axis_desc_style(theme.bold_font(theme.font_size).color(&theme.text))
        .label_style(theme.font(theme.font_size - 2).color(&theme.text))
        .y_label_formatter(&fmt_y)
        .draw()?;

    if let Some(curve) = &scatter.curve {
        let color = theme.tone(curve.tone);
        let width = theme.line_width;
        let samples: Vec<(f64, f64)> = curve
            .samples
            .iter()
            .filter_map(|&(x, y)| scale.map(y).map(|y| (x, y)))
            .collect();
        chart
            .draw_series(DashedLineSeries::new(
                samples,
                width * 2,
                width * 2,
                color.stroke_width(width),
            ))?
            .label(curve.name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 24, y)], color.stroke_width(width)));
    }

    let radius = theme.marker_radius;
    for group in &scatter.groups {
        let color = theme.tone(group.tone);
        let points: Vec<(f64, f64)> = group
            .points
            .iter()
            .filter_map(|&(x, y)| scale.map(y).map(|y| (x, y)))
            .collect();
        chart
            .draw_series(points.into_iter().map(|(x, y)| {
                EmptyElement::at((x, y))
                    + Circle::new((0, 0), radius, color.filled())
                    + Circle::new((0, 0), radius, WHITE.stroke_width(1))
            }))?
            .label(group.name.as_str())
            .legend(move |(x, y)| Circle::new((x + 12, y), radius, color.filled()));
    }

    for label in &scatter.labels {
        let Some(y) = scale.map(label.anchor.1) else {
            continue;
        };
        let (rect, text) = callout(label, theme);
        chart.draw_series(std::iter::once(
            EmptyElement::at((label.anchor.0, y)) + rect + text,
        ))?;
    }

    chart
        .configure_series_labels()
        .position(legend_position(scatter))
        .background_style(WHITE.mix(0.8))
        .border_style(theme.grid)
        .label_font(theme.font(theme.font_size - 2).color(&theme.text))
        .draw()?;

    root.present()?;
    Ok(())
}

/// Box and text of a callout, in pixel offsets from its anchor.
fn callout(
    label: &LabelRequest,
    theme: &Theme,
) -> (Rectangle<(i32, i32)>, Text<'static, (i32, i32), String>) {
    let size = theme.font_size - 2;
    // Text extents are not measurable without a font backend; monospace glyphs are ~0.6em.
    let width = (label.text.chars().count() as f64 * f64::from(size) * 0.6).ceil() as i32 + 6;
    let height = size as i32 + 4;
    let (left, hpos) = match label.align {
        LabelAlign::Left => (0, HPos::Left),
        LabelAlign::Center => (-width / 2, HPos::Center),
    };
    let text_x = match label.align {
        LabelAlign::Left => 3,
        LabelAlign::Center => 0,
    };
    let fill = match label.tone {
        Some(tone) => theme.tone(tone).mix(0.5),
        None => WHITE.mix(0.5),
    };
    let style = theme
        .font(size)
        .color(&theme.text)
        .pos(Pos::new(hpos, VPos::Center));

    (
        Rectangle::new([(left, -height / 2), (left + width, height / 2)], fill.filled()),
        Text::new(label.text.clone(), (text_x, 0), style),
    )
}

/// Put the legend in the corner the data leaves free.
fn legend_position(scatter: &ScatterPlan) -> SeriesLabelPosition {
    let first = scatter.groups.iter().find_map(|g| g.points.first());
    let last = scatter.groups.iter().find_map(|g| g.points.last());
    match (first, last) {
        (Some(a), Some(b)) if b.1 < a.1 => SeriesLabelPosition::UpperRight,
        _ => SeriesLabelPosition::UpperLeft,
    }
}

//! Categorical bar charts on a segmented x axis.

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::charts::{BarPlan, ChartPlan};
use crate::render::scale::{plot_bounds, YScale};
use crate::render::theme::Theme;

pub fn draw_bars<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    plan: &ChartPlan,
    bars: &BarPlan,
    theme: &Theme,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;

    let scale = YScale::for_plan(plan);
    let Some(bounds) = plot_bounds(plan, scale) else {
        return Ok(());
    };
    // Bars grow from 0 on a linear axis and from 10^0 on a log axis.
    let base = 0.0;
    let bottom = bounds.y[0].min(base);
    let top = bounds.y[1];

    let n = bars.bars.len();
    let mut chart = ChartBuilder::on(root)
        .caption(&plan.title, theme.bold_font(theme.font_size + 4).color(&theme.text))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d((0..n).into_segmented(), bottom..top)?;

    chart.plotting_area().fill(&theme.background)?;

    let names: Vec<&str> = bars.bars.iter().map(|b| b.name.as_str()).collect();
    let fmt_x = |v: &SegmentValue<usize>| match v {
        SegmentValue::CenterOf(i) => names.get(*i).map_or_else(String::new, |s| s.to_string()),
        _ => String::new(),
    };
    let fmt_y = move |v: &f64| scale.tick_label(*v);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .bold_line_style(theme.grid.stroke_width(1))
        .light_line_style(TRANSPARENT)
        .axis_style(TRANSPARENT)
        .x_desc(plan.x_label.as_str())
        .y_desc(plan.y_label.as_str())
        .axis_desc_style(theme.bold_font(theme.font_size).color(&theme.text))
        .label_style(theme.font(theme.font_size - 2).color(&theme.text))
        .x_labels(n)
        .x_label_formatter(&fmt_x)
        .y_label_formatter(&fmt_y)
        .draw()?;

    let heights: Vec<Option<f64>> = bars.bars.iter().map(|b| scale.map(b.value)).collect();

    chart.draw_series(bars.bars.iter().zip(&heights).enumerate().filter_map(
        |(i, (bar, height))| {
            let height = (*height)?;
            let mut rect = Rectangle::new(
                [(SegmentValue::Exact(i), base), (SegmentValue::Exact(i + 1), height)],
                theme.tone(bar.tone).filled(),
            );
            rect.set_margin(0, 0, 8, 8);
            Some(rect)
        },
    ))?;

    let label_style = theme
        .bold_font(theme.font_size - 2)
        .color(&theme.text)
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    chart.draw_series(bars.bars.iter().zip(&heights).enumerate().filter_map(
        |(i, (bar, height))| {
            let height = (*height)?;
            Some(
                EmptyElement::at((SegmentValue::CenterOf(i), height))
                    + Text::new(bar.label.clone(), (0, -3), label_style.clone()),
            )
        },
    ))?;

    root.present()?;
    Ok(())
}

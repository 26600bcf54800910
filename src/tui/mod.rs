//! Ratatui-based terminal viewer.
//!
//! `charts show <chart>` draws a finished [`ChartPlan`] inside the alternate screen.
//! Scatter plans use ratatui's `Chart` widget, bar plans its `BarChart`. There is no
//! editing: the plan is fixed before the terminal is touched.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span, Text},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Terminal,
};

use crate::charts::{BarPlan, ChartPlan, PlanBody, ScatterPlan};
use crate::error::{AppError, EXIT_OUTPUT};
use crate::render::{plot_bounds, Theme, YScale};

const TICKS: usize = 5;

/// Show `plan` until the user quits. `summary` goes in the header.
pub fn run(plan: &ChartPlan, summary: Option<String>, theme: &Theme) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(EXIT_OUTPUT, format!("Failed to initialize terminal: {e}")))?;

    let viewer = Viewer::new(plan, summary, theme);
    viewer.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::new(EXIT_OUTPUT, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(
                EXIT_OUTPUT,
                format!("Failed to enter alternate screen: {e}"),
            ));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// A drawable series in plotted coordinates.
#[derive(Debug, Clone)]
struct ViewSeries {
    name: String,
    color: Color,
    graph: GraphType,
    points: Vec<(f64, f64)>,
}

/// Everything the `Chart` widget needs, precomputed from a scatter plan.
#[derive(Debug, Clone)]
struct ScatterView {
    series: Vec<ViewSeries>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    x_labels: Vec<String>,
    y_labels: Vec<String>,
}

struct Viewer<'p> {
    plan: &'p ChartPlan,
    summary: Option<String>,
    theme: &'p Theme,
    scatter: Option<ScatterView>,
}

impl<'p> Viewer<'p> {
    fn new(plan: &'p ChartPlan, summary: Option<String>, theme: &'p Theme) -> Self {
        let scatter = match &plan.body {
            PlanBody::Scatter(scatter) => scatter_view(plan, scatter, theme),
            PlanBody::Bar(_) => None,
        };
        Self {
            plan,
            summary,
            theme,
            scatter,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(EXIT_OUTPUT, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(EXIT_OUTPUT, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read()
                .map_err(|e| AppError::new(EXIT_OUTPUT, format!("Event read error: {e}")))?
            {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                        break;
                    }
                }
                Event::Resize(_, _) => needs_redraw = true,
                _ => {}
            }
        }
        Ok(())
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(frame.area());

        self.draw_header(frame, chunks[0]);
        match &self.plan.body {
            PlanBody::Scatter(_) => self.draw_scatter(frame, chunks[1]),
            PlanBody::Bar(bars) => self.draw_bars(frame, chunks[1], bars),
        }
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines = vec![Line::from(vec![
            Span::styled(self.plan.id.slug(), Style::default().fg(Color::Cyan)),
            Span::raw(format!(" | {}", self.plan.title)),
        ])];
        if let Some(summary) = &self.summary {
            lines.push(Line::from(Span::styled(
                summary.clone(),
                Style::default().fg(Color::Gray),
            )));
        }
        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_scatter(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title(self.plan.title.as_str())
            .borders(Borders::ALL);

        let Some(view) = &self.scatter else {
            let msg = Paragraph::new("Nothing to draw.")
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            frame.render_widget(msg, area);
            return;
        };

        let datasets = view
            .series
            .iter()
            .map(|s| {
                let marker = match s.graph {
                    GraphType::Line => symbols::Marker::Braille,
                    _ => symbols::Marker::Dot,
                };
                Dataset::default()
                    .name(s.name.as_str())
                    .marker(marker)
                    .graph_type(s.graph)
                    .style(Style::default().fg(s.color))
                    .data(&s.points)
            })
            .collect();

        let axis_style = Style::default().fg(Color::Gray);
        let chart = Chart::new(datasets)
            .block(block)
            .x_axis(
                Axis::default()
                    .title(self.plan.x_label.as_str())
                    .style(axis_style)
                    .bounds(view.x_bounds)
                    .labels(view.x_labels.iter().map(String::as_str)),
            )
            .y_axis(
                Axis::default()
                    .title(self.plan.y_label.as_str())
                    .style(axis_style)
                    .bounds(view.y_bounds)
                    .labels(view.y_labels.iter().map(String::as_str)),
            );
        frame.render_widget(chart, area);
    }

    fn draw_bars(&self, frame: &mut ratatui::Frame<'_>, area: Rect, plan: &BarPlan) {
        let scale = YScale::for_plan(self.plan);
        let bars: Vec<Bar> = plan
            .bars
            .iter()
            .map(|bar| {
                Bar::default()
                    .label(Line::from(bar.name.as_str()))
                    .value(bar_height(scale, bar.value))
                    .text_value(bar.label.clone())
                    .style(Style::default().fg(tone_color(self.theme, bar.tone)))
                    .value_style(
                        Style::default()
                            .fg(Color::Black)
                            .add_modifier(Modifier::BOLD),
                    )
            })
            .collect();

        let count = plan.bars.len().max(1) as u16;
        let width = (area.width.saturating_sub(2) / count).saturating_sub(2).max(3);
        let chart = BarChart::default()
            .block(
                Block::default()
                    .title(format!("{} ({})", self.plan.title, self.plan.y_label))
                    .borders(Borders::ALL),
            )
            .data(BarGroup::default().bars(&bars))
            .bar_width(width)
            .bar_gap(2);
        frame.render_widget(chart, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let legend = match &self.scatter {
            Some(view) => view
                .series
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            None => String::new(),
        };
        let line = Line::from(vec![
            Span::styled("q/Esc quit", Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(legend, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn tone_color(theme: &Theme, tone: usize) -> Color {
    let c = theme.tone(tone);
    Color::Rgb(c.0, c.1, c.2)
}

/// Bar heights are integers; keep two decimals of the plotted value.
fn bar_height(scale: YScale, value: f64) -> u64 {
    scale
        .map(value)
        .map_or(0, |v| (v.max(0.0) * 100.0).round() as u64)
}

/// Map a scatter plan into plotted coordinates for the `Chart` widget.
///
/// Returns `None` when nothing in the plan can be drawn on its axis.
fn scatter_view(plan: &ChartPlan, scatter: &ScatterPlan, theme: &Theme) -> Option<ScatterView> {
    let scale = YScale::for_plan(plan);
    let bounds = plot_bounds(plan, scale)?;
    let project = |points: &[(f64, f64)]| -> Vec<(f64, f64)> {
        points
            .iter()
            .filter_map(|&(x, y)| scale.map(y).map(|y| (x, y)))
            .collect()
    };

    let mut series = Vec::new();
    if let Some(curve) = &scatter.curve {
        series.push(ViewSeries {
            name: curve.name.clone(),
            color: tone_color(theme, curve.tone),
            graph: GraphType::Line,
            points: project(&curve.samples),
        });
    }
    for group in &scatter.groups {
        series.push(ViewSeries {
            name: group.name.clone(),
            color: tone_color(theme, group.tone),
            graph: GraphType::Scatter,
            points: project(&group.points),
        });
    }

    Some(ScatterView {
        series,
        x_bounds: bounds.x,
        y_bounds: bounds.y,
        x_labels: ticks(bounds.x, |v| format!("{v:.0}")),
        y_labels: ticks(bounds.y, |v| scale.tick_label(v)),
    })
}

fn ticks(bounds: [f64; 2], fmt: impl Fn(f64) -> String) -> Vec<String> {
    (0..TICKS)
        .map(|i| {
            let u = i as f64 / (TICKS as f64 - 1.0);
            fmt(bounds[0] + u * (bounds[1] - bounds[0]))
        })
        .collect()
}

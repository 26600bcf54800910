//! Rendering collaborator.
//!
//! Consumes finished [`ChartPlan`]s and draws them with plotters. The drawing code
//! is generic over the plotters backend; files are written through `SVGBackend`.

pub mod bar;
pub mod figure;
pub mod scale;
pub mod theme;

pub use scale::*;
pub use theme::Theme;

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::info;

use crate::charts::{ChartPlan, PlanBody};
use crate::error::{AppError, EXIT_CONFIG, EXIT_OUTPUT};

/// Draw `plan` onto any plotters drawing area.
pub fn draw_plan<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    plan: &ChartPlan,
    theme: &Theme,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    match &plan.body {
        PlanBody::Scatter(scatter) => figure::draw_scatter(root, plan, scatter, theme),
        PlanBody::Bar(bars) => bar::draw_bars(root, plan, bars, theme),
    }
}

/// Render `plan` to an SVG file at `path`.
///
/// Only `.svg` output is supported; other extensions are a configuration error.
pub fn render_to_svg(
    plan: &ChartPlan,
    path: &Path,
    size: (u32, u32),
    theme: &Theme,
) -> Result<(), AppError> {
    check_svg_path(path)?;

    {
        let root = SVGBackend::new(path, size).into_drawing_area();
        draw_plan(&root, plan, theme).map_err(|e| {
            AppError::new(
                EXIT_OUTPUT,
                format!("Failed to render {}: {e}", path.display()),
            )
        })?;
    }

    info!(chart = plan.id.slug(), path = %path.display(), "wrote svg");
    Ok(())
}

/// Render `plan` to an in-memory SVG document.
pub fn render_svg_string(
    plan: &ChartPlan,
    size: (u32, u32),
    theme: &Theme,
) -> Result<String, AppError> {
    let mut out = String::new();
    {
        let root = SVGBackend::with_string(&mut out, size).into_drawing_area();
        draw_plan(&root, plan, theme)
            .map_err(|e| AppError::new(EXIT_OUTPUT, format!("Failed to render svg: {e}")))?;
    }
    Ok(out)
}

fn check_svg_path(path: &Path) -> Result<(), AppError> {
    let is_svg = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
    if is_svg {
        Ok(())
    } else {
        Err(AppError::new(
            EXIT_CONFIG,
            format!(
                "Unsupported output format for {} (only .svg is supported).",
                path.display()
            ),
        ))
    }
}

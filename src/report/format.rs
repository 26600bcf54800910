//! Formatted terminal output.
//!
//! Formatting lives here so the fitting and chart code never build display strings
//! for the terminal.

use crate::domain::ChartId;
use crate::report::ChartSummary;

/// One line per chart: slug, then title.
pub fn format_chart_list() -> String {
    let width = ChartId::ALL
        .iter()
        .map(|id| id.slug().len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for id in ChartId::ALL {
        out.push_str(&format!("{:<width$}  {}\n", id.slug(), id.title()));
    }
    out
}

/// One-line summary of a chart run.
///
/// `chart | formula | evaluations | path`, omitting the parts that do not apply.
pub fn format_summary(summary: &ChartSummary) -> String {
    let mut parts = vec![summary.chart.slug().to_string()];
    match &summary.formula {
        Some(formula) => parts.push(formula.clone()),
        None => parts.push("no fit".to_string()),
    }
    if let Some(n) = summary.evaluations {
        parts.push(format!("evaluations={n}"));
    }
    if let Some(path) = &summary.output {
        parts.push(format!("wrote {}", path.display()));
    }
    parts.join(" | ")
}

//! Render-plan JSON export.
//!
//! A plan file carries exactly what a renderer draws: point groups, sampled curves
//! and label requests. Fitted parameter vectors are never written.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use tracing::info;

use crate::charts::ChartPlan;
use crate::error::{AppError, EXIT_OUTPUT};

/// Serialize `plan` as pretty JSON.
pub fn plan_to_json(plan: &ChartPlan) -> Result<String, AppError> {
    serde_json::to_string_pretty(plan)
        .map_err(|e| AppError::new(EXIT_OUTPUT, format!("Failed to encode plan JSON: {e}")))
}

/// Write `plan` to `path`, or to stdout when no path is given.
pub fn write_plan(plan: &ChartPlan, path: Option<&Path>) -> Result<(), AppError> {
    let Some(path) = path else {
        let json = plan_to_json(plan)?;
        let mut out = io::stdout().lock();
        return writeln!(out, "{json}")
            .map_err(|e| AppError::new(EXIT_OUTPUT, format!("Failed to write plan JSON: {e}")));
    };

    let file = File::create(path).map_err(|e| {
        AppError::new(
            EXIT_OUTPUT,
            format!("Failed to create plan JSON '{}': {e}", path.display()),
        )
    })?;
    serde_json::to_writer_pretty(file, plan)
        .map_err(|e| AppError::new(EXIT_OUTPUT, format!("Failed to write plan JSON: {e}")))?;

    info!(chart = plan.id.slug(), path = %path.display(), "wrote plan json");
    Ok(())
}

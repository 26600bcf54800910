//! Shared chart pipeline used by every front-end (SVG, terminal, plan JSON).
//!
//! chart tables -> fit -> classify -> plan
//!
//! Front-ends only differ in what they do with the finished [`ChartBuild`].

use tracing::debug;

use crate::charts::{build, ChartBuild, ChartOptions};
use crate::domain::ChartId;
use crate::error::AppError;

/// Build one chart, converting fit failures into process errors.
pub fn run_chart(id: ChartId, opts: &ChartOptions) -> Result<ChartBuild, AppError> {
    debug!(chart = id.slug(), ?opts, "running chart pipeline");
    let built = build(id, opts)?;
    debug!(
        chart = id.slug(),
        legend = ?built.plan.legend(),
        "chart plan ready"
    );
    Ok(built)
}

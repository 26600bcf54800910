//! Reporting utilities: the chart list and per-chart summaries.

pub mod format;

pub use format::*;

use std::path::PathBuf;

use crate::charts::ChartBuild;
use crate::domain::ChartId;

/// What a finished chart run reports back to the terminal.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSummary {
    pub chart: ChartId,
    /// Formula with resolved parameters; `None` for charts without a fit.
    pub formula: Option<String>,
    pub evaluations: Option<usize>,
    /// Output file, if anything was written.
    pub output: Option<PathBuf>,
}

impl ChartSummary {
    pub fn from_build(build: &ChartBuild, output: Option<PathBuf>) -> Self {
        Self {
            chart: build.plan.id,
            formula: build.curve.as_ref().map(|c| c.family().formula()),
            evaluations: build.curve.as_ref().map(|c| c.evaluations()),
            output,
        }
    }
}

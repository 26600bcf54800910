//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - data series and their pad points (`DataSeries`, `SeriesPoint`)
//! - fit configuration (`FamilyKind`, `FitConfig`, `SampleRange`)
//! - annotation outputs (`ClassifiedPoint`, `HighlightPoint`, `LabelRequest`)
//! - the chart catalogue (`ChartId`)

pub mod types;

pub use types::*;

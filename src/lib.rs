//! `gametree-charts` library crate.
//!
//! The binary (`charts`) is a thin wrapper around this library so that:
//!
//! - the fitter and annotator are testable without spawning processes
//! - chart plans can be drawn by more than one front-end (SVG, terminal, JSON)
//! - code stays easy to navigate as the chart set grows

pub mod annotate;
pub mod app;
pub mod charts;
pub mod cli;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod render;
pub mod report;
pub mod tui;

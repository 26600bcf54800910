//! Curve fitting orchestration.
//!
//! Responsibilities:
//!
//! - pick a model family from a series' growth shape (when not declared)
//! - seed the nonlinear families
//! - fit and materialize the prediction curve on an even grid

pub mod fitter;
pub mod grid;
pub mod selection;

pub use fitter::*;
pub use grid::*;
pub use selection::*;

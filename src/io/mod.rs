//! Input/output helpers.
//!
//! - render-plan JSON export (`plan`)

pub mod plan;

pub use plan::*;

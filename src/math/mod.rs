//! Mathematical utilities: closed-form line fits and Levenberg–Marquardt.

pub mod lm;
pub mod ols;

pub use lm::*;
pub use ols::*;

//! Error types.
//!
//! - `FitError` is the core taxonomy raised by fitting and series construction.
//! - `AppError` is what crosses the process boundary: a message plus the exit code
//!   `main` returns.

/// Exit code for invalid flags or configuration.
pub const EXIT_CONFIG: u8 = 2;
/// Exit code for a chart whose fit failed.
pub const EXIT_FIT: u8 = 3;
/// Exit code for rendering / terminal / output failures.
pub const EXIT_OUTPUT: u8 = 4;

/// Failures raised by the Fitter (and by `DataSeries` construction).
///
/// All of them abort the chart being generated; there is no fallback family and
/// no partially rendered curve.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FitError {
    #[error("domain violation: {detail}")]
    DomainViolation { detail: String },

    #[error("optimizer did not converge within {max_evaluations} evaluations (used {evaluations})")]
    ConvergenceError {
        evaluations: usize,
        max_evaluations: usize,
    },

    #[error("log-linear fit requires y > 0, got y[{index}] = {value}")]
    NonPositiveValue { index: usize, value: f64 },

    #[error("series has {actual} usable points, the model needs at least {required}")]
    InsufficientData { required: usize, actual: usize },

    #[error("initial guess has {actual} values, the model needs {expected}")]
    InvalidGuess { expected: usize, actual: usize },

    #[error("invalid series: {0}")]
    InvalidSeries(String),

    #[error("invalid prediction range: {0}")]
    InvalidRange(String),
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<FitError> for AppError {
    fn from(err: FitError) -> Self {
        match err {
            // Both come straight from command-line knobs.
            FitError::InvalidGuess { .. } | FitError::InvalidRange(_) => {
                AppError::new(EXIT_CONFIG, format!("Invalid fit settings: {err}"))
            }
            _ => AppError::new(EXIT_FIT, format!("Fit failed: {err}")),
        }
    }
}

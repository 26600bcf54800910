//! Levenberg–Marquardt least squares with a model-evaluation budget.
//!
//! We minimize the plain (unweighted, natural-scale) sum of squared residuals
//!
//! ```text
//! S(p) = Σ (y_i - f(x_i; p))^2
//! ```
//!
//! Implementation choices:
//! - The Jacobian is a forward difference with step `sqrt(ε)·|p_j|` (or `sqrt(ε)` when
//!   `p_j = 0`). If the forward probe leaves the model's domain we probe backwards; if
//!   that fails too, the column stays zero and the parameter is held for that iteration.
//! - Each step solves `(JᵀJ + λ·diag(JᵀJ)) δ = Jᵀr` (Marquardt scaling) with an LU
//!   factorization; the system is only 4×4.
//! - A trial step is accepted only when it lowers `S`, so the result is never worse than
//!   the seed. Trial points where the model is not finite count as rejections.
//! - Every model evaluation over the full sample (including Jacobian probes) counts
//!   against `max_evaluations`, mirroring MINPACK's `maxfev`.
//! - No randomness: identical inputs produce identical iterates.

use nalgebra::{DMatrix, DVector};

/// MINPACK's default relative tolerance (`sqrt` of machine epsilon, rounded).
pub const DEFAULT_TOLERANCE: f64 = 1.49012e-8;

const INITIAL_DAMPING: f64 = 1e-3;
const MIN_DAMPING: f64 = 1e-12;
const MAX_DAMPING: f64 = 1e16;
const DIAG_FLOOR: f64 = 1e-300;

/// Optimizer settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LmConfig {
    pub max_evaluations: usize,
    /// Relative tolerance on the actual and predicted reduction of `S`.
    pub ftol: f64,
    /// Relative tolerance on the step length.
    pub xtol: f64,
}

impl LmConfig {
    pub fn with_budget(max_evaluations: usize) -> Self {
        Self {
            max_evaluations,
            ftol: DEFAULT_TOLERANCE,
            xtol: DEFAULT_TOLERANCE,
        }
    }
}

/// Why the optimizer stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LmStatus {
    /// Relative reduction of `S` (actual and predicted) fell below `ftol`.
    ReductionConverged,
    /// Relative step length fell below `xtol`.
    StepConverged,
    /// No damping level produced a descent step: a stationary point.
    Stalled,
    /// The residual vanished or the gradient is exactly zero.
    ExactFit,
    /// The evaluation budget ran out before any tolerance was met.
    BudgetExhausted,
    /// Every probe around the current point left the model's domain.
    Infeasible,
}

impl LmStatus {
    pub fn is_converged(self) -> bool {
        matches!(
            self,
            LmStatus::ReductionConverged
                | LmStatus::StepConverged
                | LmStatus::Stalled
                | LmStatus::ExactFit
        )
    }
}

/// Result of a run. `params`/`sse` are the best point reached, whatever the status.
#[derive(Debug, Clone, PartialEq)]
pub struct LmOutcome {
    pub params: Vec<f64>,
    pub sse: f64,
    pub evaluations: usize,
    pub status: LmStatus,
}

/// Sample data plus an evaluation counter.
struct Problem<'a, F> {
    model: F,
    xs: &'a [f64],
    ys: &'a [f64],
    evaluations: usize,
}

impl<F: Fn(f64, &[f64]) -> f64> Problem<'_, F> {
    /// `y - f(x; p)`, or `None` if any prediction is not finite.
    fn residuals(&mut self, params: &[f64]) -> Option<DVector<f64>> {
        self.evaluations += 1;
        let mut out = DVector::<f64>::zeros(self.xs.len());
        for (i, (&x, &y)) in self.xs.iter().zip(self.ys).enumerate() {
            let f = (self.model)(x, params);
            if !f.is_finite() {
                return None;
            }
            out[i] = y - f;
        }
        Some(out)
    }

    /// Forward-difference Jacobian of the model (`∂f/∂p`), given residuals at `params`.
    ///
    /// A parameter that cannot be moved either way without leaving the domain (an
    /// integer exponent on a negative base, say) gets a zero column, so the step
    /// leaves it unchanged. `None` only when no parameter can be moved at all.
    fn jacobian(&mut self, params: &[f64], r: &DVector<f64>) -> Option<DMatrix<f64>> {
        let sqrt_eps = f64::EPSILON.sqrt();
        let mut jac = DMatrix::<f64>::zeros(self.xs.len(), params.len());
        let mut shifted = params.to_vec();
        let mut held = 0;

        for j in 0..params.len() {
            let mut h = sqrt_eps * params[j].abs();
            if h == 0.0 {
                h = sqrt_eps;
            }

            shifted[j] = params[j] + h;
            let mut r_shifted = self.residuals(&shifted);
            if r_shifted.is_none() {
                h = -h;
                shifted[j] = params[j] + h;
                r_shifted = self.residuals(&shifted);
            }
            shifted[j] = params[j];

            let Some(r_shifted) = r_shifted else {
                held += 1;
                continue;
            };
            for i in 0..self.xs.len() {
                jac[(i, j)] = (r[i] - r_shifted[i]) / h;
            }
        }

        (held < params.len()).then_some(jac)
    }
}

/// Minimize `Σ (y_i - model(x_i, p))²` starting from `initial`.
///
/// The caller is expected to have checked that `initial` is inside the model's domain;
/// if it is not, the run stops immediately with [`LmStatus::Infeasible`].
pub fn levenberg_marquardt<F>(
    model: F,
    xs: &[f64],
    ys: &[f64],
    initial: &[f64],
    config: &LmConfig,
) -> LmOutcome
where
    F: Fn(f64, &[f64]) -> f64,
{
    let mut problem = Problem {
        model,
        xs,
        ys,
        evaluations: 0,
    };
    let n = initial.len();
    let mut params = DVector::from_column_slice(initial);

    let Some(mut r) = problem.residuals(params.as_slice()) else {
        return finish(&params, f64::NAN, problem.evaluations, LmStatus::Infeasible);
    };
    let mut sse = r.norm_squared();
    let mut damping = INITIAL_DAMPING;

    loop {
        if sse == 0.0 {
            return finish(&params, sse, problem.evaluations, LmStatus::ExactFit);
        }

        let Some(jac) = problem.jacobian(params.as_slice(), &r) else {
            return finish(&params, sse, problem.evaluations, LmStatus::Infeasible);
        };
        let jtj = jac.transpose() * &jac;
        let gradient = jac.transpose() * &r;
        if gradient.amax() == 0.0 {
            return finish(&params, sse, problem.evaluations, LmStatus::ExactFit);
        }

        // Inner loop: raise the damping until a trial step lowers S.
        let mut only_infeasible = true;
        loop {
            if problem.evaluations >= config.max_evaluations {
                return finish(&params, sse, problem.evaluations, LmStatus::BudgetExhausted);
            }

            let mut system = jtj.clone();
            for k in 0..n {
                system[(k, k)] += damping * jtj[(k, k)].max(DIAG_FLOOR);
            }

            if let Some(delta) = system.lu().solve(&gradient) {
                let trial = &params + &delta;
                if let Some(r_trial) = problem.residuals(trial.as_slice()) {
                    let sse_trial = r_trial.norm_squared();
                    if sse_trial < sse {
                        let actual = (sse - sse_trial) / sse;
                        let predicted = (sse - (&r - &jac * &delta).norm_squared()) / sse;
                        let step = delta.norm();
                        let scale = params.norm();

                        params = trial;
                        r = r_trial;
                        sse = sse_trial;
                        damping = (damping / 10.0).max(MIN_DAMPING);

                        if actual <= config.ftol && predicted.abs() <= config.ftol {
                            return finish(
                                &params,
                                sse,
                                problem.evaluations,
                                LmStatus::ReductionConverged,
                            );
                        }
                        if step <= config.xtol * (scale + config.xtol) {
                            return finish(
                                &params,
                                sse,
                                problem.evaluations,
                                LmStatus::StepConverged,
                            );
                        }
                        break;
                    }
                    only_infeasible = false;
                }
            } else {
                only_infeasible = false;
            }

            damping *= 10.0;
            if damping > MAX_DAMPING {
                let status = if only_infeasible {
                    LmStatus::Infeasible
                } else {
                    LmStatus::Stalled
                };
                return finish(&params, sse, problem.evaluations, status);
            }
        }
    }
}

fn finish(params: &DVector<f64>, sse: f64, evaluations: usize, status: LmStatus) -> LmOutcome {
    LmOutcome {
        params: params.iter().copied().collect(),
        sse,
        evaluations,
        status,
    }
}

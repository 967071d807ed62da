//! Symmetric NMF by damped multiplicative updates.
//!
//! Given a fixed normalized similarity `W` (n×n) and an initial non-negative factor
//! `H₀` (n×k), each iteration computes
//!
//! ```text
//! H'[i][j] = H[i][j] · ((1 - β) + β · (W·H)[i][j] / (H·Hᵀ·H)[i][j])
//! ```
//!
//! and stops once `‖H' - H‖²_F < ε` or after `max_iter` updates.
//!
//! ## Termination
//!
//! The loop owns a single current `H`. Every update is accepted (replacing `H`) before
//! the convergence test, so:
//!
//! - [`Termination::Converged`]: `h` is the update whose step fell below `ε`.
//! - [`Termination::Exhausted`]: `h` is the result of the `max_iter`-th update. With
//!   `max_iter == 0`, `h` is `H₀` unchanged.
//! - [`Termination::Stopped`]: the observer asked to stop; `h` is the last accepted update.
//!
//! ## Degeneracy
//!
//! A denominator `(H·Hᵀ·H)[i][j]` that is zero (e.g. an all-zero row of `H`) or non-finite
//! aborts the run with [`Error::DegenerateFactorization`].

use std::ops::ControlFlow;

use crate::error::{Error, Result};
use crate::matrix::Matrix;

/// Default convergence threshold on the squared Frobenius step.
pub const DEFAULT_EPSILON: f64 = 1e-4;

/// Default iteration budget.
pub const DEFAULT_MAX_ITER: usize = 300;

/// Default damping factor β.
pub const DEFAULT_BETA: f64 = 0.5;

/// Factorization parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FactorizeParams {
    /// Stop once the squared Frobenius distance between successive iterates is below this.
    pub epsilon: f64,

    /// Maximum number of updates.
    pub max_iter: usize,

    /// Damping factor in `(0, 1]`. `1.0` is the undamped multiplicative rule.
    pub beta: f64,
}

impl Default for FactorizeParams {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            max_iter: DEFAULT_MAX_ITER,
            beta: DEFAULT_BETA,
        }
    }
}

impl FactorizeParams {
    /// Set the convergence threshold.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the iteration budget.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the damping factor.
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    /// Reject parameters the loop cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !(self.epsilon.is_finite() && self.epsilon >= 0.0) {
            return Err(Error::InvalidParameter {
                name: "epsilon",
                message: "must be finite and non-negative",
            });
        }
        check_beta(self.beta)
    }
}

/// How a factorization run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// The last step was smaller than epsilon.
    Converged,
    /// The iteration budget ran out first.
    Exhausted,
    /// The observer broke out of the loop.
    Stopped,
}

/// Progress reported to an observer after each non-converged update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IterationState {
    /// 1-based update count.
    pub iteration: usize,
    /// Squared Frobenius distance between this update and the previous `H`.
    pub delta: f64,
}

/// Result of a factorization run.
#[derive(Clone, Debug)]
pub struct Factorization {
    /// Final factor matrix (n×k).
    pub h: Matrix,
    /// Number of updates performed.
    pub iterations: usize,
    /// Step size of the last update (`None` if no update ran).
    pub last_delta: Option<f64>,
    /// Why the loop ended.
    pub termination: Termination,
}

impl Factorization {
    /// Whether the run converged.
    pub fn converged(&self) -> bool {
        self.termination == Termination::Converged
    }
}

/// Factorize `w ≈ H·Hᵀ` starting from `h0`, returning the final `H`.
///
/// Uses `β = 0.5`. See [`run`] for the full report.
pub fn factorize(w: &Matrix, h0: &Matrix, epsilon: f64, max_iter: usize) -> Result<Matrix> {
    let params = FactorizeParams::default()
        .with_epsilon(epsilon)
        .with_max_iter(max_iter);
    run(w, h0, &params).map(|f| f.h)
}

/// Factorize with explicit parameters.
pub fn run(w: &Matrix, h0: &Matrix, params: &FactorizeParams) -> Result<Factorization> {
    run_with(w, h0, params, |_| ControlFlow::Continue(()))
}

/// Factorize, calling `observer` after every update that did not converge.
///
/// Returning [`ControlFlow::Break`] ends the run with [`Termination::Stopped`]. This is the
/// only cancellation point; each update itself runs to completion.
pub fn run_with<F>(
    w: &Matrix,
    h0: &Matrix,
    params: &FactorizeParams,
    mut observer: F,
) -> Result<Factorization>
where
    F: FnMut(IterationState) -> ControlFlow<()>,
{
    params.validate()?;
    validate_operands(w, h0)?;
    validate_initial_factor(h0)?;

    let (n, k) = h0.shape();
    tracing::debug!(
        n,
        k,
        epsilon = params.epsilon,
        max_iter = params.max_iter,
        beta = params.beta,
        "starting symnmf factorization"
    );

    let mut h = h0.clone();
    let mut last_delta = None;

    for iteration in 1..=params.max_iter {
        let next = multiplicative_update(w, &h, params.beta, iteration)?;
        let delta = next.frobenius_squared_distance(&h)?;
        tracing::trace!(iteration, delta, "symnmf update");

        h = next;
        last_delta = Some(delta);

        if delta < params.epsilon {
            tracing::debug!(iterations = iteration, delta, "symnmf converged");
            return Ok(Factorization {
                h,
                iterations: iteration,
                last_delta,
                termination: Termination::Converged,
            });
        }

        if observer(IterationState { iteration, delta }).is_break() {
            tracing::debug!(iterations = iteration, delta, "symnmf stopped by observer");
            return Ok(Factorization {
                h,
                iterations: iteration,
                last_delta,
                termination: Termination::Stopped,
            });
        }
    }

    tracing::warn!(
        max_iter = params.max_iter,
        last_delta,
        "symnmf did not converge within the iteration budget"
    );
    Ok(Factorization {
        h,
        iterations: params.max_iter,
        last_delta,
        termination: Termination::Exhausted,
    })
}

/// Apply one damped multiplicative update to `h`.
///
/// A zero denominator is reported as [`Error::DegenerateFactorization`] with `iteration: 1`.
pub fn update(w: &Matrix, h: &Matrix, beta: f64) -> Result<Matrix> {
    check_beta(beta)?;
    validate_operands(w, h)?;
    multiplicative_update(w, h, beta, 1)
}

fn multiplicative_update(w: &Matrix, h: &Matrix, beta: f64, iteration: usize) -> Result<Matrix> {
    let wh = w.matmul(h)?;
    let ht = h.transpose();
    let hht = h.matmul(&ht)?;
    let hhth = hht.matmul(h)?;

    let (n, k) = h.shape();
    let mut next = Matrix::zeros(n, k);
    for row in 0..n {
        for col in 0..k {
            let denom = hhth[(row, col)];
            if !(denom > 0.0 && denom.is_finite()) {
                return Err(Error::DegenerateFactorization { iteration, row, col });
            }
            next[(row, col)] = h[(row, col)] * ((1.0 - beta) + beta * (wh[(row, col)] / denom));
        }
    }
    Ok(next)
}

fn check_beta(beta: f64) -> Result<()> {
    if beta > 0.0 && beta <= 1.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter {
            name: "beta",
            message: "must be in (0, 1]",
        })
    }
}

fn validate_operands(w: &Matrix, h: &Matrix) -> Result<()> {
    if !w.is_square() || w.rows() != h.rows() {
        return Err(Error::DimensionMismatch {
            op: "factorize",
            lhs_rows: w.rows(),
            lhs_cols: w.cols(),
            rhs_rows: h.rows(),
            rhs_cols: h.cols(),
        });
    }
    let (n, k) = h.shape();
    if k == 0 || k > n {
        return Err(Error::InvalidClusterCount {
            requested: k,
            n_items: n,
        });
    }
    Ok(())
}

fn validate_initial_factor(h0: &Matrix) -> Result<()> {
    if h0.as_slice().iter().all(|&v| v.is_finite() && v >= 0.0) {
        Ok(())
    } else {
        Err(Error::InvalidParameter {
            name: "h0",
            message: "entries must be finite and non-negative",
        })
    }
}

//! The SymNMF estimator: the full pipeline behind one builder.
//!
//! ```text
//! points → A → D → W → H → labels
//! ```
//!
//! The initial factor `H₀` is always supplied by the caller via
//! [`SymNmf::with_initial_factor`]; this crate never picks one.

use super::assign::derive_labels;
use super::factorize::{self, Factorization, FactorizeParams};
use super::similarity::{build_affinity, build_degree, normalize};
use super::traits::Clustering;
use crate::error::{Error, Result};
use crate::matrix::Matrix;

/// Symmetric NMF clustering.
#[derive(Debug, Clone)]
pub struct SymNmf {
    /// Number of clusters (columns of H).
    k: usize,
    /// Factorization loop parameters.
    params: FactorizeParams,
    /// Caller-provided starting point for H (n×k).
    initial_factor: Option<Matrix>,
}

/// Everything produced by [`SymNmf::fit`].
#[derive(Debug, Clone)]
pub struct SymNmfFit {
    /// Normalized similarity matrix W.
    pub normalized: Matrix,
    /// Factorization report, including the final H.
    pub factorization: Factorization,
    /// One label in `[0, k)` per point.
    pub labels: Vec<usize>,
}

impl SymNmfFit {
    /// Final factor matrix.
    pub fn h(&self) -> &Matrix {
        &self.factorization.h
    }
}

impl SymNmf {
    /// Create a SymNMF clusterer with `k` clusters and default loop parameters.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            params: FactorizeParams::default(),
            initial_factor: None,
        }
    }

    /// Replace all loop parameters.
    pub fn with_params(mut self, params: FactorizeParams) -> Self {
        self.params = params;
        self
    }

    /// Set the convergence threshold.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.params.epsilon = epsilon;
        self
    }

    /// Set the iteration budget.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.params.max_iter = max_iter;
        self
    }

    /// Set the damping factor.
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.params.beta = beta;
        self
    }

    /// Set the initial factor matrix (n×k, non-negative).
    pub fn with_initial_factor(mut self, h0: Matrix) -> Self {
        self.initial_factor = Some(h0);
        self
    }

    /// Loop parameters in effect.
    pub fn params(&self) -> &FactorizeParams {
        &self.params
    }

    /// Run the whole pipeline on `data`.
    pub fn fit(&self, data: &[Vec<f64>]) -> Result<SymNmfFit> {
        // Surface malformed points before anything else.
        let a = build_affinity(data)?;
        let n = data.len();

        if self.k == 0 || self.k > n {
            return Err(Error::InvalidClusterCount {
                requested: self.k,
                n_items: n,
            });
        }

        let h0 = self
            .initial_factor
            .as_ref()
            .ok_or(Error::InvalidParameter {
                name: "initial_factor",
                message: "must be supplied with `with_initial_factor`",
            })?;
        if h0.shape() != (n, self.k) {
            return Err(Error::DimensionMismatch {
                op: "fit",
                lhs_rows: n,
                lhs_cols: self.k,
                rhs_rows: h0.rows(),
                rhs_cols: h0.cols(),
            });
        }

        let d = build_degree(&a)?;
        let w = normalize(&d, &a)?;
        let factorization = factorize::run(&w, h0, &self.params)?;
        let labels = derive_labels(&factorization.h)?;

        Ok(SymNmfFit {
            normalized: w,
            factorization,
            labels,
        })
    }
}

impl Clustering for SymNmf {
    fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<usize>> {
        self.fit(data).map(|fit| fit.labels)
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}

//! Symmetric non-negative matrix factorization (SymNMF) clustering.
//!
//! `symnmf` clusters dense vectors by building a Gaussian similarity graph, normalizing
//! it, and factorizing it as `W ≈ H·Hᵀ` with a non-negative `H`. Each stage is a plain
//! function over dense matrices:
//!
//! - [`build_affinity`]: points → similarity matrix `A`
//! - [`build_degree`]: `A` → diagonal degree matrix `D`
//! - [`normalize`]: `(D, A)` → `W = D^(-1/2) · A · D^(-1/2)`
//! - [`factorize`]: `(W, H₀)` → `H`
//! - [`derive_labels`]: `H` → one label per point
//!
//! [`SymNmf`] chains them behind a builder. The caller always supplies `H₀`.
//!
//! Enable the `parallel` feature to spread matrix products and affinity rows over rayon.

#![forbid(unsafe_code)]

pub mod cluster;
pub mod error;
pub mod io;
pub mod matrix;

pub use cluster::{
    build_affinity, build_degree, derive_labels, factorize, normalize, Clustering,
    Factorization, FactorizeParams, IterationState, SymNmf, SymNmfFit, Termination,
};
pub use error::{Error, PointSetDefect, Result};
pub use matrix::Matrix;

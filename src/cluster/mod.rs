//! Clustering by symmetric non-negative matrix factorization.
//!
//! ## The Pipeline
//!
//! SymNMF treats clustering as a low-rank factorization of a similarity graph:
//!
//! 1. **Affinity**: Gaussian similarity between every pair of points.
//! 2. **Degree**: per-point total similarity.
//! 3. **Normalization**: `W = D^(-1/2) · A · D^(-1/2)`.
//! 4. **Factorization**: find non-negative `H` (n×k) with `W ≈ H·Hᵀ`.
//! 5. **Assignment**: each point joins the column where its row of `H` peaks.
//!
//! **Objective**:
//!
//! ```text
//! min_{H ≥ 0} ‖W - H·Hᵀ‖²_F
//! ```
//!
//! **Assumptions**:
//! - Similarity decays with squared distance at a fixed bandwidth, so coordinates
//!   should be on a comparable scale
//! - You know k in advance
//! - You can supply a sensible non-negative starting `H`
//!
//! **When to use**: clusters that are well described by a similarity graph rather than
//! by centroids. Unlike k-means, the factor rows also read as soft memberships.
//!
//! ## Usage
//!
//! ```rust
//! use symnmf::cluster::{Clustering, SymNmf};
//! use symnmf::Matrix;
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.0, 1.0],
//!     vec![10.0, 10.0],
//!     vec![10.0, 11.0],
//! ];
//! let h0 = Matrix::from_rows(&[
//!     vec![0.8, 0.1],
//!     vec![0.7, 0.2],
//!     vec![0.1, 0.9],
//!     vec![0.2, 0.8],
//! ])
//! .unwrap();
//!
//! let labels = SymNmf::new(2).with_initial_factor(h0).fit_predict(&data).unwrap();
//! assert_eq!(labels[0], labels[1]); // First two together
//! assert_ne!(labels[0], labels[2]); // Separate from last two
//! ```

pub mod assign;
pub mod factorize;
pub mod similarity;
mod symnmf;
mod traits;
mod util;

pub use assign::derive_labels;
pub use factorize::{
    factorize, Factorization, FactorizeParams, IterationState, Termination, DEFAULT_BETA,
    DEFAULT_EPSILON, DEFAULT_MAX_ITER,
};
pub use similarity::{build_affinity, build_degree, normalize, validate_points};
pub use symnmf::{SymNmf, SymNmfFit};
pub use traits::Clustering;

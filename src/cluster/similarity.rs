//! Similarity graph construction.
//!
//! Three stages turn raw points into the matrix SymNMF factorizes:
//!
//! 1. **Affinity** `A`: `A[i][j] = exp(-½‖xᵢ - xⱼ‖²)` for `i ≠ j`, zero diagonal.
//!    The exponent uses the *squared* distance (no square root).
//! 2. **Degree** `D`: diagonal, `D[i][i] = Σⱼ A[i][j]`.
//! 3. **Normalized similarity** `W = D^(-1/2) · A · D^(-1/2)`.
//!
//! Because `D^(-1/2)` is diagonal, the two products reduce to scaling each entry:
//! `W[i][j] = (D[i][i]^(-1/2) · A[i][j]) · D[j][j]^(-1/2)`, which is exactly what the
//! dense products compute (every other term is an exact zero).

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::util::squared_euclidean;
use crate::error::{Error, PointSetDefect, Result};
use crate::matrix::Matrix;

/// Check that `points` is a non-empty set of equal-length, non-empty vectors.
///
/// Returns the shared dimension.
pub fn validate_points(points: &[Vec<f64>]) -> Result<usize> {
    let first = points.first().ok_or(PointSetDefect::Empty)?;
    let d = first.len();
    if d == 0 {
        return Err(PointSetDefect::ZeroDimension.into());
    }
    for (index, point) in points.iter().enumerate().skip(1) {
        if point.len() != d {
            return Err(PointSetDefect::Ragged {
                index,
                expected: d,
                found: point.len(),
            }
            .into());
        }
    }
    Ok(d)
}

/// Build the Gaussian affinity matrix `A` (n×n, symmetric, zero diagonal).
pub fn build_affinity(points: &[Vec<f64>]) -> Result<Matrix> {
    let d = validate_points(points)?;
    let n = points.len();

    let mut a = Matrix::zeros(n, n);
    let fill = |(i, row): (usize, &mut [f64])| {
        for (j, cell) in row.iter_mut().enumerate() {
            if i != j {
                *cell = (-0.5 * squared_euclidean(&points[i], &points[j])).exp();
            }
        }
    };

    #[cfg(feature = "parallel")]
    a.as_mut_slice().par_chunks_mut(n).enumerate().for_each(fill);

    #[cfg(not(feature = "parallel"))]
    a.as_mut_slice().chunks_mut(n).enumerate().for_each(fill);

    tracing::debug!(n, d, "built affinity matrix");
    Ok(a)
}

/// Build the diagonal degree matrix `D` from a square affinity matrix.
pub fn build_degree(a: &Matrix) -> Result<Matrix> {
    require_square("build_degree", a)?;
    let degrees: Vec<f64> = a.iter_rows().map(|row| row.iter().sum()).collect();
    tracing::debug!(n = a.rows(), "built degree matrix");
    Ok(Matrix::from_diagonal(&degrees))
}

/// Build `W = D^(-1/2) · A · D^(-1/2)`.
///
/// Only the diagonal of `d` is read. A degree that is not strictly positive and finite
/// (e.g. an isolated point, or a single-point set) is rejected with
/// [`Error::DegenerateInput`] instead of producing `inf`/`NaN`.
pub fn normalize(d: &Matrix, a: &Matrix) -> Result<Matrix> {
    require_square("normalize", d)?;
    require_square("normalize", a)?;
    if d.shape() != a.shape() {
        return Err(Error::DimensionMismatch {
            op: "normalize",
            lhs_rows: d.rows(),
            lhs_cols: d.cols(),
            rhs_rows: a.rows(),
            rhs_cols: a.cols(),
        });
    }

    let n = a.rows();
    let mut inv_sqrt = Vec::with_capacity(n);
    for index in 0..n {
        let degree = d[(index, index)];
        if !(degree > 0.0 && degree.is_finite()) {
            return Err(Error::DegenerateInput { index, degree });
        }
        inv_sqrt.push(1.0 / degree.sqrt());
    }

    let mut w = Matrix::zeros(n, n);
    for i in 0..n {
        let s_i = inv_sqrt[i];
        for (j, (cell, &a_ij)) in w.row_mut(i).iter_mut().zip(a.row(i)).enumerate() {
            *cell = (s_i * a_ij) * inv_sqrt[j];
        }
    }

    tracing::debug!(n, "built normalized similarity matrix");
    Ok(w)
}

fn require_square(op: &'static str, m: &Matrix) -> Result<()> {
    if m.is_square() {
        Ok(())
    } else {
        Err(Error::DimensionMismatch {
            op,
            lhs_rows: m.rows(),
            lhs_cols: m.cols(),
            rhs_rows: m.cols(),
            rhs_cols: m.rows(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::needless_range_loop)]
mod tests {
    use super::*;

    fn two_pairs() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![10.0, 10.0],
            vec![10.0, 11.0],
        ]
    }

    #[test]
    fn test_validate_points() {
        assert_eq!(validate_points(&two_pairs()).unwrap(), 2);

        let empty: Vec<Vec<f64>> = vec![];
        assert!(matches!(
            validate_points(&empty),
            Err(Error::MalformedPointSet(PointSetDefect::Empty))
        ));

        let zero_dim = vec![vec![], vec![]];
        assert!(matches!(
            validate_points(&zero_dim),
            Err(Error::MalformedPointSet(PointSetDefect::ZeroDimension))
        ));

        let ragged = vec![vec![0.0, 1.0], vec![1.0, 2.0], vec![3.0]];
        assert!(matches!(
            validate_points(&ragged),
            Err(Error::MalformedPointSet(PointSetDefect::Ragged {
                index: 2,
                expected: 2,
                found: 1,
            }))
        ));
    }

    #[test]
    fn test_affinity_values() {
        let a = build_affinity(&two_pairs()).unwrap();
        assert_eq!(a.shape(), (4, 4));

        assert_eq!(a[(0, 1)], (-0.5f64).exp());
        // Squared distance 200 enters the exponent unrooted.
        assert_eq!(a[(0, 2)], (-100.0f64).exp());
        assert_eq!(a[(1, 2)], (-0.5f64 * 181.0).exp());

        for i in 0..4 {
            assert_eq!(a[(i, i)], 0.0);
            for j in 0..4 {
                assert_eq!(a[(i, j)], a[(j, i)]);
            }
        }
    }

    #[test]
    fn test_affinity_rejects_malformed() {
        let ragged = vec![vec![0.0, 1.0], vec![1.0]];
        assert!(build_affinity(&ragged).is_err());
    }

    #[test]
    fn test_affinity_single_point() {
        let a = build_affinity(&[vec![3.0, 4.0]]).unwrap();
        assert_eq!(a.to_rows(), vec![vec![0.0]]);
    }

    #[test]
    fn test_degree_is_diagonal_row_sum() {
        let a = build_affinity(&two_pairs()).unwrap();
        let d = build_degree(&a).unwrap();
        for i in 0..4 {
            let expected: f64 = a.row(i).iter().sum();
            assert_eq!(d[(i, i)], expected);
            for j in 0..4 {
                if i != j {
                    assert_eq!(d[(i, j)], 0.0);
                }
            }
        }
    }

    #[test]
    fn test_degree_requires_square() {
        assert!(matches!(
            build_degree(&Matrix::zeros(2, 3)),
            Err(Error::DimensionMismatch { op: "build_degree", .. })
        ));
    }

    #[test]
    fn test_normalize_matches_dense_products() {
        let a = build_affinity(&two_pairs()).unwrap();
        let d = build_degree(&a).unwrap();
        let w = normalize(&d, &a).unwrap();

        let inv: Vec<f64> = (0..4).map(|i| 1.0 / d[(i, i)].sqrt()).collect();
        let e = Matrix::from_diagonal(&inv);
        let dense = e.matmul(&a).unwrap().matmul(&e).unwrap();
        assert_eq!(w, dense);
        assert!(w.is_symmetric(1e-12));
    }

    #[test]
    fn test_normalize_zero_degree() {
        // Point 2 is isolated.
        let a = Matrix::from_rows(&[
            vec![0.0, 1.0, 0.0],
            vec![1.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0],
        ])
        .unwrap();
        let d = build_degree(&a).unwrap();
        let err = normalize(&d, &a).unwrap_err();
        assert!(matches!(err, Error::DegenerateInput { index: 2, degree } if degree == 0.0));
    }

    #[test]
    fn test_normalize_single_point_is_degenerate() {
        let a = build_affinity(&[vec![1.0]]).unwrap();
        let d = build_degree(&a).unwrap();
        assert!(matches!(
            normalize(&d, &a),
            Err(Error::DegenerateInput { index: 0, .. })
        ));
    }

    #[test]
    fn test_normalize_shape_mismatch() {
        let a = Matrix::zeros(3, 3);
        let d = Matrix::from_diagonal(&[1.0, 1.0]);
        assert!(matches!(
            normalize(&d, &a),
            Err(Error::DimensionMismatch { op: "normalize", .. })
        ));
    }
}

//! Dense row-major matrices.
//!
//! Every matrix in the pipeline is a [`Matrix`]: an owned, zero-initialized grid of `f64`
//! with explicit row and column counts. Operations never alias their inputs; each one
//! allocates and returns a fresh matrix.
//!
//! With the `parallel` feature, [`Matrix::matmul`] splits output rows across rayon
//! workers. Every output cell is still accumulated by one sequential loop in ascending
//! inner-index order, so results do not depend on the feature.

use std::ops::{Index, IndexMut};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{Error, Result};

/// Owned dense matrix of `f64` in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// A `rows x cols` matrix of zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Wrap a row-major buffer.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::DimensionMismatch {
                op: "from_vec",
                lhs_rows: rows,
                lhs_cols: cols,
                rhs_rows: 1,
                rhs_cols: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Build a matrix from nested rows. Every row must have the first row's length.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(Error::DimensionMismatch {
                    op: "from_rows",
                    lhs_rows: 1,
                    lhs_cols: cols,
                    rhs_rows: 1,
                    rhs_cols: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Square matrix with `diag` on the diagonal and exact zeros elsewhere.
    pub fn from_diagonal(diag: &[f64]) -> Self {
        let n = diag.len();
        let mut out = Self::zeros(n, n);
        for (i, &v) in diag.iter().enumerate() {
            out.data[i * n + i] = v;
        }
        out
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Whether the matrix has as many rows as columns.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// The underlying row-major buffer.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// The underlying row-major buffer, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Row `i` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.rows()`.
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Row `i` as a mutable slice.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.rows()`.
    #[inline]
    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        &mut self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Iterate over rows.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.rows).map(move |i| self.row(i))
    }

    /// Entry `(i, j)`, or `None` when out of bounds.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i < self.rows && j < self.cols {
            Some(self.data[i * self.cols + j])
        } else {
            None
        }
    }

    /// Copy into nested rows.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.iter_rows().map(<[f64]>::to_vec).collect()
    }

    /// A new matrix with rows and columns swapped.
    pub fn transpose(&self) -> Matrix {
        let mut out = Matrix::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                out.data[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }
        out
    }

    /// Matrix product `self · rhs`.
    ///
    /// Requires `self.cols() == rhs.rows()`.
    pub fn matmul(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.rows {
            return Err(Error::DimensionMismatch {
                op: "matmul",
                lhs_rows: self.rows,
                lhs_cols: self.cols,
                rhs_rows: rhs.rows,
                rhs_cols: rhs.cols,
            });
        }

        let mut out = Matrix::zeros(self.rows, rhs.cols);
        if out.data.is_empty() {
            return Ok(out);
        }

        // i-k-j order: each cell still sums its products in ascending k.
        let fill = |(i, out_row): (usize, &mut [f64])| {
            for (k, &a) in self.row(i).iter().enumerate() {
                for (cell, &b) in out_row.iter_mut().zip(rhs.row(k)) {
                    *cell += a * b;
                }
            }
        };

        #[cfg(feature = "parallel")]
        out.data.par_chunks_mut(rhs.cols).enumerate().for_each(fill);

        #[cfg(not(feature = "parallel"))]
        out.data.chunks_mut(rhs.cols).enumerate().for_each(fill);

        Ok(out)
    }

    /// Sum of squared elementwise differences (squared Frobenius norm of `self - other`).
    ///
    /// Not normalized by the number of entries.
    pub fn frobenius_squared_distance(&self, other: &Matrix) -> Result<f64> {
        if self.shape() != other.shape() {
            return Err(Error::DimensionMismatch {
                op: "frobenius_squared_distance",
                lhs_rows: self.rows,
                lhs_cols: self.cols,
                rhs_rows: other.rows,
                rhs_cols: other.cols,
            });
        }
        Ok(self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| {
                let d = a - b;
                d * d
            })
            .sum())
    }

    /// Whether `|m[i][j] - m[j][i]| <= tol` for every pair. Non-square matrices are not symmetric.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        if !self.is_square() {
            return false;
        }
        let n = self.rows;
        (0..n).all(|i| (i + 1..n).all(|j| (self[(i, j)] - self[(j, i)]).abs() <= tol))
    }

    /// Average of all entries (0.0 for an empty matrix).
    pub fn mean(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.data.iter().sum::<f64>() / self.data.len() as f64
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        assert!(j < self.cols, "column {j} out of bounds for {} columns", self.cols);
        &self.data[i * self.cols + j]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        assert!(j < self.cols, "column {j} out of bounds for {} columns", self.cols);
        &mut self.data[i * self.cols + j]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(rows: &[&[f64]]) -> Matrix {
        Matrix::from_rows(rows).unwrap()
    }

    #[test]
    fn test_zeros_fully_initialized() {
        let z = Matrix::zeros(3, 2);
        assert_eq!(z.shape(), (3, 2));
        assert!(z.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_from_rows_ragged() {
        let rows = vec![vec![1.0, 2.0], vec![3.0]];
        let err = Matrix::from_rows(&rows).unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch {
                op: "from_rows",
                lhs_cols: 2,
                rhs_cols: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_from_vec_wrong_len() {
        assert!(Matrix::from_vec(2, 2, vec![1.0; 3]).is_err());
        let ok = Matrix::from_vec(1, 3, vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(ok.row(0), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_from_diagonal() {
        let d = Matrix::from_diagonal(&[1.0, 2.0, 3.0]);
        assert_eq!(d[(1, 1)], 2.0);
        assert_eq!(d[(0, 2)], 0.0);
        assert_eq!(d[(2, 0)], 0.0);
    }

    #[test]
    fn test_transpose() {
        let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        let t = a.transpose();
        assert_eq!(t.shape(), (3, 2));
        assert_eq!(t.to_rows(), vec![vec![1.0, 4.0], vec![2.0, 5.0], vec![3.0, 6.0]]);
        assert_eq!(t.transpose(), a);
    }

    #[test]
    fn test_matmul() {
        let a = m(&[&[1.0, 2.0], &[3.0, 4.0], &[5.0, 6.0]]);
        let b = m(&[&[7.0, 8.0, 9.0], &[10.0, 11.0, 12.0]]);
        let c = a.matmul(&b).unwrap();
        assert_eq!(c.shape(), (3, 3));
        assert_eq!(c.row(0), &[27.0, 30.0, 33.0]);
        assert_eq!(c.row(1), &[61.0, 68.0, 75.0]);
        assert_eq!(c.row(2), &[95.0, 106.0, 117.0]);
    }

    #[test]
    fn test_matmul_dimension_mismatch() {
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(2, 3);
        let err = a.matmul(&b).unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch {
                op: "matmul",
                lhs_rows: 2,
                lhs_cols: 3,
                rhs_rows: 2,
                rhs_cols: 3,
            }
        ));
    }

    #[test]
    fn test_matmul_matches_naive_loop() {
        let a = m(&[&[0.1, 0.7, 0.3], &[0.9, 0.2, 0.4]]);
        let b = m(&[&[0.5, 0.6], &[0.25, 0.125], &[0.3, 0.01]]);
        let c = a.matmul(&b).unwrap();
        for i in 0..2 {
            for j in 0..2 {
                let mut acc = 0.0;
                for k in 0..3 {
                    acc += a[(i, k)] * b[(k, j)];
                }
                assert_eq!(c[(i, j)].to_bits(), acc.to_bits());
            }
        }
    }

    #[test]
    fn test_frobenius_squared_distance() {
        let a = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let b = m(&[&[1.0, 0.0], &[0.0, 4.0]]);
        // Squared, not rooted or averaged.
        assert_eq!(a.frobenius_squared_distance(&b).unwrap(), 13.0);
        assert_eq!(a.frobenius_squared_distance(&a).unwrap(), 0.0);
        assert!(a.frobenius_squared_distance(&Matrix::zeros(2, 3)).is_err());
    }

    #[test]
    fn test_is_symmetric() {
        let s = m(&[&[0.0, 0.5], &[0.5, 0.0]]);
        assert!(s.is_symmetric(0.0));
        let ns = m(&[&[0.0, 0.5], &[0.4, 0.0]]);
        assert!(!ns.is_symmetric(0.05));
        assert!(ns.is_symmetric(0.1));
        assert!(!Matrix::zeros(2, 3).is_symmetric(1.0));
    }

    #[test]
    fn test_get_and_mean() {
        let a = m(&[&[1.0, 2.0], &[3.0, 6.0]]);
        assert_eq!(a.get(1, 1), Some(6.0));
        assert_eq!(a.get(2, 0), None);
        assert_eq!(a.get(0, 2), None);
        assert_eq!(a.mean(), 3.0);
        assert_eq!(Matrix::zeros(0, 0).mean(), 0.0);
    }
}

use crate::error::{Error, Result};
use crate::matrix::Matrix;

/// Hard labels from a factor matrix: the column of each row's largest entry.
///
/// Ties go to the lowest column index (a later column must be strictly greater to win).
/// `NaN` entries never win.
pub fn derive_labels(h: &Matrix) -> Result<Vec<usize>> {
    if h.cols() == 0 {
        return Err(Error::InvalidClusterCount {
            requested: 0,
            n_items: h.rows(),
        });
    }
    Ok(h.iter_rows().map(argmax_first).collect())
}

fn argmax_first(row: &[f64]) -> usize {
    let mut best = 0;
    for (j, &v) in row.iter().enumerate().skip(1) {
        if v > row[best] {
            best = j;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_column_wins_ties() {
        let h = Matrix::from_rows(&[vec![0.5, 0.5], vec![0.3, 0.7]]).unwrap();
        assert_eq!(derive_labels(&h).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_three_way_tie_and_later_max() {
        let h = Matrix::from_rows(&[vec![0.2, 0.2, 0.2], vec![0.1, 0.4, 0.4], vec![0.0, 0.1, 0.9]])
            .unwrap();
        assert_eq!(derive_labels(&h).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_nan_never_wins() {
        let h = Matrix::from_rows(&[vec![0.1, f64::NAN, 0.05]]).unwrap();
        assert_eq!(derive_labels(&h).unwrap(), vec![0]);
    }

    #[test]
    fn test_zero_columns_rejected() {
        assert!(derive_labels(&Matrix::zeros(3, 0)).is_err());
    }
}

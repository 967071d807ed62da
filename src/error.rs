use thiserror::Error;

/// Errors returned by the SymNMF pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Operands of a matrix operation have incompatible shapes.
    #[error(
        "dimension mismatch in {op}: {lhs_rows}x{lhs_cols} is incompatible with {rhs_rows}x{rhs_cols}"
    )]
    DimensionMismatch {
        /// Operation that rejected its operands.
        op: &'static str,
        /// Rows of the left operand.
        lhs_rows: usize,
        /// Columns of the left operand.
        lhs_cols: usize,
        /// Rows of the right operand.
        rhs_rows: usize,
        /// Columns of the right operand.
        rhs_cols: usize,
    },

    /// A degree entry cannot be inverted under a square root.
    #[error("degenerate input: degree of point {index} is {degree}, expected a positive value")]
    DegenerateInput {
        /// Index of the offending point.
        index: usize,
        /// The degree found on the diagonal.
        degree: f64,
    },

    /// The multiplicative update hit a zero (or non-finite) denominator.
    #[error("degenerate factorization at iteration {iteration}: HHᵀH[{row}][{col}] is not positive")]
    DegenerateFactorization {
        /// 1-based iteration in which the update failed.
        iteration: usize,
        /// Row of the offending cell.
        row: usize,
        /// Column of the offending cell.
        col: usize,
    },

    /// Point set rejected before any computation started.
    #[error("malformed point set: {0}")]
    MalformedPointSet(#[from] PointSetDefect),

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Requested cluster count is incompatible with the dataset.
    #[error("invalid cluster count: requested {requested}, but dataset has {n_items} items")]
    InvalidClusterCount {
        /// Requested number of clusters.
        requested: usize,
        /// Number of items in the dataset.
        n_items: usize,
    },

    /// Reading a point file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A point file is not valid comma-separated text.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// A coordinate in a point file is not a number.
    #[error(transparent)]
    ParseFloat(#[from] std::num::ParseFloatError),
}

/// Why a point set was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PointSetDefect {
    /// No points at all.
    #[error("no points")]
    Empty,

    /// Points have no coordinates.
    #[error("points have zero dimension")]
    ZeroDimension,

    /// A point's dimension differs from the first point's.
    #[error("point {index} has dimension {found}, expected {expected}")]
    Ragged {
        /// Index of the offending point.
        index: usize,
        /// Dimension of the first point.
        expected: usize,
        /// Dimension of the offending point.
        found: usize,
    },
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;

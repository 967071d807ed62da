//! Plain-text ingestion and output.
//!
//! Point files are header-less comma-separated rows of numbers, one point per line.
//! Matrices are written the same way, with four decimals per value.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use crate::cluster::similarity::validate_points;
use crate::error::Result;
use crate::matrix::Matrix;

/// Parse a point set from comma-separated text.
///
/// Rows of unequal length are reported as [`crate::Error::MalformedPointSet`].
pub fn read_points<R: Read>(reader: R) -> Result<Vec<Vec<f64>>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut points = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let point = record
            .iter()
            .map(str::parse::<f64>)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        points.push(point);
    }

    validate_points(&points)?;
    tracing::debug!(n = points.len(), "read point set");
    Ok(points)
}

/// Parse a point set from a file.
pub fn read_points_path(path: impl AsRef<Path>) -> Result<Vec<Vec<f64>>> {
    let file = File::open(path)?;
    read_points(file)
}

/// Write `m` one row per line, values comma-separated with four decimals.
pub fn write_matrix<W: Write>(mut out: W, m: &Matrix) -> io::Result<()> {
    for row in m.iter_rows() {
        let line = row
            .iter()
            .map(|v| format!("{v:.4}"))
            .collect::<Vec<_>>()
            .join(",");
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// [`write_matrix`] into a `String`.
pub fn format_matrix(m: &Matrix) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_matrix(&mut buf, m);
    String::from_utf8_lossy(&buf).into_owned()
}

use std::ops::Range;

use fixgrid_types::{AlignedTable, ReconcileError};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Symmetric Pearson correlation matrix over a set of columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    /// Column names, in table order.
    pub names: Vec<String>,
    /// `values[i][j]` correlates `names[i]` with `names[j]`; NaN where a
    /// column has no variance.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Correlation between two named columns.
    #[must_use]
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.names.iter().position(|n| n == a)?;
        let j = self.names.iter().position(|n| n == b)?;
        Some(self.values[i][j])
    }
}

/// Correlation matrix for one calendar year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyCorrelation {
    /// Calendar year.
    pub year: i32,
    /// Number of rows that fell in the year.
    pub rows: usize,
    /// Correlations over those rows.
    pub matrix: CorrelationMatrix,
}

/// Pearson correlation between every pair of columns over `rows`.
///
/// # Errors
/// Returns `InvalidArg` if `rows` is empty or out of bounds.
pub fn correlation_matrix(
    table: &AlignedTable,
    rows: Range<usize>,
) -> Result<CorrelationMatrix, ReconcileError> {
    if rows.start >= rows.end || rows.end > table.len() {
        return Err(ReconcileError::InvalidArg(format!(
            "row range {rows:?} outside table of {} rows",
            table.len()
        )));
    }
    let cols: Vec<&[f64]> = table.columns().iter().map(|c| &c[rows.clone()]).collect();
    let sd: Vec<f64> = cols.iter().map(|c| c.iter().std_dev()).collect();

    let n = cols.len();
    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        for j in i..n {
            let r = pearson(cols[i], cols[j], sd[i], sd[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }
    Ok(CorrelationMatrix {
        names: table.names().to_vec(),
        values,
    })
}

/// One correlation matrix per calendar year present in the table, in year order.
///
/// # Errors
/// Propagates errors from [`correlation_matrix`].
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "fixgrid_core::yearly_correlations",
        skip(table),
        fields(rows = table.len()),
    )
)]
pub fn yearly_correlations(table: &AlignedTable) -> Result<Vec<YearlyCorrelation>, ReconcileError> {
    table
        .year_slices()
        .into_iter()
        .map(|(year, rows)| {
            Ok(YearlyCorrelation {
                year,
                rows: rows.len(),
                matrix: correlation_matrix(table, rows)?,
            })
        })
        .collect()
}

fn pearson(a: &[f64], b: &[f64], sd_a: f64, sd_b: f64) -> f64 {
    if sd_a == 0.0 || sd_b == 0.0 || !sd_a.is_finite() || !sd_b.is_finite() {
        return f64::NAN;
    }
    let r = a.iter().covariance(b.iter()) / (sd_a * sd_b);
    r.clamp(-1.0, 1.0)
}

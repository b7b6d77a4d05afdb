use fixgrid_types::{AlignedTable, ReconcileError};
use statrs::statistics::Statistics;

/// Basket-share weights: each column is rescaled so its mean matches the mean
/// of `reference_series`, then every row is divided by its sum.
///
/// Every output row sums to 1.0 and every value lies in `(0, 1)`.
///
/// # Errors
/// - `NotFound` if `reference_series` is not a column.
/// - `Data` if any value is not finite.
/// - `DegenerateSeries` if a column mean or a scaled row sum is zero.
/// - `Data` if a column with a nonzero mean holds a value that is not positive.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "fixgrid_core::basket_weights",
        skip(table),
        fields(rows = table.len(), columns = table.names().len()),
    )
)]
pub fn basket_weights(
    table: &AlignedTable,
    reference_series: &str,
) -> Result<AlignedTable, ReconcileError> {
    let anchor = table
        .column(reference_series)
        .ok_or_else(|| ReconcileError::not_found(format!("column {reference_series}")))?;

    let anchor_mean = anchor.iter().mean();
    let mut scaled = Vec::with_capacity(table.columns().len());
    for (name, col) in table.names().iter().zip(table.columns()) {
        if let Some(bad) = col.iter().find(|v| !v.is_finite()) {
            return Err(ReconcileError::Data(format!(
                "basket weights need finite values; {name} has {bad}"
            )));
        }
        let mean = col.iter().mean();
        if mean == 0.0 {
            return Err(ReconcileError::degenerate(name.clone()));
        }
        if let Some(bad) = col.iter().find(|v| **v <= 0.0) {
            return Err(ReconcileError::Data(format!(
                "basket weights need positive values; {name} has {bad}"
            )));
        }
        let scale = anchor_mean / mean;
        scaled.push(col.iter().map(|v| v * scale).collect::<Vec<f64>>());
    }

    for row in 0..table.len() {
        let sum: f64 = scaled.iter().map(|c| c[row]).sum();
        if sum == 0.0 || !sum.is_finite() {
            let label = table
                .date_at(row)
                .map_or_else(|| format!("row {row}"), |d| format!("row {d}"));
            return Err(ReconcileError::degenerate(label));
        }
        for col in &mut scaled {
            col[row] /= sum;
        }
    }
    table.with_columns(scaled)
}

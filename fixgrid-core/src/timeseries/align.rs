use std::collections::HashSet;

use fixgrid_types::{AlignedTable, DenseSeries, ReconcileError};

/// Join dense series on their shared daily axis and append a constant
/// reference column named `reference` (value 1.0).
///
/// Columns keep input order; the reference is last.
///
/// # Errors
/// - `InvalidArg` if `series` is empty, names repeat, or a series is named
///   like the reference.
/// - `RangeMismatch` if any series differs from the first in start or length.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "fixgrid_core::align",
        skip(series),
        fields(columns = series.len()),
    )
)]
pub fn align(series: Vec<DenseSeries>, reference: &str) -> Result<AlignedTable, ReconcileError> {
    let Some(first) = series.first() else {
        return Err(ReconcileError::InvalidArg("nothing to align".into()));
    };
    let (start, len) = (first.start(), first.len());

    let mut seen = HashSet::new();
    for s in &series {
        if s.name() == reference {
            return Err(ReconcileError::InvalidArg(format!(
                "series {} collides with the reference column",
                s.name()
            )));
        }
        if !seen.insert(s.name()) {
            return Err(ReconcileError::InvalidArg(format!(
                "duplicate series name: {}",
                s.name()
            )));
        }
        if s.start() != start || s.len() != len {
            return Err(ReconcileError::RangeMismatch {
                series: s.name().to_string(),
                expected_start: start,
                expected_len: len,
                found_start: s.start(),
                found_len: s.len(),
            });
        }
    }

    let mut names = Vec::with_capacity(series.len() + 1);
    let mut columns = Vec::with_capacity(series.len() + 1);
    for s in series {
        let (name, _, values, _) = s.into_parts();
        names.push(name);
        columns.push(values);
    }
    names.push(reference.to_string());
    columns.push(vec![1.0; len]);
    AlignedTable::from_columns(start, names, columns)
}

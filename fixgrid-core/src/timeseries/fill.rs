use chrono::NaiveDate;
use fixgrid_types::{
    CountryCode, DateRange, DenseSeries, InflationIndex, Provenance, ReconcileError,
    ReconcileWarning, SparseSeries,
};

use super::inflation::normalize_tracked;

/// Rule for filling days without a fresh record.
#[derive(Debug, Clone, Copy)]
pub enum CarryPolicy<'a> {
    /// Repeat the last emitted value verbatim.
    LastKnown,
    /// Repeat the last emitted value scaled by the ratio of the two countries'
    /// daily inflation multipliers, and restate fresh values by their
    /// cumulative multipliers.
    InflationAdjusted {
        /// Country of the quoted (foreign) currency.
        from: &'a CountryCode,
        /// Country of the quoting (home) currency.
        to: &'a CountryCode,
        /// Annual figures driving both multipliers.
        cpi: &'a InflationIndex,
    },
}

/// Result of [`fill_tracked`].
#[derive(Debug, Clone, PartialEq)]
pub struct FillOutcome {
    /// The dense series.
    pub series: DenseSeries,
    /// Date of the pre-range record used for the first day, if the first day
    /// had no record of its own.
    pub seeded_from: Option<NaiveDate>,
    /// Non-fatal conditions met while filling.
    pub warnings: Vec<ReconcileWarning>,
}

/// Fill `sparse` into a gap-free daily series over `range`.
///
/// # Errors
/// Returns `InsufficientHistory` if the first day has no record and nothing
/// precedes it.
pub fn fill(
    sparse: &SparseSeries,
    range: DateRange,
    carry: CarryPolicy<'_>,
) -> Result<DenseSeries, ReconcileError> {
    fill_tracked(sparse, range, carry).map(|o| o.series)
}

/// Same as [`fill`] but also reports seeding and missing inflation figures.
///
/// Behavior:
/// - A date with a record emits that value and is marked `Observed`.
/// - A date without one repeats the previous emitted value (`Carried`).
/// - If the first day has no record, the latest record strictly before
///   `range.start()` seeds the carry.
///
/// # Errors
/// Returns `InsufficientHistory` if the first day has no record and nothing
/// precedes it.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "fixgrid_core::fill",
        skip(sparse, carry),
        fields(series = %sparse.name(), start = %range.start(), days = range.days()),
    )
)]
pub fn fill_tracked(
    sparse: &SparseSeries,
    range: DateRange,
    carry: CarryPolicy<'_>,
) -> Result<FillOutcome, ReconcileError> {
    let missing = || ReconcileError::insufficient_history(sparse.name(), range.start());
    let mut warnings = Vec::new();
    let mut seeded_from = None;
    let mut prev = None;

    if sparse.get(range.start()).is_none() {
        let seed = sparse.last_before(range.start()).ok_or_else(missing)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(series = %sparse.name(), seed = %seed.date, "seeding first day from earlier history");
        prev = Some(seed.value);
        seeded_from = Some(seed.date);
        warnings.push(ReconcileWarning::SeededFromHistory {
            series: sparse.name().to_string(),
            date: seed.date,
        });
    }

    let days = range.days();
    let mut values = Vec::with_capacity(days);
    let mut provenance = Vec::with_capacity(days);
    for date in range.iter() {
        if let Some(v) = sparse.get(date) {
            values.push(v);
            provenance.push(Provenance::Observed);
            prev = Some(v);
        } else {
            values.push(prev.ok_or_else(missing)?);
            provenance.push(Provenance::Carried);
        }
    }
    let dense = DenseSeries::new(sparse.name(), range.start(), values, provenance)?;

    let series = match carry {
        CarryPolicy::LastKnown => dense,
        CarryPolicy::InflationAdjusted { from, to, cpi } => {
            let normalized = normalize_tracked(&dense, from, to, cpi);
            warnings.extend(normalized.warnings);
            normalized.series
        }
    };
    Ok(FillOutcome {
        series,
        seeded_from,
        warnings,
    })
}

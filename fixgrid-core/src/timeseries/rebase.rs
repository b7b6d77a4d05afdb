use fixgrid_types::{DenseSeries, RebaseEvent, ReconcileError, SparseSeries};

/// Apply every event naming `series`: values dated strictly before the cutoff
/// are multiplied by the event factor.
///
/// Events apply in order and compose multiplicatively. The transform is not
/// idempotent; apply it once to the freshly filled series.
#[must_use]
pub fn rebase(mut series: DenseSeries, events: &[RebaseEvent]) -> DenseSeries {
    let name = series.name().to_string();
    let start = series.start();
    let len = series.len();
    for e in events.iter().filter(|e| e.series == name) {
        let before = e.cutoff.signed_duration_since(start).num_days();
        let cut = usize::try_from(before.max(0)).map_or(len, |n| n.min(len));
        for v in &mut series.values_mut()[..cut] {
            *v *= e.factor;
        }
    }
    series
}

/// Record-level form of [`rebase`]: rescale records dated strictly before
/// each cutoff, before any gap filling.
///
/// Filling the result gives the same series as filling first and calling
/// [`rebase`], except for carried runs that cross a cutoff: here the carried
/// days after the cutoff are already in the new unit.
///
/// # Errors
/// Returns `Data` if a rescaled value overflows to infinity.
pub fn rebase_records(
    sparse: &SparseSeries,
    events: &[RebaseEvent],
) -> Result<SparseSeries, ReconcileError> {
    let mine: Vec<&RebaseEvent> = events.iter().filter(|e| e.series == sparse.name()).collect();
    if mine.is_empty() {
        return Ok(sparse.clone());
    }
    SparseSeries::from_pairs(
        sparse.name(),
        sparse.iter().map(|r| {
            let factor: f64 = mine
                .iter()
                .filter(|e| r.date < e.cutoff)
                .map(|e| e.factor)
                .product();
            (r.date, r.value * factor)
        }),
    )
}

/// Number of events that [`rebase`] would apply to a series named `name`.
#[must_use]
pub fn applicable_events(name: &str, events: &[RebaseEvent]) -> usize {
    events.iter().filter(|e| e.series == name).count()
}

//! Series containers: sparse source mappings, dense daily grids and date ranges.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ReconcileError;
use crate::reports::CarrySpan;

/// A single dated observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatedValue {
    /// Calendar date of the observation.
    pub date: NaiveDate,
    /// Observed value; finite.
    pub value: f64,
}

impl DatedValue {
    /// Create a dated value.
    #[must_use]
    pub const fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Half-open calendar range `[start, end)` with at least one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange", into = "RawDateRange")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Serialize, Deserialize)]
struct RawDateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = ReconcileError;

    fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl From<DateRange> for RawDateRange {
    fn from(r: DateRange) -> Self {
        Self {
            start: r.start,
            end: r.end,
        }
    }
}

impl DateRange {
    /// Build a range covering `[start, end)`.
    ///
    /// # Errors
    /// Returns `InvalidArg` if `end` is not strictly after `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ReconcileError> {
        if end <= start {
            return Err(ReconcileError::InvalidArg(format!(
                "empty date range: {start}..{end}"
            )));
        }
        Ok(Self { start, end })
    }

    // Callers guarantee `end > start`.
    pub(crate) const fn new_unchecked(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// First day of the range (inclusive).
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Day after the last day of the range (exclusive).
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days in the range.
    #[must_use]
    pub fn days(&self) -> usize {
        let n = self.end.signed_duration_since(self.start).num_days();
        usize::try_from(n).unwrap_or(0)
    }

    /// True if `date` falls inside `[start, end)`.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    /// Iterate every calendar day of the range in increasing order.
    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        self.start.iter_days().take(self.days())
    }
}

/// Sparse, irregularly-dated source mapping (date → value).
///
/// Keys are unique. Bulk construction keeps the last record for a repeated
/// date, matching plain mapping semantics.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SparseSeries {
    name: String,
    values: BTreeMap<NaiveDate, f64>,
}

impl SparseSeries {
    /// Create an empty series.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: BTreeMap::new(),
        }
    }

    /// Build a series from `(date, value)` pairs.
    ///
    /// # Errors
    /// Returns `Data` if any value is not finite.
    pub fn from_pairs<I>(name: impl Into<String>, pairs: I) -> Result<Self, ReconcileError>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let mut s = Self::new(name);
        for (date, value) in pairs {
            s.insert(date, value)?;
        }
        Ok(s)
    }

    /// Build a series from dated records.
    ///
    /// # Errors
    /// Returns `Data` if any value is not finite.
    pub fn from_records<I>(name: impl Into<String>, records: I) -> Result<Self, ReconcileError>
    where
        I: IntoIterator<Item = DatedValue>,
    {
        Self::from_pairs(name, records.into_iter().map(|r| (r.date, r.value)))
    }

    /// Insert or overwrite the value for `date`.
    ///
    /// # Errors
    /// Returns `Data` if `value` is NaN or infinite.
    pub fn insert(&mut self, date: NaiveDate, value: f64) -> Result<(), ReconcileError> {
        if !value.is_finite() {
            return Err(ReconcileError::Data(format!(
                "non-finite value {value} for {} at {date}",
                self.name
            )));
        }
        self.values.insert(date, value);
        Ok(())
    }

    /// Series name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value recorded for `date`, if any.
    #[must_use]
    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.values.get(&date).copied()
    }

    /// Most recent record strictly before `date`.
    #[must_use]
    pub fn last_before(&self, date: NaiveDate) -> Option<DatedValue> {
        self.values
            .range(..date)
            .next_back()
            .map(|(d, v)| DatedValue::new(*d, *v))
    }

    /// Earliest recorded date.
    #[must_use]
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.values.keys().next().copied()
    }

    /// Latest recorded date.
    #[must_use]
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.values.keys().next_back().copied()
    }

    /// Number of recorded dates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if no dates are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate records in date order.
    pub fn iter(&self) -> impl Iterator<Item = DatedValue> + '_ {
        self.values.iter().map(|(d, v)| DatedValue::new(*d, *v))
    }
}

/// Where a dense value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provenance {
    /// A fresh record existed for that date.
    Observed,
    /// The value was produced by a carry-forward rule.
    Carried,
}

/// Gap-free daily series over `[start, start + len)`.
///
/// Dates are implied by `start` and the position, so consecutive points are
/// always exactly one day apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDenseSeries", into = "RawDenseSeries")]
pub struct DenseSeries {
    name: String,
    start: NaiveDate,
    values: Vec<f64>,
    provenance: Vec<Provenance>,
}

#[derive(Serialize, Deserialize)]
struct RawDenseSeries {
    name: String,
    start: NaiveDate,
    values: Vec<f64>,
    provenance: Vec<Provenance>,
}

impl TryFrom<RawDenseSeries> for DenseSeries {
    type Error = ReconcileError;

    fn try_from(raw: RawDenseSeries) -> Result<Self, Self::Error> {
        Self::new(raw.name, raw.start, raw.values, raw.provenance)
    }
}

impl From<DenseSeries> for RawDenseSeries {
    fn from(s: DenseSeries) -> Self {
        let (name, start, values, provenance) = s.into_parts();
        Self {
            name,
            start,
            values,
            provenance,
        }
    }
}

impl DenseSeries {
    /// Assemble a dense series from parallel value/provenance vectors.
    ///
    /// # Errors
    /// - `InvalidArg` if the vectors are empty or differ in length.
    /// - `InvalidArg` if the implied end date is not representable.
    pub fn new(
        name: impl Into<String>,
        start: NaiveDate,
        values: Vec<f64>,
        provenance: Vec<Provenance>,
    ) -> Result<Self, ReconcileError> {
        let name = name.into();
        if values.is_empty() {
            return Err(ReconcileError::InvalidArg(format!(
                "dense series {name} has no values"
            )));
        }
        if values.len() != provenance.len() {
            return Err(ReconcileError::InvalidArg(format!(
                "dense series {name}: {} values but {} provenance marks",
                values.len(),
                provenance.len()
            )));
        }
        let len = u64::try_from(values.len()).unwrap_or(u64::MAX);
        if start.checked_add_days(Days::new(len)).is_none() {
            return Err(ReconcileError::InvalidArg(format!(
                "dense series {name} runs past the calendar"
            )));
        }
        Ok(Self {
            name,
            start,
            values,
            provenance,
        })
    }

    /// Dense series where every value counts as observed.
    ///
    /// # Errors
    /// Same as [`DenseSeries::new`].
    pub fn observed(
        name: impl Into<String>,
        start: NaiveDate,
        values: Vec<f64>,
    ) -> Result<Self, ReconcileError> {
        let provenance = vec![Provenance::Observed; values.len()];
        Self::new(name, start, values, provenance)
    }

    /// Series name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// First covered date.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Day after the last covered date.
    #[must_use]
    pub fn end(&self) -> NaiveDate {
        self.date_unchecked(self.values.len())
    }

    /// The covered range.
    #[must_use]
    pub fn range(&self) -> DateRange {
        DateRange {
            start: self.start,
            end: self.end(),
        }
    }

    /// Number of days covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false for a constructed series; present for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values in date order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Mutable access to values; dates and provenance are unaffected.
    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// Provenance marks in date order.
    #[must_use]
    pub fn provenance(&self) -> &[Provenance] {
        &self.provenance
    }

    /// Date at position `index`.
    #[must_use]
    pub fn date_at(&self, index: usize) -> Option<NaiveDate> {
        (index < self.values.len()).then(|| self.date_unchecked(index))
    }

    /// Position of `date` within the series.
    #[must_use]
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        let offset = date.signed_duration_since(self.start).num_days();
        usize::try_from(offset)
            .ok()
            .filter(|&i| i < self.values.len())
    }

    /// Value recorded for `date`.
    #[must_use]
    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.index_of(date).map(|i| self.values[i])
    }

    /// Iterate `(date, value)` points in order.
    pub fn points(&self) -> impl Iterator<Item = DatedValue> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(i, v)| DatedValue::new(self.date_unchecked(i), *v))
    }

    /// Number of days filled by a carry rule.
    #[must_use]
    pub fn carried_count(&self) -> usize {
        self.provenance
            .iter()
            .filter(|p| matches!(p, Provenance::Carried))
            .count()
    }

    /// Maximal runs of consecutive carried days.
    #[must_use]
    pub fn carried_spans(&self) -> Vec<CarrySpan> {
        let mut spans = Vec::new();
        let mut open: Option<usize> = None;
        for (i, p) in self.provenance.iter().enumerate() {
            match (p, open) {
                (Provenance::Carried, None) => open = Some(i),
                (Provenance::Observed, Some(s)) => {
                    spans.push(self.span(s, i - 1));
                    open = None;
                }
                _ => {}
            }
        }
        if let Some(s) = open {
            spans.push(self.span(s, self.values.len() - 1));
        }
        spans
    }

    /// Split into `(name, start, values, provenance)`.
    #[must_use]
    pub fn into_parts(self) -> (String, NaiveDate, Vec<f64>, Vec<Provenance>) {
        (self.name, self.start, self.values, self.provenance)
    }

    fn span(&self, first: usize, last: usize) -> CarrySpan {
        CarrySpan {
            start: self.date_unchecked(first),
            end: self.date_unchecked(last),
        }
    }

    // Construction guarantees start + len is representable.
    fn date_unchecked(&self, index: usize) -> NaiveDate {
        self.start + Days::new(index as u64)
    }
}

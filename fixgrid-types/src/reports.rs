//! Report envelopes produced by the reconciliation pipeline.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::inflation::CountryCode;

/// A continuous run of carried days `[start..=end]` in a dense series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CarrySpan {
    /// Inclusive first carried day.
    pub start: NaiveDate,
    /// Inclusive last carried day.
    pub end: NaiveDate,
}

impl CarrySpan {
    /// Number of days in the span.
    #[must_use]
    pub fn days(&self) -> usize {
        let n = self.end.signed_duration_since(self.start).num_days() + 1;
        usize::try_from(n).unwrap_or(0)
    }
}

/// Non-fatal condition recorded while reconciling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ReconcileWarning {
    /// No annual inflation figure for `(country, year)`; the year was treated as flat.
    MissingInflationFigure {
        /// Country whose figure is missing.
        country: CountryCode,
        /// Calendar year without a figure.
        year: i32,
    },
    /// The first day of the range had no record and was seeded from earlier history.
    SeededFromHistory {
        /// Series that was seeded.
        series: String,
        /// Date of the record used as the seed.
        date: NaiveDate,
    },
}

impl std::fmt::Display for ReconcileWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingInflationFigure { country, year } => {
                write!(f, "no inflation figure for {country} in {year}; treated as flat")
            }
            Self::SeededFromHistory { series, date } => {
                write!(f, "{series} seeded from record dated {date}")
            }
        }
    }
}

/// Coverage of one reconciled series.
///
/// Records which source supplied the records, how many days were observed
/// versus carried, and where the carried runs are.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesReport {
    /// Series name.
    pub name: String,
    /// Name of the record source that supplied the series.
    pub source: String,
    /// Days with a fresh record.
    pub observed: usize,
    /// Days filled by the carry policy.
    pub carried: usize,
    /// Date of the pre-range record the first day was seeded from, if any.
    pub seeded_from: Option<NaiveDate>,
    /// Maximal runs of carried days.
    pub carried_spans: Vec<CarrySpan>,
    /// Number of rebase events applied.
    pub rebases_applied: usize,
}

impl SeriesReport {
    /// Longest carried run, in days.
    #[must_use]
    pub fn longest_gap(&self) -> usize {
        self.carried_spans
            .iter()
            .map(CarrySpan::days)
            .max()
            .unwrap_or(0)
    }
}

/// Summary of one reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ReconcileReport {
    /// Per-series coverage, in table order.
    pub series: Vec<SeriesReport>,
    /// Non-fatal issues encountered while reconciling.
    pub warnings: Vec<ReconcileWarning>,
}

impl ReconcileReport {
    /// Coverage entry for a series.
    #[must_use]
    pub fn series(&self, name: &str) -> Option<&SeriesReport> {
        self.series.iter().find(|s| s.name == name)
    }

    /// True if no warnings were collected.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

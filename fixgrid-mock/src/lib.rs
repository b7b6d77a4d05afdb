//! Mock record sources for CI-safe tests and examples.
//!
//! - [`MockSource`] serves deterministic fixtures: five central-bank fixings
//!   against the ruble (Dec 2003 to Dec 2005, weekdays only, no fixings on
//!   January 1st to 10th), a Brent price series and an annual CPI table.
//! - [`DynamicMockSource`] defers every answer to a test-side controller.

use fixgrid_core::source::{InflationProvider, RecordSource, SeriesProvider};
use fixgrid_core::{CountryCode, InflationIndex, ReconcileError, SeriesSpec, SparseSeries};

mod dynamic;
mod fixtures;

pub use dynamic::{DynamicMockController, DynamicMockSource, MockBehavior};

/// Mock source for CI-safe examples. Provides deterministic data from static fixtures.
///
/// Source ids `FAIL` and `EMPTY` force a source failure and an empty series.
pub struct MockSource;

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSource {
    /// Create the mock source.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// First calendar day covered by the fixture series.
    #[must_use]
    pub fn first_day() -> chrono::NaiveDate {
        fixtures::first_day()
    }

    /// Day after the last calendar day covered by the fixture series.
    #[must_use]
    pub fn end_day() -> chrono::NaiveDate {
        fixtures::end_day()
    }

    fn maybe_fail(source_id: &str) -> Result<(), ReconcileError> {
        match source_id {
            "FAIL" => Err(ReconcileError::source_failure(
                "fixgrid-mock",
                format!("forced failure: series {source_id}"),
            )),
            _ => Ok(()),
        }
    }
}

impl RecordSource for MockSource {
    fn name(&self) -> &'static str {
        "fixgrid-mock"
    }

    fn vendor(&self) -> &'static str {
        "Mock"
    }

    fn as_series_provider(&self) -> Option<&dyn SeriesProvider> {
        Some(self as &dyn SeriesProvider)
    }

    fn as_inflation_provider(&self) -> Option<&dyn InflationProvider> {
        Some(self as &dyn InflationProvider)
    }
}

impl SeriesProvider for MockSource {
    fn series(&self, spec: &SeriesSpec) -> Result<SparseSeries, ReconcileError> {
        let id = spec.source_id.as_str();
        Self::maybe_fail(id)?;
        if id == "EMPTY" {
            return Ok(SparseSeries::new(spec.name.clone()));
        }
        let records = match fixtures::fixings::by_source_id(id) {
            Some(parsed) => parsed?,
            None => fixtures::commodity::by_source_id(id)
                .ok_or_else(|| ReconcileError::not_found(format!("series {id}")))?,
        };
        SparseSeries::from_records(spec.name.clone(), records)
    }
}

impl InflationProvider for MockSource {
    fn inflation(&self, countries: &[CountryCode]) -> Result<InflationIndex, ReconcileError> {
        InflationIndex::from_records(fixtures::inflation::records(countries))
    }
}

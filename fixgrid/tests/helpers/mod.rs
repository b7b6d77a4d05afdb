// Shared fixtures for reconciler tests.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Days, NaiveDate};
use fixgrid::{CountryCode, DateRange, InflationIndex, RecordSource, SparseSeries};
use fixgrid_mock::{DynamicMockController, DynamicMockSource, MockBehavior};

/// Construct a date from components for readability in tests.
pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("invalid date")
}

/// `n` days after `start`.
pub fn plus(start: NaiveDate, n: u64) -> NaiveDate {
    start + Days::new(n)
}

/// `[start, start + days)`.
pub fn range(start: NaiveDate, days: u64) -> DateRange {
    DateRange::new(start, plus(start, days)).unwrap()
}

pub fn country(code: &str) -> CountryCode {
    CountryCode::new(code).unwrap()
}

/// Records on the given day offsets from `start`, valued by `f(offset)`.
pub fn records(start: NaiveDate, days: &[u64], f: impl Fn(u64) -> f64) -> SparseSeries {
    SparseSeries::from_pairs("raw", days.iter().map(|k| (plus(start, *k), f(*k)))).unwrap()
}

/// The same annual figure for every listed country and year.
pub fn flat_cpi(countries: &[&str], years: std::ops::RangeInclusive<i32>, percent: f64) -> InflationIndex {
    let mut idx = InflationIndex::new();
    for c in countries {
        for y in years.clone() {
            idx.insert(country(c), y, percent).unwrap();
        }
    }
    idx
}

/// Dynamic mock answering the given source ids.
pub fn dynamic(
    name: &'static str,
    series: Vec<(&str, SparseSeries)>,
) -> (Arc<dyn RecordSource>, DynamicMockController) {
    let (source, ctl) = DynamicMockSource::new_with_controller(name);
    for (id, s) in series {
        ctl.set_series_behavior(id, MockBehavior::Return(s));
    }
    (source, ctl)
}

pub fn assert_close(got: f64, expected: f64) {
    assert!(
        (got - expected).abs() <= expected.abs() * 1e-9,
        "{got} != {expected}"
    );
}

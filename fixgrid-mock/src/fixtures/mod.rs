pub mod commodity;
pub mod fixings;
pub mod inflation;

use chrono::{Datelike, Days, NaiveDate, Weekday};

const FIRST_DAY: NaiveDate = match NaiveDate::from_ymd_opt(2003, 12, 1) {
    Some(d) => d,
    None => panic!("invalid fixture start"),
};

const END_DAY: NaiveDate = match NaiveDate::from_ymd_opt(2006, 1, 1) {
    Some(d) => d,
    None => panic!("invalid fixture end"),
};

/// First calendar day covered by the fixtures.
pub const fn first_day() -> NaiveDate {
    FIRST_DAY
}

/// Day after the last calendar day covered by the fixtures.
pub const fn end_day() -> NaiveDate {
    END_DAY
}

/// `(day index since first_day, date)` for every weekday in the fixture window
/// that `is_holiday` does not exclude.
pub fn trading_days(is_holiday: fn(NaiveDate) -> bool) -> impl Iterator<Item = (u64, NaiveDate)> {
    let span = end_day().signed_duration_since(first_day()).num_days();
    (0..u64::try_from(span).unwrap_or(0))
        .map(|k| (k, first_day() + Days::new(k)))
        .filter(move |(_, d)| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun) && !is_holiday(*d))
}

/// Round to four decimals the way published quotes are.
pub fn quote(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

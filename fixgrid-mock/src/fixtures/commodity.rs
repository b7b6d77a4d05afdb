use chrono::{Datelike, NaiveDate};
use fixgrid_core::DatedValue;

use super::{quote, trading_days};

/// Daily commodity prices in US dollars, trading days only.
pub fn by_source_id(id: &str) -> Option<Vec<DatedValue>> {
    match id {
        "BRENT" => Some(
            trading_days(is_exchange_holiday)
                .map(|(k, date)| {
                    let k = k as f64;
                    DatedValue::new(date, quote(38.0 + 10.0 * (k / 45.0).sin() + 0.03 * k))
                })
                .collect(),
        ),
        _ => None,
    }
}

fn is_exchange_holiday(d: NaiveDate) -> bool {
    (d.month() == 1 && d.day() == 1) || (d.month() == 12 && d.day() == 25)
}

//! Raw central-bank fixing records and the text formats they arrive in.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ReconcileError;
use crate::series::DatedValue;

/// A quoted fixing: `value` home-currency units buy `nominal` foreign units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fixing {
    /// Fixing date.
    pub date: NaiveDate,
    /// Number of foreign units the quote is for (1, 10, 100, ...).
    pub nominal: f64,
    /// Quoted value for `nominal` units.
    pub value: f64,
}

impl Fixing {
    /// Parse a fixing from its text fields (`"31.12.2004"`, `"100"`, `"25,1234"`).
    ///
    /// # Errors
    /// Returns `Data` if any field fails to parse or the nominal is not positive.
    pub fn parse(date: &str, nominal: &str, value: &str) -> Result<Self, ReconcileError> {
        let fixing = Self {
            date: parse_fixing_date(date)?,
            nominal: parse_decimal_comma(nominal)?,
            value: parse_decimal_comma(value)?,
        };
        if fixing.nominal <= 0.0 {
            return Err(ReconcileError::Data(format!(
                "non-positive nominal {} on {}",
                fixing.nominal, fixing.date
            )));
        }
        Ok(fixing)
    }

    /// Value of a single foreign unit.
    #[must_use]
    pub fn per_unit(&self) -> f64 {
        self.value / self.nominal
    }

    /// Dated per-unit value.
    #[must_use]
    pub fn to_dated(&self) -> DatedValue {
        DatedValue::new(self.date, self.per_unit())
    }
}

/// Parse a `day.month.year` date such as `"07.01.2003"`.
///
/// # Errors
/// Returns `Data` if the text is not three dot-separated integers forming a
/// valid calendar date.
pub fn parse_fixing_date(text: &str) -> Result<NaiveDate, ReconcileError> {
    let bad = || ReconcileError::Data(format!("invalid fixing date: {text:?}"));
    let mut parts = text.trim().split('.');
    let (Some(d), Some(m), Some(y), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(bad());
    };
    let day: u32 = d.parse().map_err(|_| bad())?;
    let month: u32 = m.parse().map_err(|_| bad())?;
    let year: i32 = y.parse().map_err(|_| bad())?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(bad)
}

/// Parse a decimal number written with a comma separator, e.g. `"30,5"`.
///
/// A dot separator is accepted as well.
///
/// # Errors
/// Returns `Data` if the text is not a finite number.
pub fn parse_decimal_comma(text: &str) -> Result<f64, ReconcileError> {
    let v: f64 = text
        .trim()
        .replace(',', ".")
        .parse()
        .map_err(|_| ReconcileError::Data(format!("invalid decimal: {text:?}")))?;
    if !v.is_finite() {
        return Err(ReconcileError::Data(format!("invalid decimal: {text:?}")));
    }
    Ok(v)
}

//! Annual inflation figures keyed by country and year.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ReconcileError;

/// Upper-cased country code such as `RUS`, `USA` or `EA19`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    /// Validate and normalize a country code.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the code is empty or contains characters other
    /// than ASCII letters and digits.
    pub fn new(code: &str) -> Result<Self, ReconcileError> {
        let code = code.trim();
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ReconcileError::InvalidArg(format!(
                "invalid country code: {code:?}"
            )));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    // Only for literals known to be valid upper-case codes.
    pub(crate) fn known(code: &'static str) -> Self {
        Self(code.to_string())
    }

    /// The normalized code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CountryCode {
    type Err = ReconcileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CountryCode {
    type Error = ReconcileError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<CountryCode> for String {
    fn from(code: CountryCode) -> Self {
        code.0
    }
}

/// One row of an annual inflation table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InflationRecord {
    /// Country the figure applies to.
    pub country: CountryCode,
    /// Calendar year.
    pub year: i32,
    /// Annual inflation in percent, e.g. `2.5` for 2.5%.
    pub percent: f64,
}

/// Read-only lookup of annual percentage inflation by `(country, year)`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InflationIndex {
    figures: BTreeMap<CountryCode, BTreeMap<i32, f64>>,
}

impl InflationIndex {
    /// Empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from table rows.
    ///
    /// Source tables may list several rows for the same country and year;
    /// those are averaged into a single figure.
    ///
    /// # Errors
    /// Returns `Data` if any figure is not finite or is at or below -100%.
    pub fn from_records<I>(records: I) -> Result<Self, ReconcileError>
    where
        I: IntoIterator<Item = InflationRecord>,
    {
        let mut sums: BTreeMap<(CountryCode, i32), (f64, u32)> = BTreeMap::new();
        for r in records {
            check_percent(&r.country, r.year, r.percent)?;
            let slot = sums.entry((r.country, r.year)).or_insert((0.0, 0));
            slot.0 += r.percent;
            slot.1 += 1;
        }
        let mut index = Self::new();
        for ((country, year), (sum, count)) in sums {
            index
                .figures
                .entry(country)
                .or_default()
                .insert(year, sum / f64::from(count));
        }
        Ok(index)
    }

    /// Set the figure for `(country, year)`, replacing any previous one.
    ///
    /// # Errors
    /// Returns `Data` if the figure is not finite or is at or below -100%.
    pub fn insert(
        &mut self,
        country: CountryCode,
        year: i32,
        percent: f64,
    ) -> Result<(), ReconcileError> {
        check_percent(&country, year, percent)?;
        self.figures.entry(country).or_default().insert(year, percent);
        Ok(())
    }

    /// Annual percentage for `(country, year)`.
    #[must_use]
    pub fn get(&self, country: &CountryCode, year: i32) -> Option<f64> {
        self.figures.get(country)?.get(&year).copied()
    }

    /// Years covered for `country`, ascending.
    pub fn years(&self, country: &CountryCode) -> impl Iterator<Item = i32> + '_ {
        self.figures
            .get(country)
            .into_iter()
            .flat_map(|m| m.keys().copied())
    }

    /// True if the index holds no figures.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.figures.is_empty()
    }
}

fn check_percent(country: &CountryCode, year: i32, percent: f64) -> Result<(), ReconcileError> {
    if !percent.is_finite() || percent <= -100.0 {
        return Err(ReconcileError::Data(format!(
            "invalid inflation figure {percent} for {country} in {year}"
        )));
    }
    Ok(())
}

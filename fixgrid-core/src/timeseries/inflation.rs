use chrono::{Datelike, NaiveDate};
use fixgrid_types::{
    CountryCode, DateRange, DenseSeries, InflationIndex, Provenance, ReconcileWarning,
};

/// Per-day multiplier equivalent to `percent` annual inflation, compounded daily
/// over 365 days.
#[must_use]
pub fn daily_multiplier(percent: f64) -> f64 {
    (1.0 + percent / 100.0).powf(1.0 / 365.0)
}

/// Running inflation state of one country.
///
/// Starts at 1.0. The daily multiplier is re-derived on the first day of the
/// run and on every January 1st; the cumulative value advances by the daily
/// multiplier once per day.
#[derive(Debug, Clone, PartialEq)]
pub struct CumulativeMultiplier {
    country: CountryCode,
    daily: f64,
    cumulative: f64,
}

impl CumulativeMultiplier {
    /// Fresh accumulator for `country`.
    #[must_use]
    pub const fn new(country: CountryCode) -> Self {
        Self {
            country,
            daily: 1.0,
            cumulative: 1.0,
        }
    }

    /// Country tracked by this accumulator.
    #[must_use]
    pub const fn country(&self) -> &CountryCode {
        &self.country
    }

    /// Multiplier applied per day in the current year.
    #[must_use]
    pub const fn daily(&self) -> f64 {
        self.daily
    }

    /// Accumulated multiplier in effect today.
    #[must_use]
    pub const fn cumulative(&self) -> f64 {
        self.cumulative
    }

    /// Prepare for `date`; refreshes the daily multiplier on the first day
    /// and on January 1st.
    ///
    /// Returns a warning when the year has no figure; the year is then flat.
    pub fn begin_day(
        &mut self,
        date: NaiveDate,
        first: bool,
        cpi: &InflationIndex,
    ) -> Option<ReconcileWarning> {
        if !first && !(date.month() == 1 && date.day() == 1) {
            return None;
        }
        let year = date.year();
        if let Some(pct) = cpi.get(&self.country, year) {
            self.daily = daily_multiplier(pct);
            None
        } else {
            #[cfg(feature = "tracing")]
            tracing::warn!(country = %self.country, year, "no inflation figure; treating year as flat");
            self.daily = 1.0;
            Some(ReconcileWarning::MissingInflationFigure {
                country: self.country.clone(),
                year,
            })
        }
    }

    /// Compound one day.
    pub fn advance(&mut self) {
        self.cumulative *= self.daily;
    }
}

/// Series restated by an inflation transform plus the warnings it produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    /// Restated series; dates and provenance are unchanged.
    pub series: DenseSeries,
    /// Missing figures, one entry per `(country, year)`.
    pub warnings: Vec<ReconcileWarning>,
}

/// Restate a cross rate (units of `to` per unit of `from`) for accumulated
/// inflation in both countries since the first day.
#[must_use]
pub fn normalize(
    dense: &DenseSeries,
    from: &CountryCode,
    to: &CountryCode,
    cpi: &InflationIndex,
) -> DenseSeries {
    normalize_tracked(dense, from, to, cpi).series
}

/// Same as [`normalize`] but keeps the missing-figure warnings.
///
/// - Observed day: `raw * cumulative(from) / cumulative(to)`.
/// - Carried day: previous output `* daily(from) / daily(to)`.
/// - A carried first day has no previous output and uses the observed rule.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "fixgrid_core::normalize",
        skip(dense, cpi),
        fields(series = %dense.name(), from = %from, to = %to),
    )
)]
pub fn normalize_tracked(
    dense: &DenseSeries,
    from: &CountryCode,
    to: &CountryCode,
    cpi: &InflationIndex,
) -> Normalized {
    let mut m_from = CumulativeMultiplier::new(from.clone());
    let mut m_to = CumulativeMultiplier::new(to.clone());
    let mut warnings = Vec::new();
    let mut series = dense.clone();
    let mut prev: Option<f64> = None;

    let days = series
        .values_mut()
        .iter_mut()
        .zip(dense.points())
        .zip(dense.provenance());
    for (i, ((slot, point), prov)) in days.enumerate() {
        for m in [&mut m_from, &mut m_to] {
            if let Some(w) = m.begin_day(point.date, i == 0, cpi) {
                push_unique(&mut warnings, w);
            }
        }
        let out = match (prov, prev) {
            (Provenance::Carried, Some(p)) => p * m_from.daily() / m_to.daily(),
            _ => point.value * m_from.cumulative() / m_to.cumulative(),
        };
        *slot = out;
        prev = Some(out);
        m_from.advance();
        m_to.advance();
    }
    Normalized { series, warnings }
}

/// Restate a price quoted in `country`'s currency in first-day money:
/// `raw / cumulative(country)` for every day.
#[must_use]
pub fn deflate(dense: &DenseSeries, country: &CountryCode, cpi: &InflationIndex) -> DenseSeries {
    deflate_tracked(dense, country, cpi).series
}

/// Same as [`deflate`] but keeps the missing-figure warnings.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "fixgrid_core::deflate",
        skip(dense, cpi),
        fields(series = %dense.name(), country = %country),
    )
)]
pub fn deflate_tracked(
    dense: &DenseSeries,
    country: &CountryCode,
    cpi: &InflationIndex,
) -> Normalized {
    let mut m = CumulativeMultiplier::new(country.clone());
    let mut warnings = Vec::new();
    let mut series = dense.clone();
    for (i, (slot, point)) in series.values_mut().iter_mut().zip(dense.points()).enumerate() {
        if let Some(w) = m.begin_day(point.date, i == 0, cpi) {
            push_unique(&mut warnings, w);
        }
        *slot = point.value / m.cumulative();
        m.advance();
    }
    Normalized { series, warnings }
}

/// Cumulative multiplier of `country` in effect on each day of `range`.
///
/// Years without a figure stay flat and are not reported here; use
/// [`normalize_tracked`] or [`deflate_tracked`] to collect those warnings.
#[must_use]
pub fn multiplier_path(range: DateRange, country: &CountryCode, cpi: &InflationIndex) -> Vec<f64> {
    let mut m = CumulativeMultiplier::new(country.clone());
    range
        .iter()
        .enumerate()
        .map(|(i, date)| {
            let _ = m.begin_day(date, i == 0, cpi);
            let v = m.cumulative();
            m.advance();
            v
        })
        .collect()
}

fn push_unique(warnings: &mut Vec<ReconcileWarning>, w: ReconcileWarning) {
    if !warnings.contains(&w) {
        warnings.push(w);
    }
}

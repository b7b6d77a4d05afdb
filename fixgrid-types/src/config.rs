//! Configuration types for a reconciliation run.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ReconcileError;
use crate::inflation::CountryCode;
use crate::series::DateRange;

/// How inflation normalization treats a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum InflationTreatment {
    /// Leave the series nominal even when normalization is enabled.
    None,
    /// Cross rate quoted in the home currency: track both countries'
    /// cumulative inflation and carry gaps with the daily ratio.
    #[default]
    CrossRate,
    /// Price quoted in the series' own currency: divide by that country's
    /// cumulative inflation.
    Deflate,
}

/// One logical series to reconcile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesSpec {
    /// Column name in the aligned table.
    pub name: String,
    /// Identifier understood by record sources, e.g. a fixing code.
    pub source_id: String,
    /// Country whose inflation applies to the series' currency.
    pub country: CountryCode,
    /// Inflation handling when normalization is enabled.
    pub treatment: InflationTreatment,
}

impl SeriesSpec {
    /// Spec for a cross-rate series.
    pub fn new(name: impl Into<String>, source_id: impl Into<String>, country: CountryCode) -> Self {
        Self {
            name: name.into(),
            source_id: source_id.into(),
            country,
            treatment: InflationTreatment::default(),
        }
    }

    /// Override the inflation treatment.
    #[must_use]
    pub const fn with_treatment(mut self, treatment: InflationTreatment) -> Self {
        self.treatment = treatment;
        self
    }
}

/// One-time multiplicative correction for a redenomination.
///
/// Every value of `series` dated strictly before `cutoff` is multiplied by
/// `factor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebaseEvent {
    /// Series the event applies to.
    pub series: String,
    /// First date left untouched.
    pub cutoff: NaiveDate,
    /// Multiplier for earlier values.
    pub factor: f64,
}

impl RebaseEvent {
    /// Create a rebase event.
    pub fn new(series: impl Into<String>, cutoff: NaiveDate, factor: f64) -> Self {
        Self {
            series: series.into(),
            cutoff,
            factor,
        }
    }
}

/// Rule for displacing the current best series in best-in-window selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum WinThreshold {
    /// Displace only on a strictly greater ratio; earlier candidates win ties.
    #[default]
    Strict,
    /// Displace on a greater or equal ratio; later candidates win ties.
    Inclusive,
}

/// Rolling-window parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Lookahead in days for best-in-window selection.
    pub best_width: usize,
    /// Rows per window for oracle growth.
    pub oracle_width: usize,
    /// Tie rule for best-in-window selection.
    pub threshold: WinThreshold,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            best_width: 7,
            oracle_width: 30,
            threshold: WinThreshold::Strict,
        }
    }
}

/// Full description of a reconciliation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// Daily axis `[start, end)`.
    pub range: DateRange,
    /// Country of the home currency every cross rate is quoted in.
    pub home_country: CountryCode,
    /// Name of the constant reference column appended to the table.
    pub reference: String,
    /// Series in table order.
    pub series: Vec<SeriesSpec>,
    /// Redenomination corrections, applied in order.
    #[serde(default)]
    pub rebase_events: Vec<RebaseEvent>,
    /// Restate values in inflation-adjusted terms.
    #[serde(default)]
    pub normalize_inflation: bool,
    /// Rolling-window parameters.
    #[serde(default)]
    pub windows: WindowConfig,
    /// Series whose mean anchors basket weights; the first series when unset.
    #[serde(default)]
    pub basket_reference: Option<String>,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            range: DateRange::new_unchecked(SAMPLE_START, BASKET_END),
            home_country: CountryCode::known("RUS"),
            reference: "rur".to_string(),
            series: Vec::new(),
            rebase_events: Vec::new(),
            normalize_inflation: false,
            windows: WindowConfig::default(),
            basket_reference: None,
        }
    }
}

impl ReconcileConfig {
    /// Five central-bank fixings against the ruble, 2000-01-01 to 2020-10-01,
    /// with the 2005 Turkish lira redenomination undone.
    #[must_use]
    pub fn ruble_basket() -> Self {
        let spec = |name: &str, id: &str, country: &'static str| {
            SeriesSpec::new(name, id, CountryCode::known(country))
        };
        Self {
            series: vec![
                spec("usd", "R01235", "USA"),
                spec("gbp", "R01035", "GBR"),
                spec("eur", "R01239", "EA19"),
                spec("tkr", "R01700", "TUR"),
                spec("jpy", "R01820", "JPN"),
            ],
            rebase_events: vec![RebaseEvent::new("tkr", LIRA_REDENOMINATION, 1_000_000.0)],
            basket_reference: Some("usd".to_string()),
            ..Self::default()
        }
    }

    /// Dollar fixing and Brent price over 2000-2019, both restated for
    /// Russian and US inflation.
    #[must_use]
    pub fn brent_in_rubles() -> Self {
        let usa = CountryCode::known("USA");
        Self {
            range: DateRange::new_unchecked(SAMPLE_START, BRENT_END),
            series: vec![
                SeriesSpec::new("usd", "R01235", usa.clone()),
                SeriesSpec::new("brent", "BRENT", usa).with_treatment(InflationTreatment::Deflate),
            ],
            normalize_inflation: true,
            basket_reference: Some("usd".to_string()),
            ..Self::default()
        }
    }

    /// Look up a series spec by name.
    #[must_use]
    pub fn series_spec(&self, name: &str) -> Option<&SeriesSpec> {
        self.series.iter().find(|s| s.name == name)
    }

    /// True if the run needs annual inflation figures.
    #[must_use]
    pub fn needs_inflation(&self) -> bool {
        self.normalize_inflation
            && self
                .series
                .iter()
                .any(|s| s.treatment != InflationTreatment::None)
    }

    /// Rebase events that target `series`, in configured order.
    pub fn rebase_events_for<'a>(
        &'a self,
        series: &'a str,
    ) -> impl Iterator<Item = &'a RebaseEvent> + 'a {
        self.rebase_events.iter().filter(move |e| e.series == series)
    }

    /// Check structural invariants.
    ///
    /// # Errors
    /// Returns `InvalidArg` when:
    /// - no series are configured, a name is empty or repeated;
    /// - a series is named like the reference column;
    /// - a window width is zero;
    /// - a rebase event names an unknown series or has a non-positive or
    ///   non-finite factor;
    /// - the basket reference names an unknown column.
    pub fn validate(&self) -> Result<(), ReconcileError> {
        if self.series.is_empty() {
            return Err(ReconcileError::InvalidArg("no series configured".into()));
        }
        if self.reference.is_empty() {
            return Err(ReconcileError::InvalidArg(
                "reference name must not be empty".into(),
            ));
        }
        let mut seen = HashSet::new();
        for s in &self.series {
            if s.name.is_empty() {
                return Err(ReconcileError::InvalidArg(
                    "series name must not be empty".into(),
                ));
            }
            if s.name == self.reference {
                return Err(ReconcileError::InvalidArg(format!(
                    "series {} collides with the reference column",
                    s.name
                )));
            }
            if !seen.insert(s.name.as_str()) {
                return Err(ReconcileError::InvalidArg(format!(
                    "duplicate series name: {}",
                    s.name
                )));
            }
        }
        if self.windows.best_width == 0 || self.windows.oracle_width == 0 {
            return Err(ReconcileError::InvalidArg(
                "window widths must be positive".into(),
            ));
        }
        for e in &self.rebase_events {
            if !seen.contains(e.series.as_str()) {
                return Err(ReconcileError::InvalidArg(format!(
                    "rebase event targets unknown series {}",
                    e.series
                )));
            }
            if !e.factor.is_finite() || e.factor <= 0.0 {
                return Err(ReconcileError::InvalidArg(format!(
                    "rebase factor for {} must be finite and positive, got {}",
                    e.series, e.factor
                )));
            }
        }
        if let Some(b) = &self.basket_reference {
            if !seen.contains(b.as_str()) && *b != self.reference {
                return Err(ReconcileError::InvalidArg(format!(
                    "basket reference {b} is not a configured column"
                )));
            }
        }
        Ok(())
    }
}

const SAMPLE_START: NaiveDate = ymd(2000, 1, 1);
const BASKET_END: NaiveDate = ymd(2020, 10, 1);
const BRENT_END: NaiveDate = ymd(2020, 1, 1);
const LIRA_REDENOMINATION: NaiveDate = ymd(2005, 1, 1);

// Only called from constants: an invalid literal fails the build.
const fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(d) => d,
        None => panic!("invalid preset date"),
    }
}

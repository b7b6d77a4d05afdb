use std::sync::Arc;

use chrono::NaiveDate;
use fixgrid_core::{
    CountryCode, DateRange, InflationIndex, InflationTreatment, RebaseEvent, ReconcileConfig,
    ReconcileError, RecordSource, SeriesSpec, SparseSeries, WindowConfig,
};

/// Orchestrator that pulls records from registered sources and reconciles
/// them into one aligned daily table.
pub struct Reconciler {
    pub(crate) sources: Vec<Arc<dyn RecordSource>>,
    pub(crate) cfg: ReconcileConfig,
}

/// Builder for constructing a `Reconciler` with custom configuration.
pub struct ReconcilerBuilder {
    sources: Vec<Arc<dyn RecordSource>>,
    cfg: ReconcileConfig,
}

impl Default for ReconcilerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReconcilerBuilder {
    /// Create a new builder with default settings.
    ///
    /// Behavior and trade-offs:
    /// - Starts with no sources and no series; register at least one of each.
    /// - Defaults cover 2000-01-01 to 2020-10-01 with rubles as the home
    ///   currency, a constant `rur` reference column, nominal values, and
    ///   windows of 7 (best-in-window) and 30 (oracle growth) days.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sources: vec![],
            cfg: ReconcileConfig::default(),
        }
    }

    /// Register a record source.
    ///
    /// Behavior and trade-offs:
    /// - Registration order is the priority order: the first source that
    ///   carries a series supplies all of its records.
    /// - A source answering `NotFound` (or an empty series) hands the request
    ///   to the next one; other errors are collected and also fall through.
    /// - Records from different sources are never merged within one series.
    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn RecordSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Replace the whole configuration, e.g. with a preset such as
    /// [`ReconcileConfig::ruble_basket`].
    #[must_use]
    pub fn config(mut self, cfg: ReconcileConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Set the daily axis `[start, end)`.
    ///
    /// Behavior and trade-offs:
    /// - Every series must have a record on or before `start`; earlier records
    ///   are used only to seed the first day.
    #[must_use]
    pub const fn range(mut self, range: DateRange) -> Self {
        self.cfg.range = range;
        self
    }

    /// Append a series. Table columns follow the order of these calls.
    #[must_use]
    pub fn series(mut self, spec: SeriesSpec) -> Self {
        self.cfg.series.push(spec);
        self
    }

    /// Add a redenomination correction.
    ///
    /// Behavior and trade-offs:
    /// - Applied to the fetched records before gap filling, so days carried
    ///   across the cutoff stay in the new unit.
    /// - Several events for one series compose multiplicatively.
    #[must_use]
    pub fn rebase(mut self, series: impl Into<String>, cutoff: NaiveDate, factor: f64) -> Self {
        self.cfg
            .rebase_events
            .push(RebaseEvent::new(series, cutoff, factor));
        self
    }

    /// Set the home country every cross rate is quoted in.
    #[must_use]
    pub fn home_country(mut self, country: CountryCode) -> Self {
        self.cfg.home_country = country;
        self
    }

    /// Name the constant reference column appended last to the table.
    #[must_use]
    pub fn reference(mut self, name: impl Into<String>) -> Self {
        self.cfg.reference = name.into();
        self
    }

    /// Toggle inflation normalization.
    ///
    /// Behavior and trade-offs:
    /// - When enabled, sources must also provide annual inflation figures.
    /// - Years without a figure are treated as flat and reported as warnings
    ///   instead of failing the run.
    #[must_use]
    pub const fn normalize_inflation(mut self, yes: bool) -> Self {
        self.cfg.normalize_inflation = yes;
        self
    }

    /// Set rolling-window parameters.
    #[must_use]
    pub const fn windows(mut self, windows: WindowConfig) -> Self {
        self.cfg.windows = windows;
        self
    }

    /// Choose the series whose mean anchors basket weights.
    #[must_use]
    pub fn basket_reference(mut self, name: impl Into<String>) -> Self {
        self.cfg.basket_reference = Some(name.into());
        self
    }

    /// Build the `Reconciler`.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no sources have been registered via
    /// [`with_source`](Self::with_source) or the configuration is inconsistent
    /// (see [`ReconcileConfig::validate`]).
    pub fn build(self) -> Result<Reconciler, ReconcileError> {
        if self.sources.is_empty() {
            return Err(ReconcileError::InvalidArg(
                "no sources registered; add at least one via with_source(...)".to_string(),
            ));
        }
        self.cfg.validate()?;
        Ok(Reconciler {
            sources: self.sources,
            cfg: self.cfg,
        })
    }
}

/// Attach the source name to errors that do not already carry one.
pub fn tag_err(source: &str, e: ReconcileError) -> ReconcileError {
    match e {
        e @ (ReconcileError::NotFound { .. }
        | ReconcileError::Source { .. }
        | ReconcileError::AllSourcesFailed(_)) => e,
        other => ReconcileError::Source {
            source_name: source.to_string(),
            msg: other.to_string(),
        },
    }
}

impl Reconciler {
    /// Start building a new `Reconciler`.
    #[must_use]
    pub fn builder() -> ReconcilerBuilder {
        ReconcilerBuilder::new()
    }

    /// The validated configuration.
    #[must_use]
    pub const fn config(&self) -> &ReconcileConfig {
        &self.cfg
    }

    /// Fetch the records of one series from the first source that has them.
    ///
    /// Returns the series together with the name of the source that supplied it.
    ///
    /// # Errors
    /// - `NotFound` if no source supports series, or every source answered
    ///   `NotFound`.
    /// - `AllSourcesFailed` with each source's error otherwise.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "fixgrid::core::fetch_series",
            skip(self, spec),
            fields(series = %spec.name, source_id = %spec.source_id),
        )
    )]
    pub fn fetch_series(
        &self,
        spec: &SeriesSpec,
    ) -> Result<(SparseSeries, &'static str), ReconcileError> {
        let mut attempted_any = false;
        let mut errors: Vec<ReconcileError> = Vec::new();
        let mut all_not_found = true;
        let mut first_empty: Option<(SparseSeries, &'static str)> = None;

        for s in &self.sources {
            let Some(provider) = s.as_series_provider() else {
                continue;
            };
            attempted_any = true;
            match provider.series(spec) {
                Ok(v) if v.is_empty() => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(source = s.name(), "empty series; trying next source");
                    first_empty.get_or_insert((v, s.name()));
                }
                Ok(v) => return Ok((v, s.name())),
                Err(e @ ReconcileError::NotFound { .. }) => errors.push(e),
                Err(e) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(source = s.name(), error = %e, "source failed");
                    all_not_found = false;
                    errors.push(tag_err(s.name(), e));
                }
            }
        }

        if !attempted_any {
            return Err(ReconcileError::not_found(format!(
                "series provider for {}",
                spec.name
            )));
        }
        // Empty answers surface as-is so filling reports InsufficientHistory.
        if all_not_found {
            if let Some(found) = first_empty {
                return Ok(found);
            }
            return Err(ReconcileError::not_found(format!(
                "series {} ({})",
                spec.name, spec.source_id
            )));
        }
        Err(ReconcileError::AllSourcesFailed(errors))
    }

    /// Countries whose annual figures the run needs: home first, then each
    /// normalized series' country, deduplicated.
    #[must_use]
    pub fn inflation_countries(&self) -> Vec<CountryCode> {
        let mut out = vec![self.cfg.home_country.clone()];
        for s in &self.cfg.series {
            if s.treatment != InflationTreatment::None && !out.contains(&s.country) {
                out.push(s.country.clone());
            }
        }
        out
    }

    /// Fetch annual inflation figures from the first source that has them.
    ///
    /// # Errors
    /// - `NotFound` if no source supports inflation, or every source answered
    ///   `NotFound`.
    /// - `AllSourcesFailed` with each source's error otherwise.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "fixgrid::core::fetch_inflation", skip(self))
    )]
    pub fn fetch_inflation(&self) -> Result<InflationIndex, ReconcileError> {
        let countries = self.inflation_countries();
        let mut attempted_any = false;
        let mut errors: Vec<ReconcileError> = Vec::new();
        let mut all_not_found = true;

        for s in &self.sources {
            let Some(provider) = s.as_inflation_provider() else {
                continue;
            };
            attempted_any = true;
            match provider.inflation(&countries) {
                Ok(v) => return Ok(v),
                Err(e @ ReconcileError::NotFound { .. }) => errors.push(e),
                Err(e) => {
                    all_not_found = false;
                    errors.push(tag_err(s.name(), e));
                }
            }
        }

        if !attempted_any || all_not_found {
            return Err(ReconcileError::not_found("inflation figures"));
        }
        Err(ReconcileError::AllSourcesFailed(errors))
    }
}

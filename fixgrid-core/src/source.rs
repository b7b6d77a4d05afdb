//! Role traits implemented by record sources.

use fixgrid_types::{CountryCode, InflationIndex, ReconcileError, SeriesSpec, SparseSeries};

/// Focused role trait for sources that supply daily series records.
pub trait SeriesProvider: Send + Sync {
    /// Fetch every record the source holds for `spec`, including history
    /// preceding any range the caller will later fill.
    ///
    /// # Errors
    /// Return `NotFound` when the source does not carry `spec.source_id`, so
    /// the next registered source is tried. Any other error is recorded as a
    /// source failure.
    fn series(&self, spec: &SeriesSpec) -> Result<SparseSeries, ReconcileError>;
}

/// Focused role trait for sources that supply annual inflation figures.
pub trait InflationProvider: Send + Sync {
    /// Fetch annual figures for the given countries.
    ///
    /// Countries the source has no figures for are simply absent from the
    /// returned index.
    ///
    /// # Errors
    /// Return `NotFound` when the source carries no inflation table at all.
    fn inflation(&self, countries: &[CountryCode]) -> Result<InflationIndex, ReconcileError>;
}

/// Main trait implemented by record sources. Exposes capability discovery.
pub trait RecordSource: Send + Sync {
    /// A stable identifier used in reports and errors (e.g., "cbr-xml", "oecd-cpi").
    fn name(&self) -> &'static str;

    /// Human-friendly vendor string.
    fn vendor(&self) -> &'static str {
        "unknown"
    }

    /// Advertise series capability by returning a usable trait object reference when supported.
    fn as_series_provider(&self) -> Option<&dyn SeriesProvider> {
        None
    }

    /// Advertise inflation capability by returning a usable trait object reference when supported.
    fn as_inflation_provider(&self) -> Option<&dyn InflationProvider> {
        None
    }
}

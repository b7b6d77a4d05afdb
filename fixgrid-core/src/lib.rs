//! fixgrid-core
//!
//! Record-source traits and the reconciliation algorithms.
//!
//! - `source`: the `RecordSource` trait and its provider role traits.
//! - `timeseries`: gap filling, rebasing, inflation normalization, alignment.
//! - `analytics`: window analytics, basket weights, correlations, excursions.
//!
//! Everything here is synchronous and operates on fully materialized inputs.
//! Functions only read their inputs, so independent series or analytics may
//! be computed on separate threads.
#![warn(missing_docs)]

/// Analytics over dense series and aligned tables.
pub mod analytics;
/// Record-source capability traits.
pub mod source;
/// Per-series transforms and alignment.
pub mod timeseries;

pub use analytics::basket::basket_weights;
pub use analytics::correlation::{
    CorrelationMatrix, YearlyCorrelation, correlation_matrix, yearly_correlations,
};
pub use analytics::excursion::{Direction, MonthlyExcursion, excursions};
pub use analytics::window::{
    BestInWindow, OracleGrowth, WindowWin, best_in_window, daily_best_factors, growth_peaks,
    oracle_growth, oracle_growth_single, realized_growth,
};
pub use fixgrid_types::*;
pub use source::{InflationProvider, RecordSource, SeriesProvider};
pub use timeseries::align::align;
pub use timeseries::fill::{CarryPolicy, FillOutcome, fill, fill_tracked};
pub use timeseries::inflation::{
    CumulativeMultiplier, Normalized, daily_multiplier, deflate, deflate_tracked,
    multiplier_path, normalize, normalize_tracked,
};
pub use timeseries::rebase::{applicable_events, rebase, rebase_records};

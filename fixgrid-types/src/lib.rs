//! Data model, configuration and error types shared by the fixgrid crates.
//!
//! - [`SparseSeries`] holds irregularly dated source records.
//! - [`DenseSeries`] is a gap-free daily grid with per-day [`Provenance`].
//! - [`AlignedTable`] joins dense series on one daily axis, reference last.
//! - [`ReconcileConfig`] describes a full reconciliation run.
#![warn(missing_docs)]

mod config;
mod error;
mod fixing;
mod inflation;
mod reports;
mod series;
mod table;

pub use config::{
    InflationTreatment, RebaseEvent, ReconcileConfig, SeriesSpec, WinThreshold, WindowConfig,
};
pub use error::ReconcileError;
pub use fixing::{Fixing, parse_decimal_comma, parse_fixing_date};
pub use inflation::{CountryCode, InflationIndex, InflationRecord};
pub use reports::{CarrySpan, ReconcileReport, ReconcileWarning, SeriesReport};
pub use series::{DateRange, DatedValue, DenseSeries, Provenance, SparseSeries};
pub use table::{AlignedTable, Row};

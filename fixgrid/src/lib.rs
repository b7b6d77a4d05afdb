//! fixgrid reconciles irregular daily records into one gap-free daily table.
//!
//! Overview
//! - Pulls series records and annual inflation figures from sources that
//!   implement the `fixgrid_core` role traits.
//! - Fills every calendar day by carrying the last known value, seeding the
//!   first day from earlier history.
//! - Undoes redenominations with declarative rebase events.
//! - Optionally restates values for accumulated inflation.
//! - Aligns all series on one axis next to a constant reference column and
//!   runs window analytics and basket normalization on the result.
//!
//! Key behaviors and trade-offs
//! - Sources are tried in registration order; the first one with records for
//!   a series supplies all of them. Records are never merged across sources.
//! - A series with nothing at or before the first day fails the whole run with
//!   `InsufficientHistory`. Missing inflation figures only produce warnings and
//!   the year is treated as flat.
//! - Gap filling repeats values (or scales them by the daily inflation ratio),
//!   so long gaps read as flat stretches; check `SeriesReport::carried_spans`.
//! - Features:
//!   - `parallel`: per-series work and `Reconciliation::analyze` run on rayon.
//!   - `tracing`: spans and events via the `tracing` crate.
//!
//! Examples
//! Reconciling the ruble basket preset:
//! ```rust,ignore
//! use std::sync::Arc;
//! use fixgrid::{ReconcileConfig, Reconciler};
//!
//! let source = Arc::new(CbrXmlSource::new());
//! let run = Reconciler::builder()
//!     .with_source(source)
//!     .config(ReconcileConfig::ruble_basket())
//!     .build()?
//!     .reconcile()?;
//!
//! let best = run.best_in_window()?;
//! for (name, wins) in best.tally_by_name() {
//!     println!("{name}: {wins}");
//! }
//! ```
//!
//! Building a custom run:
//! ```rust,ignore
//! use fixgrid::{CountryCode, DateRange, Reconciler, SeriesSpec};
//!
//! let usa: CountryCode = "USA".parse()?;
//! let run = Reconciler::builder()
//!     .with_source(source)
//!     .range(DateRange::new(start, end)?)
//!     .series(SeriesSpec::new("usd", "R01235", usa))
//!     .normalize_inflation(true)
//!     .build()?
//!     .reconcile()?;
//! for w in &run.report().warnings {
//!     eprintln!("warning: {w}");
//! }
//! ```
//!
//! See `fixgrid/demos/` for runnable end-to-end demonstrations.
#![warn(missing_docs)]

pub(crate) mod core;
mod pipeline;
mod reconciliation;

pub use core::{Reconciler, ReconcilerBuilder};
pub use reconciliation::{Analysis, Reconciliation};

// Re-export core types for convenience
pub use fixgrid_core::{
    AlignedTable, BestInWindow, CarrySpan, CorrelationMatrix, CountryCode, DateRange, DatedValue,
    DenseSeries, Direction, Fixing, InflationIndex, InflationProvider, InflationRecord,
    InflationTreatment, MonthlyExcursion, OracleGrowth, Provenance, RebaseEvent, ReconcileConfig,
    ReconcileError, ReconcileReport, ReconcileWarning, RecordSource, Row, SeriesProvider,
    SeriesReport, SeriesSpec, SparseSeries, WinThreshold, WindowConfig, WindowWin,
    YearlyCorrelation,
};

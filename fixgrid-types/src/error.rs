use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the fixgrid workspace.
///
/// Covers fatal reconciliation conditions (unfillable leading gaps, mismatched
/// date axes, degenerate series), argument validation and record-source
/// failures. Missing inflation figures are deliberately absent: they are
/// recoverable and surface as [`crate::ReconcileWarning`] instead.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReconcileError {
    /// A series has no value at or before the first date of the requested range.
    #[error("insufficient history for {series}: no value at or before {start}")]
    InsufficientHistory {
        /// Series that could not be filled.
        series: String,
        /// First date of the requested range.
        start: NaiveDate,
    },

    /// Series handed to the aligner do not share an identical date axis.
    #[error(
        "range mismatch for {series}: expected {expected_len} days from {expected_start}, \
         got {found_len} days from {found_start}"
    )]
    RangeMismatch {
        /// Offending series.
        series: String,
        /// Start date of the first aligned series.
        expected_start: NaiveDate,
        /// Day count of the first aligned series.
        expected_len: usize,
        /// Start date of the offending series.
        found_start: NaiveDate,
        /// Day count of the offending series.
        found_len: usize,
    },

    /// A series mean (or a basket row sum) is zero, so it cannot be used as a divisor.
    #[error("degenerate series: {series}")]
    DegenerateSeries {
        /// Series (or row label) that degenerated.
        series: String,
    },

    /// Issues with supplied or derived data (non-finite values, non-positive prices).
    #[error("data issue: {0}")]
    Data(String),

    /// Invalid input argument or configuration.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// A requested series or dataset could not be found.
    #[error("not found: {what}")]
    NotFound {
        /// Description of the missing resource, e.g. "series usd".
        what: String,
    },

    /// An individual record source returned an error.
    #[error("{source_name} failed: {msg}")]
    Source {
        /// Record source name that failed.
        source_name: String,
        /// Human-readable error message.
        msg: String,
    },

    /// Every registered record source failed; contains the individual failures.
    #[error("all sources failed: {0:?}")]
    AllSourcesFailed(Vec<ReconcileError>),
}

impl ReconcileError {
    /// Helper: build an `InsufficientHistory` error.
    pub fn insufficient_history(series: impl Into<String>, start: NaiveDate) -> Self {
        Self::InsufficientHistory {
            series: series.into(),
            start,
        }
    }

    /// Helper: build a `DegenerateSeries` error.
    pub fn degenerate(series: impl Into<String>) -> Self {
        Self::DegenerateSeries {
            series: series.into(),
        }
    }

    /// Helper: build a `NotFound` error for a description of the missing resource.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Helper: build a `Source` error with the source name and message.
    pub fn source_failure(source_name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Source {
            source_name: source_name.into(),
            msg: msg.into(),
        }
    }

    /// True for the `NotFound` variant.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

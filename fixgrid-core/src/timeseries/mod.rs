//! Per-series transforms applied between fetching records and building the table.
//!
//! Modules include:
//! - `fill`: sparse to dense daily series under a carry policy
//! - `rebase`: one-time redenomination corrections
//! - `inflation`: cumulative multipliers, cross-rate normalization and deflation
//! - `align`: join dense series on a shared axis with a constant reference
/// Alignment of dense series onto one table.
pub mod align;
/// Sparse to dense daily gap filling.
pub mod fill;
/// Cumulative inflation multipliers and restatement.
pub mod inflation;
/// Redenomination corrections.
pub mod rebase;

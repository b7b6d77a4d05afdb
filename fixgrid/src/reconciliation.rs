use fixgrid_core::{
    AlignedTable, BestInWindow, DatedValue, DenseSeries, Direction, MonthlyExcursion,
    OracleGrowth, ReconcileError, ReconcileReport, WindowConfig, YearlyCorrelation,
    basket_weights, best_in_window, excursions, growth_peaks, oracle_growth, realized_growth,
    yearly_correlations,
};
use serde::{Deserialize, Serialize};

/// Outcome of [`Reconciler::reconcile`](crate::Reconciler::reconcile): the
/// aligned table, its coverage report, and the analytics settings of the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reconciliation {
    table: AlignedTable,
    report: ReconcileReport,
    windows: WindowConfig,
    basket_reference: Option<String>,
}

/// Window analytics and basket weights computed in one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Best-in-window winners and tally.
    pub best: BestInWindow,
    /// Oracle growth per window start.
    pub oracle: OracleGrowth,
    /// Mean-normalized basket weights.
    pub basket: AlignedTable,
}

impl Reconciliation {
    pub(crate) const fn new(
        table: AlignedTable,
        report: ReconcileReport,
        windows: WindowConfig,
        basket_reference: Option<String>,
    ) -> Self {
        Self {
            table,
            report,
            windows,
            basket_reference,
        }
    }

    /// The aligned table, reference column last.
    #[must_use]
    pub const fn table(&self) -> &AlignedTable {
        &self.table
    }

    /// Coverage and warnings of the run.
    #[must_use]
    pub const fn report(&self) -> &ReconcileReport {
        &self.report
    }

    /// Window parameters used by the analytics below.
    #[must_use]
    pub const fn windows(&self) -> WindowConfig {
        self.windows
    }

    /// Split into the table and the report.
    #[must_use]
    pub fn into_parts(self) -> (AlignedTable, ReconcileReport) {
        (self.table, self.report)
    }

    /// One column as a dense series.
    ///
    /// The table keeps values only, so every day reads as observed; the
    /// report holds the carried spans.
    ///
    /// # Errors
    /// Returns `NotFound` if the column does not exist.
    pub fn series(&self, name: &str) -> Result<DenseSeries, ReconcileError> {
        let col = self
            .table
            .column(name)
            .ok_or_else(|| ReconcileError::not_found(format!("column {name}")))?;
        DenseSeries::observed(name, self.table.start(), col.to_vec())
    }

    /// Add a derived column `a * b`, e.g. a dollar price times the ruble rate.
    ///
    /// # Errors
    /// See [`AlignedTable::with_product`].
    pub fn with_product(mut self, name: &str, a: &str, b: &str) -> Result<Self, ReconcileError> {
        self.table = self.table.with_product(name, a, b)?;
        Ok(self)
    }

    /// Best-in-window selection with the configured width and tie rule.
    ///
    /// # Errors
    /// Propagates [`best_in_window`] errors.
    pub fn best_in_window(&self) -> Result<BestInWindow, ReconcileError> {
        best_in_window(&self.table, self.windows.best_width, self.windows.threshold)
    }

    /// Oracle growth with the configured width.
    ///
    /// # Errors
    /// Propagates [`oracle_growth`] errors.
    pub fn oracle_growth(&self) -> Result<OracleGrowth, ReconcileError> {
        oracle_growth(&self.table, self.windows.oracle_width)
    }

    /// Buy-and-hold growth of one column over the oracle windows.
    ///
    /// # Errors
    /// Returns `NotFound` if the column does not exist.
    pub fn realized_growth(&self, name: &str) -> Result<Vec<f64>, ReconcileError> {
        realized_growth(&self.table, name, self.windows.oracle_width)
    }

    /// Oracle windows whose growth reaches `threshold`.
    ///
    /// # Errors
    /// Propagates [`oracle_growth`] errors.
    pub fn growth_peaks(&self, threshold: f64) -> Result<Vec<DatedValue>, ReconcileError> {
        Ok(growth_peaks(&self.oracle_growth()?, threshold))
    }

    /// Series the basket is anchored to: the configured one, else the first column.
    #[must_use]
    pub fn basket_anchor(&self) -> &str {
        self.basket_reference
            .as_deref()
            .or_else(|| self.table.series_names().first().map(String::as_str))
            .unwrap_or_else(|| self.table.reference())
    }

    /// Mean-normalized basket weights anchored on [`basket_anchor`](Self::basket_anchor).
    ///
    /// # Errors
    /// Propagates [`basket_weights`] errors.
    pub fn basket_weights(&self) -> Result<AlignedTable, ReconcileError> {
        basket_weights(&self.table, self.basket_anchor())
    }

    /// Per-year correlation matrices of the basket weights.
    ///
    /// # Errors
    /// Propagates [`basket_weights`] and [`yearly_correlations`] errors.
    pub fn yearly_correlations(&self) -> Result<Vec<YearlyCorrelation>, ReconcileError> {
        yearly_correlations(&self.basket_weights()?)
    }

    /// Largest monthly moves of one column, measured in decades (log10).
    ///
    /// # Errors
    /// `NotFound` for an unknown column; otherwise see [`excursions`].
    pub fn excursions(
        &self,
        name: &str,
        width: usize,
        threshold: f64,
        direction: Direction,
    ) -> Result<Vec<MonthlyExcursion>, ReconcileError> {
        excursions(&self.series(name)?, width, threshold, direction)
    }

    /// Compute best-in-window, oracle growth and basket weights together.
    ///
    /// With the `parallel` feature the three passes run concurrently on the
    /// rayon pool.
    ///
    /// # Errors
    /// The first error among the three passes.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "fixgrid::analyze",
            skip(self),
            fields(rows = self.table.len(), columns = self.table.names().len()),
        )
    )]
    pub fn analyze(&self) -> Result<Analysis, ReconcileError> {
        #[cfg(feature = "parallel")]
        let (best, (oracle, basket)) = rayon::join(
            || self.best_in_window(),
            || rayon::join(|| self.oracle_growth(), || self.basket_weights()),
        );
        #[cfg(not(feature = "parallel"))]
        let (best, oracle, basket) = (
            self.best_in_window(),
            self.oracle_growth(),
            self.basket_weights(),
        );
        Ok(Analysis {
            best: best?,
            oracle: oracle?,
            basket: basket?,
        })
    }
}

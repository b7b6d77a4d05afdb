use chrono::{Days, NaiveDate};
use fixgrid_types::{AlignedTable, DatedValue, DenseSeries, ReconcileError, WinThreshold};
use serde::{Deserialize, Serialize};

/// Winner of one best-in-window comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowWin {
    /// Row where the window starts.
    pub index: usize,
    /// Date of that row.
    pub date: NaiveDate,
    /// Column position of the winner in [`BestInWindow::names`].
    pub winner: usize,
    /// Winning ratio minus one.
    pub gain: f64,
}

/// Best-performing column for every forward window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestInWindow {
    /// Lookahead in rows.
    pub width: usize,
    /// Column names of the source table, reference last.
    pub names: Vec<String>,
    /// One entry per window start, in row order.
    pub wins: Vec<WindowWin>,
    /// Win count per column, parallel to `names`.
    pub tally: Vec<usize>,
}

impl BestInWindow {
    /// Name of the column that won `win`.
    #[must_use]
    pub fn winner_name(&self, win: &WindowWin) -> &str {
        self.names.get(win.winner).map_or("", String::as_str)
    }

    /// Win count for a column.
    #[must_use]
    pub fn wins_for(&self, name: &str) -> usize {
        self.names
            .iter()
            .position(|n| n == name)
            .map_or(0, |i| self.tally[i])
    }

    /// `(name, wins)` pairs in column order.
    pub fn tally_by_name(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.tally.iter().copied())
    }
}

/// For each row `i` in `[0, n - width)`, pick the column with the highest
/// ratio `value[i + width] / value[i]`.
///
/// The reference column is considered first at exactly 1.0, then the other
/// columns in table order. Under [`WinThreshold::Strict`] a candidate
/// displaces the current best only with a strictly greater ratio, so earlier
/// columns win ties; [`WinThreshold::Inclusive`] lets later columns win ties.
///
/// # Errors
/// Returns `InvalidArg` if `width` is zero.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "fixgrid_core::best_in_window",
        skip(table),
        fields(rows = table.len()),
    )
)]
pub fn best_in_window(
    table: &AlignedTable,
    width: usize,
    threshold: WinThreshold,
) -> Result<BestInWindow, ReconcileError> {
    check_width(width)?;
    let reference = table.names().len() - 1;
    let mut tally = vec![0; table.names().len()];
    let windows = table.len().saturating_sub(width);
    let mut wins = Vec::with_capacity(windows);

    for (i, date) in table.dates().take(windows).enumerate() {
        let mut best = (reference, 1.0);
        for (c, col) in table.columns()[..reference].iter().enumerate() {
            let ratio = col[i + width] / col[i];
            let displaces = match threshold {
                WinThreshold::Strict => ratio > best.1,
                WinThreshold::Inclusive => ratio >= best.1,
                _ => ratio > best.1,
            };
            if displaces {
                best = (c, ratio);
            }
        }
        tally[best.0] += 1;
        wins.push(WindowWin {
            index: i,
            date,
            winner: best.0,
            gain: best.1 - 1.0,
        });
    }
    Ok(BestInWindow {
        width,
        names: table.names().to_vec(),
        wins,
        tally,
    })
}

/// Growth factor per window start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleGrowth {
    /// Rows per window.
    pub width: usize,
    /// Date of the first window start.
    pub start: NaiveDate,
    /// One factor per window start, in row order.
    pub values: Vec<f64>,
}

impl OracleGrowth {
    /// Date of window `index`.
    #[must_use]
    pub fn date_at(&self, index: usize) -> Option<NaiveDate> {
        (index < self.values.len())
            .then(|| self.start.checked_add_days(Days::new(index as u64)))
            .flatten()
    }

    /// Windows as dated values.
    pub fn points(&self) -> impl Iterator<Item = DatedValue> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| self.date_at(i).map(|d| DatedValue::new(d, *v)))
    }
}

/// Best single-day factor between consecutive rows: the highest ratio across
/// non-reference columns, floored at 1.0. Entry `j` covers rows `j..=j + 1`.
#[must_use]
pub fn daily_best_factors(table: &AlignedTable) -> Vec<f64> {
    let series = &table.columns()[..table.names().len() - 1];
    (1..table.len())
        .map(|j| {
            series
                .iter()
                .map(|col| col[j] / col[j - 1])
                .fold(1.0, |best, r| if r > best { r } else { best })
        })
        .collect()
}

/// Hindsight-optimal compounding growth over rows `[i, i + width)` for each
/// `i` in `[0, n - width)`, switching every day into the best-growing column
/// (or holding the reference when nothing grows).
///
/// # Errors
/// Returns `InvalidArg` if `width` is zero.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "fixgrid_core::oracle_growth",
        skip(table),
        fields(rows = table.len()),
    )
)]
pub fn oracle_growth(table: &AlignedTable, width: usize) -> Result<OracleGrowth, ReconcileError> {
    check_width(width)?;
    let factors = daily_best_factors(table);
    Ok(OracleGrowth {
        width,
        start: table.start(),
        values: window_products(&factors, table.len(), width),
    })
}

/// Oracle growth of a single series: long on up days, flat otherwise.
///
/// # Errors
/// Returns `InvalidArg` if `width` is zero.
pub fn oracle_growth_single(
    series: &DenseSeries,
    width: usize,
) -> Result<OracleGrowth, ReconcileError> {
    check_width(width)?;
    let v = series.values();
    let factors: Vec<f64> = v
        .windows(2)
        .map(|w| if w[1] > w[0] { w[1] / w[0] } else { 1.0 })
        .collect();
    Ok(OracleGrowth {
        width,
        start: series.start(),
        values: window_products(&factors, v.len(), width),
    })
}

/// Buy-and-hold growth of column `name` over the same windows as
/// [`oracle_growth`]: `value[i + width - 1] / value[i]`.
///
/// # Errors
/// - `InvalidArg` if `width` is zero.
/// - `NotFound` if the column does not exist.
pub fn realized_growth(
    table: &AlignedTable,
    name: &str,
    width: usize,
) -> Result<Vec<f64>, ReconcileError> {
    check_width(width)?;
    let col = table
        .column(name)
        .ok_or_else(|| ReconcileError::not_found(format!("column {name}")))?;
    let windows = col.len().saturating_sub(width);
    Ok((0..windows).map(|i| col[i + width - 1] / col[i]).collect())
}

/// Window starts whose growth is at least `threshold`.
#[must_use]
pub fn growth_peaks(growth: &OracleGrowth, threshold: f64) -> Vec<DatedValue> {
    growth.points().filter(|p| p.value >= threshold).collect()
}

// `factors[j]` covers rows `j..=j + 1`; window `i` spans rows `[i, i + width)`.
fn window_products(factors: &[f64], rows: usize, width: usize) -> Vec<f64> {
    (0..rows.saturating_sub(width))
        .map(|i| factors[i..i + width - 1].iter().product())
        .collect()
}

fn check_width(width: usize) -> Result<(), ReconcileError> {
    if width == 0 {
        return Err(ReconcileError::InvalidArg(
            "window width must be positive".into(),
        ));
    }
    Ok(())
}

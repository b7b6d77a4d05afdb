//! Column-oriented table of aligned daily series.

use std::ops::Range;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ReconcileError;
use crate::series::DateRange;

/// Series sharing one daily date axis, stored column-wise.
///
/// Invariants:
/// - every column has exactly `len` values;
/// - column names are unique;
/// - the reference column is always the last one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAlignedTable", into = "RawAlignedTable")]
pub struct AlignedTable {
    start: NaiveDate,
    len: usize,
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

#[derive(Serialize, Deserialize)]
struct RawAlignedTable {
    start: NaiveDate,
    len: usize,
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl TryFrom<RawAlignedTable> for AlignedTable {
    type Error = ReconcileError;

    fn try_from(raw: RawAlignedTable) -> Result<Self, Self::Error> {
        let table = Self::from_columns(raw.start, raw.names, raw.columns)?;
        if table.len != raw.len {
            return Err(ReconcileError::InvalidArg(format!(
                "table declares {} rows but its columns hold {}",
                raw.len, table.len
            )));
        }
        Ok(table)
    }
}

impl From<AlignedTable> for RawAlignedTable {
    fn from(t: AlignedTable) -> Self {
        Self {
            start: t.start,
            len: t.len,
            names: t.names,
            columns: t.columns,
        }
    }
}

impl AlignedTable {
    /// Assemble a table from named columns. The last column is the reference.
    ///
    /// # Errors
    /// - `InvalidArg` if there are no columns, names and columns differ in count,
    ///   names repeat, or the axis is empty.
    /// - `RangeMismatch` if a column length differs from the first one.
    pub fn from_columns(
        start: NaiveDate,
        names: Vec<String>,
        columns: Vec<Vec<f64>>,
    ) -> Result<Self, ReconcileError> {
        if names.is_empty() || names.len() != columns.len() {
            return Err(ReconcileError::InvalidArg(format!(
                "table needs one name per column: {} names, {} columns",
                names.len(),
                columns.len()
            )));
        }
        for (i, n) in names.iter().enumerate() {
            if names[..i].contains(n) {
                return Err(ReconcileError::InvalidArg(format!(
                    "duplicate column name: {n}"
                )));
            }
        }
        let len = columns[0].len();
        if len == 0 {
            return Err(ReconcileError::InvalidArg("table has no rows".into()));
        }
        for (name, col) in names.iter().zip(&columns) {
            if col.len() != len {
                return Err(ReconcileError::RangeMismatch {
                    series: name.clone(),
                    expected_start: start,
                    expected_len: len,
                    found_start: start,
                    found_len: col.len(),
                });
            }
        }
        let last = u64::try_from(len).unwrap_or(u64::MAX);
        if start.checked_add_days(Days::new(last)).is_none() {
            return Err(ReconcileError::InvalidArg(
                "table runs past the calendar".into(),
            ));
        }
        Ok(Self {
            start,
            len,
            names,
            columns,
        })
    }

    /// Number of rows (days).
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Always false for a constructed table.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// First date of the axis.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// The covered date range.
    #[must_use]
    pub fn range(&self) -> DateRange {
        DateRange::new_unchecked(self.start, self.date_unchecked(self.len))
    }

    /// All column names, reference last.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Name of the reference column.
    #[must_use]
    pub fn reference(&self) -> &str {
        self.names.last().map_or("", String::as_str)
    }

    /// Column names without the reference.
    #[must_use]
    pub fn series_names(&self) -> &[String] {
        &self.names[..self.names.len() - 1]
    }

    /// Position of a column.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Values of a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.position(name).map(|i| self.columns[i].as_slice())
    }

    /// All columns in name order.
    #[must_use]
    pub fn columns(&self) -> &[Vec<f64>] {
        &self.columns
    }

    /// Date of row `index`.
    #[must_use]
    pub fn date_at(&self, index: usize) -> Option<NaiveDate> {
        (index < self.len).then(|| self.date_unchecked(index))
    }

    /// Iterate the date axis.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..self.len).map(|i| self.date_unchecked(i))
    }

    /// Value at `(row, column name)`.
    #[must_use]
    pub fn value(&self, row: usize, name: &str) -> Option<f64> {
        self.column(name).and_then(|c| c.get(row).copied())
    }

    /// View of row `index`.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        (index < self.len).then_some(Row { table: self, index })
    }

    /// Iterate all rows in date order.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        (0..self.len).map(|index| Row { table: self, index })
    }

    /// Row ranges grouped by calendar year, in year order.
    #[must_use]
    pub fn year_slices(&self) -> Vec<(i32, Range<usize>)> {
        let mut out: Vec<(i32, Range<usize>)> = Vec::new();
        for (i, date) in self.dates().enumerate() {
            match out.last_mut() {
                Some((year, r)) if *year == date.year() => r.end = i + 1,
                _ => out.push((date.year(), i..i + 1)),
            }
        }
        out
    }

    /// Copy of the table restricted to rows `rows`.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the range is empty or out of bounds.
    pub fn slice(&self, rows: Range<usize>) -> Result<Self, ReconcileError> {
        if rows.start >= rows.end || rows.end > self.len {
            return Err(ReconcileError::InvalidArg(format!(
                "row range {rows:?} outside table of {} rows",
                self.len
            )));
        }
        Self::from_columns(
            self.date_unchecked(rows.start),
            self.names.clone(),
            self.columns.iter().map(|c| c[rows.clone()].to_vec()).collect(),
        )
    }

    /// Table with the same axis and names but transformed columns.
    ///
    /// # Errors
    /// Propagates validation errors from [`AlignedTable::from_columns`].
    pub fn with_columns(&self, columns: Vec<Vec<f64>>) -> Result<Self, ReconcileError> {
        Self::from_columns(self.start, self.names.clone(), columns)
    }

    /// Add a derived column equal to the row-wise product of columns `a` and `b`.
    ///
    /// The new column is inserted just before the reference column.
    ///
    /// # Errors
    /// - `NotFound` if either input column is missing.
    /// - `InvalidArg` if `name` already exists.
    pub fn with_product(&self, name: &str, a: &str, b: &str) -> Result<Self, ReconcileError> {
        if self.position(name).is_some() {
            return Err(ReconcileError::InvalidArg(format!(
                "column {name} already exists"
            )));
        }
        let ca = self
            .column(a)
            .ok_or_else(|| ReconcileError::not_found(format!("column {a}")))?;
        let cb = self
            .column(b)
            .ok_or_else(|| ReconcileError::not_found(format!("column {b}")))?;
        let product: Vec<f64> = ca.iter().zip(cb).map(|(x, y)| x * y).collect();

        let at = self.names.len() - 1;
        let mut names = self.names.clone();
        let mut columns = self.columns.clone();
        names.insert(at, name.to_string());
        columns.insert(at, product);
        Self::from_columns(self.start, names, columns)
    }

    // Construction guarantees start + len is representable.
    fn date_unchecked(&self, index: usize) -> NaiveDate {
        self.start + Days::new(index as u64)
    }
}

/// Borrowed view of one table row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a AlignedTable,
    index: usize,
}

impl<'a> Row<'a> {
    /// Row position.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Row date.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.table.date_unchecked(self.index)
    }

    /// Value of column `name` in this row.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.table.value(self.index, name)
    }

    /// Iterate `(name, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, f64)> + 'a {
        let index = self.index;
        self.table
            .names
            .iter()
            .zip(&self.table.columns)
            .map(move |(n, c)| (n.as_str(), c[index]))
    }

    /// Sum of all values in the row.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.iter().map(|(_, v)| v).sum()
    }
}

use chrono::Datelike;
use fixgrid_types::{DenseSeries, ReconcileError};
use serde::{Deserialize, Serialize};

/// Direction of a move to look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Falls: `delta < -threshold`.
    Drop,
    /// Rises: `delta > threshold`.
    Spike,
}

/// Most extreme qualifying move that started in a given month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyExcursion {
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1-based.
    pub month: u32,
    /// `log10(value[i + width] / value[i])` of the most extreme move.
    pub delta: f64,
}

/// Find moves larger than `threshold` decades over `width` days and keep the
/// most extreme one per calendar month of the starting day, in month order.
///
/// # Errors
/// - `InvalidArg` if `width` is zero or `threshold` is negative or not finite.
/// - `Data` if the series contains a non-positive value.
pub fn excursions(
    series: &DenseSeries,
    width: usize,
    threshold: f64,
    direction: Direction,
) -> Result<Vec<MonthlyExcursion>, ReconcileError> {
    if width == 0 || !threshold.is_finite() || threshold < 0.0 {
        return Err(ReconcileError::InvalidArg(format!(
            "excursions need width > 0 and threshold >= 0, got {width} and {threshold}"
        )));
    }
    let v = series.values();
    if let Some(bad) = v.iter().find(|x| **x <= 0.0) {
        return Err(ReconcileError::Data(format!(
            "{} has non-positive value {bad}",
            series.name()
        )));
    }

    let mut out: Vec<MonthlyExcursion> = Vec::new();
    for i in 0..v.len().saturating_sub(width) {
        let delta = (v[i + width] / v[i]).log10();
        let qualifies = match direction {
            Direction::Drop => delta < -threshold,
            Direction::Spike => delta > threshold,
        };
        let Some(date) = series.date_at(i) else {
            continue;
        };
        if !qualifies {
            continue;
        }
        let (year, month) = (date.year(), date.month());
        match out.last_mut() {
            Some(last) if last.year == year && last.month == month => {
                let more_extreme = match direction {
                    Direction::Drop => delta < last.delta,
                    Direction::Spike => delta > last.delta,
                };
                if more_extreme {
                    last.delta = delta;
                }
            }
            _ => out.push(MonthlyExcursion { year, month, delta }),
        }
    }
    Ok(out)
}

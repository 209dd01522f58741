//! Output rendering and the shared limit/counter bookkeeping.
//!
//! A scan renders at one of two granularities; the granularity also decides
//! the unit the global limit is counted in. Keeping the mode a tagged
//! choice consumed by one counting loop (see `commands::run_scan`) means
//! the limit check happens at exactly one place per unit.

use tablescan_common::{Cell, Row, RowKey};

/// Output granularity for a table scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// One line per row; the limit counts rows.
    Row,
    /// One line per cell; the limit counts cells.
    Cell,
}

impl RenderMode {
    /// Returns the trailing summary line for this mode.
    #[must_use]
    pub fn summary(self, total: usize) -> String {
        match self {
            RenderMode::Row => format!("Total rows: {total}"),
            RenderMode::Cell => format!("Total cells: {total}"),
        }
    }
}

/// Formats a row-mode line: a running index plus the row rendering.
#[must_use]
pub fn row_line(index: usize, row: &Row) -> String {
    format!("{index}: {row}")
}

/// Formats a cell-mode line with every component rendered as text.
#[must_use]
pub fn cell_line(key: &RowKey, cell: &Cell) -> String {
    format!(
        "Row key: {key}, Column Family: {}, Qualifier: {}, Value: {}",
        cell.family_str(),
        cell.qualifier_str(),
        cell.value_str()
    )
}

/// Emitted-unit counter shared by the listing and scan pipelines.
///
/// The scan pipeline runs with a cap; the listing pipeline counts without
/// one. `record` reports whether the cap has been reached so both nested
/// scan loops can terminate on the same boundary check.
#[derive(Debug)]
pub struct Tally {
    total: usize,
    limit: Option<usize>,
}

impl Tally {
    /// Creates a tally that stops at `limit` units.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            total: 0,
            limit: Some(limit),
        }
    }

    /// Creates a tally that only counts.
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            total: 0,
            limit: None,
        }
    }

    /// Records one emitted unit; returns true when the limit is reached.
    pub fn record(&mut self) -> bool {
        self.total += 1;
        matches!(self.limit, Some(limit) if self.total >= limit)
    }

    /// Returns the number of units recorded so far.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_line() {
        let row = Row::new(
            RowKey::from_bytes(b"k1"),
            vec![Cell::new("info", "name", "Alice")],
        );
        assert_eq!(row_line(0, &row), "0: k1 {info:name=Alice}");
        assert_eq!(row_line(7, &row), "7: k1 {info:name=Alice}");
    }

    #[test]
    fn test_cell_line() {
        let key = RowKey::from_bytes(b"k1");
        let cell = Cell::new("info", "name", "Alice");
        assert_eq!(
            cell_line(&key, &cell),
            "Row key: k1, Column Family: info, Qualifier: name, Value: Alice"
        );
    }

    #[test]
    fn test_summaries() {
        assert_eq!(RenderMode::Row.summary(3), "Total rows: 3");
        assert_eq!(RenderMode::Cell.summary(0), "Total cells: 0");
    }

    #[test]
    fn test_tally_limit() {
        let mut tally = Tally::with_limit(2);
        assert!(!tally.record());
        assert!(tally.record());
        assert_eq!(tally.total(), 2);
    }

    #[test]
    fn test_tally_unbounded() {
        let mut tally = Tally::unbounded();
        for _ in 0..1000 {
            assert!(!tally.record());
        }
        assert_eq!(tally.total(), 1000);
    }
}

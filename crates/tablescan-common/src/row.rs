//! Row and cell result types.
//!
//! A scan yields [`Row`]s; each row is identified by its [`RowKey`] and
//! carries an ordered sequence of [`Cell`]s.

use std::fmt;

use bytes::Bytes;

use crate::keys::RowKey;

/// A single cell within a row.
///
/// Cells are `(family, qualifier, value)` byte tuples scoped to one row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Column family.
    pub family: Bytes,
    /// Column qualifier.
    pub qualifier: Bytes,
    /// Cell value.
    pub value: Bytes,
}

impl Cell {
    /// Creates a new cell.
    pub fn new(
        family: impl Into<Bytes>,
        qualifier: impl Into<Bytes>,
        value: impl Into<Bytes>,
    ) -> Self {
        Self {
            family: family.into(),
            qualifier: qualifier.into(),
            value: value.into(),
        }
    }

    /// Returns the column family as lossy UTF-8.
    #[must_use]
    pub fn family_str(&self) -> String {
        String::from_utf8_lossy(&self.family).into_owned()
    }

    /// Returns the qualifier as lossy UTF-8.
    #[must_use]
    pub fn qualifier_str(&self) -> String {
        String::from_utf8_lossy(&self.qualifier).into_owned()
    }

    /// Returns the value as lossy UTF-8.
    #[must_use]
    pub fn value_str(&self) -> String {
        String::from_utf8_lossy(&self.value).into_owned()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}={}",
            self.family_str(),
            self.qualifier_str(),
            self.value_str()
        )
    }
}

/// A row returned by a scan.
///
/// Identity is the row key; cells are kept in the order the store returned
/// them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    key: RowKey,
    cells: Vec<Cell>,
}

impl Row {
    /// Creates a new row.
    #[must_use]
    pub fn new(key: RowKey, cells: Vec<Cell>) -> Self {
        Self { key, cells }
    }

    /// Returns the row key.
    #[inline]
    #[must_use]
    pub fn key(&self) -> &RowKey {
        &self.key
    }

    /// Returns the cells in store order.
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Returns the number of cells in the row.
    #[inline]
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if the row holds no cells.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.key)?;
        for (i, cell) in self.cells.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{cell}")?;
        }
        write!(f, "}}")
    }
}

//! In-memory cluster for tests and mock mode.
//!
//! Implements [`Cluster`] over a set of `BTreeMap`-backed tables. Sessions
//! are deliberately bounded: each one returns at most the window's batch
//! hint (or a default cap) and then ends, which reproduces the short-lived
//! server scans the resumable cursor exists to paper over. Transport faults
//! can be injected to exercise failure paths.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use bytes::Bytes;
use parking_lot::{Mutex, RwLock};
use regex::Regex;

use tablescan_common::{Cell, Row, RowKey};

use crate::cluster::{Cluster, ListingEntry, ScanSession, TableDescriptor};
use crate::error::{ClientError, ClientResult};
use crate::scan::ScanWindow;

/// Rows per session when the window carries no batch hint.
const DEFAULT_SESSION_ROWS: usize = 1024;

struct TableData {
    families: Vec<String>,
    rows: BTreeMap<Vec<u8>, Vec<Cell>>,
}

/// An in-memory cluster.
///
/// Tables are created and populated through `&self` methods so a cluster
/// can be shared once handed to a [`Connection`](crate::Connection).
pub struct MemoryCluster {
    tables: RwLock<BTreeMap<String, TableData>>,
    master: (String, u16),
    default_session_rows: usize,
    sessions_opened: AtomicUsize,
    fail_next_open: AtomicBool,
    fail_session_after: Mutex<Option<usize>>,
}

impl Default for MemoryCluster {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCluster {
    /// Creates an empty cluster with a fixed master address.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(BTreeMap::new()),
            master: ("localhost".to_string(), 16000),
            default_session_rows: DEFAULT_SESSION_ROWS,
            sessions_opened: AtomicUsize::new(0),
            fail_next_open: AtomicBool::new(false),
            fail_session_after: Mutex::new(None),
        }
    }

    /// Overrides the advertised master address.
    #[must_use]
    pub fn with_master(mut self, host: impl Into<String>, port: u16) -> Self {
        self.master = (host.into(), port);
        self
    }

    /// Overrides the per-session row cap used when no batch hint is given.
    #[must_use]
    pub fn with_default_session_rows(mut self, rows: usize) -> Self {
        self.default_session_rows = rows;
        self
    }

    /// Creates a table with the given column families.
    pub fn create_table(&self, name: impl Into<String>, families: &[&str]) {
        self.tables.write().insert(
            name.into(),
            TableData {
                families: families.iter().map(|f| (*f).to_string()).collect(),
                rows: BTreeMap::new(),
            },
        );
    }

    /// Inserts a cell with string key and value.
    ///
    /// # Errors
    ///
    /// Fails if the table or column family does not exist.
    pub fn put(
        &self,
        table: &str,
        key: &str,
        family: &str,
        qualifier: &str,
        value: &str,
    ) -> ClientResult<()> {
        self.put_bytes(table, key.as_bytes(), family, qualifier, value.as_bytes())
    }

    /// Inserts a cell with raw key and value bytes.
    ///
    /// # Errors
    ///
    /// Fails if the table or column family does not exist.
    pub fn put_bytes(
        &self,
        table: &str,
        key: &[u8],
        family: &str,
        qualifier: &str,
        value: &[u8],
    ) -> ClientResult<()> {
        let mut tables = self.tables.write();
        let data = tables
            .get_mut(table)
            .ok_or_else(|| ClientError::TableNotFound(table.to_string()))?;
        if !data.families.iter().any(|f| f == family) {
            return Err(ClientError::InvalidConfig(format!(
                "unknown column family '{family}' in table '{table}'"
            )));
        }

        let cell = Cell::new(
            Bytes::copy_from_slice(family.as_bytes()),
            Bytes::copy_from_slice(qualifier.as_bytes()),
            Bytes::copy_from_slice(value),
        );
        data.rows.entry(key.to_vec()).or_default().push(cell);
        Ok(())
    }

    /// Makes the next `open_session` fail with a transport error.
    pub fn fail_next_open(&self) {
        self.fail_next_open.store(true, Ordering::SeqCst);
    }

    /// Makes the next opened session fail after serving `rows` rows.
    pub fn fail_session_after(&self, rows: usize) {
        *self.fail_session_after.lock() = Some(rows);
    }

    /// Returns the total number of sessions opened against this cluster.
    #[must_use]
    pub fn sessions_opened(&self) -> usize {
        self.sessions_opened.load(Ordering::SeqCst)
    }
}

impl Cluster for MemoryCluster {
    fn open_session<'a>(
        &'a self,
        table: &str,
        window: &ScanWindow,
    ) -> ClientResult<Box<dyn ScanSession + 'a>> {
        if self.fail_next_open.swap(false, Ordering::SeqCst) {
            return Err(ClientError::Transport(
                "injected session open failure".to_string(),
            ));
        }

        let cap = window.batch_hint.unwrap_or(self.default_session_rows);
        let tables = self.tables.read();
        let data = tables
            .get(table)
            .ok_or_else(|| ClientError::TableNotFound(table.to_string()))?;

        let start = window
            .start
            .as_ref()
            .map_or_else(Vec::new, |key| key.as_bytes().to_vec());
        let rows: Vec<Row> = data
            .rows
            .range(start..)
            .take(cap)
            .map(|(key, cells)| Row::new(RowKey::from_bytes(key), cells.clone()))
            .collect();

        self.sessions_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemorySession {
            rows: rows.into_iter(),
            fail_after: self.fail_session_after.lock().take(),
            served: 0,
        }))
    }

    fn list_tables(
        &self,
        pattern: &Regex,
        with_descriptors: bool,
    ) -> ClientResult<Vec<ListingEntry>> {
        let tables = self.tables.read();
        let entries = tables
            .iter()
            .filter(|(name, _)| pattern.is_match(name))
            .map(|(name, data)| {
                if with_descriptors {
                    ListingEntry::Descriptor(TableDescriptor {
                        name: name.clone(),
                        families: data.families.clone(),
                    })
                } else {
                    ListingEntry::Name(name.clone())
                }
            })
            .collect();
        Ok(entries)
    }

    fn master_address(&self) -> ClientResult<(String, u16)> {
        Ok(self.master.clone())
    }
}

struct MemorySession {
    rows: std::vec::IntoIter<Row>,
    fail_after: Option<usize>,
    served: usize,
}

impl ScanSession for MemorySession {
    fn next(&mut self) -> ClientResult<Option<Row>> {
        if self.fail_after == Some(self.served) {
            return Err(ClientError::Transport(
                "injected session iteration failure".to_string(),
            ));
        }
        match self.rows.next() {
            Some(row) => {
                self.served += 1;
                Ok(Some(row))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sessions_are_bounded() {
        let cluster = MemoryCluster::new();
        cluster.create_table("t", &["f"]);
        for key in ["a", "b", "c", "d"] {
            cluster.put("t", key, "f", "q", "v").unwrap();
        }

        let window = ScanWindow {
            start: None,
            batch_hint: Some(2),
        };
        let mut session = cluster.open_session("t", &window).unwrap();
        assert!(session.next().unwrap().is_some());
        assert!(session.next().unwrap().is_some());
        // bounded: the session ends even though the table has more rows
        assert!(session.next().unwrap().is_none());
    }

    #[test]
    fn test_inclusive_start_boundary() {
        let cluster = MemoryCluster::new();
        cluster.create_table("t", &["f"]);
        cluster.put("t", "a", "f", "q", "v").unwrap();
        cluster.put("t", "b", "f", "q", "v").unwrap();

        let window = ScanWindow {
            start: Some(RowKey::from_bytes(b"b")),
            batch_hint: None,
        };
        let mut session = cluster.open_session("t", &window).unwrap();
        let row = session.next().unwrap().unwrap();
        assert_eq!(row.key().as_bytes(), b"b");
        assert!(session.next().unwrap().is_none());
    }

    #[test]
    fn test_unknown_table() {
        let cluster = MemoryCluster::new();
        let result = cluster.open_session("missing", &ScanWindow::default());
        assert!(matches!(result, Err(ClientError::TableNotFound(_))));
    }

    #[test]
    fn test_unknown_family_rejected() {
        let cluster = MemoryCluster::new();
        cluster.create_table("t", &["f"]);
        let result = cluster.put("t", "a", "nope", "q", "v");
        assert!(matches!(result, Err(ClientError::InvalidConfig(_))));
    }

    #[test]
    fn test_listing_filter_and_order() {
        let cluster = MemoryCluster::new();
        cluster.create_table("orders", &["info"]);
        cluster.create_table("order_items", &["info"]);
        cluster.create_table("users", &["info"]);

        let pattern = Regex::new("^order").unwrap();
        let entries = cluster.list_tables(&pattern, false).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.table_name().to_string()).collect();
        assert_eq!(names, vec!["order_items", "orders"]);
    }

    #[test]
    fn test_listing_descriptors() {
        let cluster = MemoryCluster::new();
        cluster.create_table("orders", &["info", "audit"]);

        let pattern = Regex::new(".*").unwrap();
        let entries = cluster.list_tables(&pattern, true).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].to_string(),
            "'orders', {NAME => 'info'}, {NAME => 'audit'}"
        );
    }
}

//! The resumable scan cursor.
//!
//! Server-side scan sessions are bounded: a session may end after any
//! number of rows, and the client cannot tell whether it ended because the
//! table was exhausted or because the server cut it off. [`RowStream`]
//! stitches a sequence of such sessions into one continuous, globally
//! ordered stream of rows.
//!
//! The load-bearing trick is the start boundary of each follow-up session.
//! The store's native scan primitive only supports an *inclusive* start, so
//! the engine starts each new session at the immediate successor of the
//! last observed key: the key with a single `0x00` byte appended (see
//! [`RowKey::scan_successor`]). That is the smallest key strictly greater
//! than the last one, which makes the inclusive start behave exclusively
//! and guarantees no row is yielded twice.

use tracing::{debug, trace};

use tablescan_common::{Row, RowKey};

use crate::cluster::{Connection, ScanSession};
use crate::error::ClientResult;

/// Request descriptor for one scan session.
///
/// A window is constructed fresh for every session and never reused: the
/// start boundary is derived from client-observed state only, so a new
/// session never inherits a server-held cursor token.
#[derive(Debug, Clone, Default)]
pub struct ScanWindow {
    /// Inclusive start key, or `None` to start at the beginning of the
    /// table.
    pub start: Option<RowKey>,
    /// Upper-bound suggestion for rows per session, or `None` for the
    /// transport default. A hint, not a contract.
    pub batch_hint: Option<usize>,
}

/// A lazy, finite stream of rows spanning any number of scan sessions.
///
/// The stream owns its cursor (`last_seen` key) exclusively; nothing is
/// shared across invocations, so one connection can back many scans
/// without cross-contamination. It applies no row limit of its own —
/// consumers truncate by dropping the iterator, which also stops the scan
/// mid-session.
///
/// Transport errors are yielded once, after which the stream is fused.
///
/// # Example
///
/// ```rust
/// use tablescan_client::{Connection, ConnectionConfig, MemoryCluster, RowStream};
///
/// let cluster = MemoryCluster::new();
/// cluster.create_table("orders", &["info"]);
/// cluster.put("orders", "a", "info", "qty", "1").unwrap();
/// cluster.put("orders", "b", "info", "qty", "2").unwrap();
///
/// let conn = Connection::open(ConnectionConfig::default(), Box::new(cluster)).unwrap();
/// let rows: Vec<_> = RowStream::new(&conn, "orders", None)
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(rows.len(), 2);
/// ```
pub struct RowStream<'a> {
    conn: &'a Connection,
    table: String,
    batch_hint: Option<usize>,
    last_seen: Option<RowKey>,
    session: Option<Box<dyn ScanSession + 'a>>,
    rows_in_session: usize,
    sessions_opened: usize,
    finished: bool,
}

impl<'a> RowStream<'a> {
    /// Creates a stream over `table`.
    ///
    /// No session is opened until the first call to `next`.
    pub fn new(conn: &'a Connection, table: impl Into<String>, batch_hint: Option<usize>) -> Self {
        Self {
            conn,
            table: table.into(),
            batch_hint,
            last_seen: None,
            session: None,
            rows_in_session: 0,
            sessions_opened: 0,
            finished: false,
        }
    }

    /// Returns the number of sessions opened so far.
    ///
    /// A full scan of a non-empty table opens one session per batch plus a
    /// final empty session that signals exhaustion.
    #[must_use]
    pub fn sessions_opened(&self) -> usize {
        self.sessions_opened
    }

    /// Returns the key of the most recently yielded row.
    #[must_use]
    pub fn last_seen(&self) -> Option<&RowKey> {
        self.last_seen.as_ref()
    }

    fn open_next_session(&mut self) -> ClientResult<()> {
        let window = ScanWindow {
            start: self.last_seen.as_ref().map(RowKey::scan_successor),
            batch_hint: self.batch_hint,
        };
        if let Some(start) = &window.start {
            debug!(table = %self.table, start = %start, "resuming scan");
        }

        self.session = Some(self.conn.open_session(&self.table, &window)?);
        self.sessions_opened += 1;
        self.rows_in_session = 0;
        Ok(())
    }

    fn close_session(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.close();
        }
    }
}

impl Iterator for RowStream<'_> {
    type Item = ClientResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.finished {
                return None;
            }

            if self.session.is_none() {
                if let Err(err) = self.open_next_session() {
                    self.finished = true;
                    return Some(Err(err));
                }
            }

            let step = match self.session.as_mut() {
                Some(session) => session.next(),
                None => continue,
            };

            match step {
                Ok(Some(row)) => {
                    self.last_seen = Some(row.key().clone());
                    self.rows_in_session += 1;
                    trace!(table = %self.table, key = %row.key(), "row yielded");
                    return Some(Ok(row));
                }
                Ok(None) => {
                    self.close_session();
                    if self.rows_in_session == 0 {
                        // Only an empty session proves exhaustion. A session
                        // that returned rows and ended may have hit a
                        // server-imposed bound, so the engine always probes
                        // again after a non-empty one.
                        self.finished = true;
                        debug!(
                            table = %self.table,
                            sessions = self.sessions_opened,
                            "scan exhausted"
                        );
                        return None;
                    }
                }
                Err(err) => {
                    self.close_session();
                    self.finished = true;
                    return Some(Err(err));
                }
            }
        }
    }
}

impl Drop for RowStream<'_> {
    fn drop(&mut self) {
        self.close_session();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConnectionConfig;
    use crate::memory::MemoryCluster;

    fn connection_with_rows(keys: &[&[u8]]) -> Connection {
        let cluster = MemoryCluster::new();
        cluster.create_table("t", &["f"]);
        for key in keys {
            cluster.put_bytes("t", key, "f", "q", b"v").unwrap();
        }
        Connection::open(ConnectionConfig::default(), Box::new(cluster)).unwrap()
    }

    fn collect_keys(stream: RowStream<'_>) -> Vec<Vec<u8>> {
        stream
            .map(|row| row.unwrap().key().as_bytes().to_vec())
            .collect()
    }

    #[test]
    fn test_empty_table_opens_one_session() {
        let conn = connection_with_rows(&[]);
        let mut stream = RowStream::new(&conn, "t", None);
        assert!(stream.next().is_none());
        assert_eq!(stream.sessions_opened(), 1);
        // fused
        assert!(stream.next().is_none());
        assert_eq!(stream.sessions_opened(), 1);
    }

    #[test]
    fn test_single_session_scan() {
        let conn = connection_with_rows(&[b"a", b"b", b"c"]);
        let mut stream = RowStream::new(&conn, "t", None);
        let keys: Vec<_> = (&mut stream).map(|r| r.unwrap()).collect();
        assert_eq!(keys.len(), 3);
        // one full batch plus the empty probe
        assert_eq!(stream.sessions_opened(), 2);
    }

    #[test]
    fn test_resume_uses_successor_boundary() {
        let conn = connection_with_rows(&[&[0x41, 0x42], &[0x41, 0x42, 0x00], &[0x43]]);
        // batch hint of 1 forces a resume after every row
        let keys = collect_keys(RowStream::new(&conn, "t", Some(1)));
        // the successor of [0x41,0x42] is [0x41,0x42,0x00], which must be
        // yielded (inclusive start) while [0x41,0x42] is never re-yielded
        assert_eq!(
            keys,
            vec![
                vec![0x41, 0x42],
                vec![0x41, 0x42, 0x00],
                vec![0x43],
            ]
        );
    }

    #[test]
    fn test_resume_after_0xff_key() {
        let conn = connection_with_rows(&[&[0xFF], &[0xFF, 0x00], &[0xFF, 0x01]]);
        let keys = collect_keys(RowStream::new(&conn, "t", Some(1)));
        assert_eq!(keys, vec![vec![0xFF], vec![0xFF, 0x00], vec![0xFF, 0x01]]);
    }

    #[test]
    fn test_always_probes_after_nonempty_session() {
        let conn = connection_with_rows(&[b"a", b"ab", b"b"]);
        let mut stream = RowStream::new(&conn, "t", Some(1));
        let keys: Vec<_> = (&mut stream)
            .map(|r| r.unwrap().key().to_string())
            .collect();
        assert_eq!(keys, vec!["a", "ab", "b"]);
        // one session per row plus the terminating empty session
        assert_eq!(stream.sessions_opened(), 4);
    }

    #[test]
    fn test_keys_strictly_increasing_across_sessions() {
        let keys: Vec<&[u8]> = vec![b"a", b"aa", b"ab", b"b", b"ba", b"c", b"ca"];
        let conn = connection_with_rows(&keys);
        let yielded = collect_keys(RowStream::new(&conn, "t", Some(2)));
        assert_eq!(yielded.len(), keys.len());
        for pair in yielded.windows(2) {
            assert!(pair[0] < pair[1], "keys must be strictly increasing");
        }
    }

    #[test]
    fn test_unknown_table_errors_and_fuses() {
        let conn = connection_with_rows(&[b"a"]);
        let mut stream = RowStream::new(&conn, "missing", None);
        assert!(stream.next().unwrap().is_err());
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_open_fault_is_fatal() {
        let cluster = MemoryCluster::new();
        cluster.create_table("t", &["f"]);
        cluster.put("t", "a", "f", "q", "v").unwrap();
        cluster.fail_next_open();
        let conn = Connection::open(ConnectionConfig::default(), Box::new(cluster)).unwrap();

        let mut stream = RowStream::new(&conn, "t", None);
        assert!(stream.next().unwrap().is_err());
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_mid_session_fault_preserves_earlier_rows() {
        let cluster = MemoryCluster::new();
        cluster.create_table("t", &["f"]);
        for key in [b"a", b"b", b"c"] {
            cluster.put_bytes("t", key, "f", "q", b"v").unwrap();
        }
        cluster.fail_session_after(2);
        let conn = Connection::open(ConnectionConfig::default(), Box::new(cluster)).unwrap();

        let mut stream = RowStream::new(&conn, "t", None);
        assert!(stream.next().unwrap().is_ok());
        assert!(stream.next().unwrap().is_ok());
        assert!(stream.next().unwrap().is_err());
        assert!(stream.next().is_none());
    }
}

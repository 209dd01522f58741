//! Cluster collaborator traits and the connection handle.
//!
//! The wire protocol is not owned by this crate. Everything the scanner
//! needs from the store sits behind [`Cluster`] and [`ScanSession`], so the
//! engine and pipelines can be exercised against any implementation; the
//! in-memory cluster in [`crate::memory`] is the one shipped here.

use std::fmt;

use regex::Regex;
use tracing::{debug, info};

use tablescan_common::Row;

use crate::config::ConnectionConfig;
use crate::error::{ClientError, ClientResult};
use crate::scan::ScanWindow;

/// One bounded server-side scan exchange.
///
/// A session covers a contiguous key range and returns a finite number of
/// rows before ending; it cannot be restarted. `next` blocks until the next
/// row is available or the session ends.
pub trait ScanSession {
    /// Returns the next row, or `None` when the session has ended.
    fn next(&mut self) -> ClientResult<Option<Row>>;

    /// Releases server-side resources held by the session.
    fn close(&mut self) {}
}

/// Administrative and scan capabilities of a cluster.
pub trait Cluster {
    /// Opens a bounded scan session over `table` for the given window.
    fn open_session<'a>(
        &'a self,
        table: &str,
        window: &ScanWindow,
    ) -> ClientResult<Box<dyn ScanSession + 'a>>;

    /// Lists tables whose name matches `pattern`, in catalog order.
    fn list_tables(
        &self,
        pattern: &Regex,
        with_descriptors: bool,
    ) -> ClientResult<Vec<ListingEntry>>;

    /// Returns the address of the coordinating master service.
    fn master_address(&self) -> ClientResult<(String, u16)>;
}

/// Full descriptor metadata for a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescriptor {
    /// Table name.
    pub name: String,
    /// Column family names.
    pub families: Vec<String>,
}

impl fmt::Display for TableDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.name)?;
        for family in &self.families {
            write!(f, ", {{NAME => '{family}'}}")?;
        }
        Ok(())
    }
}

/// One entry returned by a catalog listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingEntry {
    /// Bare table identifier.
    Name(String),
    /// Full table descriptor.
    Descriptor(TableDescriptor),
}

impl ListingEntry {
    /// Returns the table name the entry refers to.
    #[must_use]
    pub fn table_name(&self) -> &str {
        match self {
            ListingEntry::Name(name) => name,
            ListingEntry::Descriptor(descriptor) => &descriptor.name,
        }
    }
}

impl fmt::Display for ListingEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListingEntry::Name(name) => write!(f, "{name}"),
            ListingEntry::Descriptor(descriptor) => write!(f, "{descriptor}"),
        }
    }
}

/// An open connection to a cluster.
///
/// The connection is acquired once and released exactly once. Dropping an
/// unclosed connection releases it; `close` is idempotent. All operations
/// after `close` fail with [`ClientError::ConnectionClosed`].
pub struct Connection {
    cluster: Box<dyn Cluster>,
    config: ConnectionConfig,
    master: (String, u16),
    closed: bool,
}

impl Connection {
    /// Opens a connection against the given cluster transport.
    ///
    /// The master address is resolved eagerly so that an unreachable
    /// cluster fails here rather than mid-pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidConfig`] for an empty quorum and
    /// [`ClientError::Transport`] if the master cannot be resolved.
    pub fn open(config: ConnectionConfig, cluster: Box<dyn Cluster>) -> ClientResult<Self> {
        if config.quorum.trim().is_empty() {
            return Err(ClientError::InvalidConfig(
                "zookeeper quorum must not be empty".to_string(),
            ));
        }

        let master = cluster.master_address()?;
        info!(
            quorum = %config.quorum_address(),
            znode = %config.znode,
            master = %format!("{}:{}", master.0, master.1),
            "connected to cluster"
        );

        Ok(Self {
            cluster,
            config,
            master,
            closed: false,
        })
    }

    /// Returns the connection configuration.
    #[must_use]
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Returns the master address resolved at open time.
    #[must_use]
    pub fn master_address(&self) -> (String, u16) {
        self.master.clone()
    }

    /// Opens a bounded scan session over `table`.
    ///
    /// # Errors
    ///
    /// Propagates transport failures from the cluster; fails with
    /// [`ClientError::ConnectionClosed`] after `close`.
    pub fn open_session<'a>(
        &'a self,
        table: &str,
        window: &ScanWindow,
    ) -> ClientResult<Box<dyn ScanSession + 'a>> {
        self.ensure_open()?;
        self.cluster.open_session(table, window)
    }

    /// Lists tables matching `pattern` in catalog order.
    ///
    /// # Errors
    ///
    /// Propagates transport failures from the cluster; fails with
    /// [`ClientError::ConnectionClosed`] after `close`.
    pub fn list_tables(
        &self,
        pattern: &Regex,
        with_descriptors: bool,
    ) -> ClientResult<Vec<ListingEntry>> {
        self.ensure_open()?;
        self.cluster.list_tables(pattern, with_descriptors)
    }

    /// Closes the connection. Idempotent.
    ///
    /// # Errors
    ///
    /// Currently infallible; kept fallible so transports that must flush
    /// on release can surface failures.
    pub fn close(&mut self) -> ClientResult<()> {
        if !self.closed {
            self.closed = true;
            debug!(quorum = %self.config.quorum_address(), "connection closed");
        }
        Ok(())
    }

    /// Returns true if the connection has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn ensure_open(&self) -> ClientResult<()> {
        if self.closed {
            return Err(ClientError::ConnectionClosed);
        }
        Ok(())
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("quorum", &self.config.quorum_address())
            .field("znode", &self.config.znode)
            .field("closed", &self.closed)
            .finish()
    }
}

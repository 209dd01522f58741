//! # tablescan-client
//!
//! Client library for scanning tables in HBase-compatible clusters.
//!
//! The store's server-side scan sessions are bounded in lifetime, so no
//! single session can deliver an unbounded stream of rows. This crate
//! provides:
//!
//! - **Collaborator traits**: [`Cluster`] and [`ScanSession`], the seam the
//!   wire protocol plugs into
//! - **Connection management**: [`Connection`], acquired once and released
//!   exactly once
//! - **The resumable cursor**: [`RowStream`], which stitches bounded
//!   sessions into one continuous, globally ordered scan
//! - **An in-memory cluster**: [`MemoryCluster`], backing tests and the
//!   CLI's mock mode
//!
//! ## Quick start
//!
//! ```rust
//! use tablescan_client::{Connection, ConnectionConfig, MemoryCluster, RowStream};
//!
//! let cluster = MemoryCluster::new();
//! cluster.create_table("orders", &["info"]);
//! cluster.put("orders", "o-1", "info", "qty", "3").unwrap();
//!
//! let conn = Connection::open(ConnectionConfig::default(), Box::new(cluster)).unwrap();
//! for row in RowStream::new(&conn, "orders", None) {
//!     let row = row.unwrap();
//!     println!("{row}");
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cluster;
pub mod config;
pub mod error;
pub mod memory;
pub mod scan;

pub use cluster::{Cluster, Connection, ListingEntry, ScanSession, TableDescriptor};
pub use config::ConnectionConfig;
pub use error::{ClientError, ClientResult};
pub use memory::MemoryCluster;
pub use scan::{RowStream, ScanWindow};

// The listing pattern type is part of the public trait surface.
pub use regex::Regex;

//! # tablescan-common
//!
//! Core data types shared by the tablescan client library and CLI.
//!
//! This crate models the units a sorted, distributed key-value store hands
//! back to a scanning client:
//!
//! - **Keys**: [`RowKey`], an opaque byte sequence ordered lexicographically
//! - **Rows**: [`Row`], a key plus its ordered [`Cell`]s
//!
//! ## Example
//!
//! ```rust
//! use tablescan_common::{Cell, Row, RowKey};
//!
//! let row = Row::new(
//!     RowKey::from_bytes(b"user:1234"),
//!     vec![Cell::new("info", "name", "Alice")],
//! );
//! assert_eq!(row.cell_count(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod keys;
pub mod row;

pub use keys::RowKey;
pub use row::{Cell, Row};

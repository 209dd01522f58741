//! Error types for the client library.

use thiserror::Error;

/// Client error type.
///
/// Transport failures are terminal: nothing in this library retries them.
/// Retry and backoff, where they exist at all, belong to the underlying
/// cluster transport.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Failure communicating with the cluster (connection, session open,
    /// session iteration, or catalog listing).
    #[error("transport error: {0}")]
    Transport(String),

    /// The connection has been closed.
    #[error("connection closed")]
    ConnectionClosed,

    /// The named table does not exist.
    #[error("table not found: {0}")]
    TableNotFound(String),

    /// Invalid connection configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

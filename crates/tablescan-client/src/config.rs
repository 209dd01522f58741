//! Connection configuration.
//!
//! Everything here is handed opaquely to the cluster transport; the scan
//! engine itself enforces no timeouts and performs no retries.

use std::time::Duration;

/// Configuration for a cluster connection.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// ZooKeeper quorum hosts.
    pub quorum: String,
    /// ZooKeeper client port.
    pub port: u16,
    /// Root znode of the cluster.
    pub znode: String,
    /// Pause between client retries.
    pub client_pause: Duration,
    /// Number of client retries.
    pub client_retries: u32,
    /// Scanner lease timeout.
    pub scanner_timeout: Duration,
    /// RPC timeout.
    pub rpc_timeout: Duration,
    /// ZooKeeper session timeout.
    pub zk_session_timeout: Duration,
    /// ZooKeeper recovery retries.
    pub zk_recovery_retries: u32,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            quorum: "localhost".to_string(),
            port: 2181,
            znode: "/hbase".to_string(),
            client_pause: Duration::from_millis(1000),
            client_retries: 2,
            scanner_timeout: Duration::from_millis(10_000),
            rpc_timeout: Duration::from_millis(10_000),
            zk_session_timeout: Duration::from_millis(10_000),
            zk_recovery_retries: 1,
        }
    }
}

impl ConnectionConfig {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the ZooKeeper quorum.
    #[must_use]
    pub fn quorum(mut self, quorum: impl Into<String>) -> Self {
        self.quorum = quorum.into();
        self
    }

    /// Sets the ZooKeeper client port.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the root znode.
    #[must_use]
    pub fn znode(mut self, znode: impl Into<String>) -> Self {
        self.znode = znode.into();
        self
    }

    /// Sets the RPC timeout.
    #[must_use]
    pub fn rpc_timeout(mut self, timeout: Duration) -> Self {
        self.rpc_timeout = timeout;
        self
    }

    /// Sets the scanner lease timeout.
    #[must_use]
    pub fn scanner_timeout(mut self, timeout: Duration) -> Self {
        self.scanner_timeout = timeout;
        self
    }

    /// Returns the quorum connection string.
    #[must_use]
    pub fn quorum_address(&self) -> String {
        format!("{}:{}", self.quorum, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConnectionConfig::default();
        assert_eq!(config.quorum, "localhost");
        assert_eq!(config.port, 2181);
        assert_eq!(config.znode, "/hbase");
        assert_eq!(config.client_retries, 2);
        assert_eq!(config.rpc_timeout, Duration::from_millis(10_000));
    }

    #[test]
    fn test_builder() {
        let config = ConnectionConfig::new()
            .quorum("zk1.example.com")
            .port(2182)
            .znode("/hbase-prod");

        assert_eq!(config.quorum, "zk1.example.com");
        assert_eq!(config.port, 2182);
        assert_eq!(config.znode, "/hbase-prod");
        assert_eq!(config.quorum_address(), "zk1.example.com:2182");
    }
}

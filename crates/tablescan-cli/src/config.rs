//! Configuration file support for the CLI.
//!
//! Loads connection defaults from TOML files; command-line flags override
//! whatever the file provides.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// ZooKeeper quorum hosts.
    #[serde(default = "default_quorum")]
    pub zk_quorum: String,

    /// ZooKeeper client port.
    #[serde(default = "default_zk_port")]
    pub zk_port: u16,

    /// Root znode of the cluster.
    #[serde(default = "default_znode")]
    pub znode: String,

    /// Default global row/cell limit.
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Default batch-size hint for scan sessions.
    #[serde(default)]
    pub batch_size: Option<usize>,
}

fn default_quorum() -> String {
    "localhost".to_string()
}

fn default_zk_port() -> u16 {
    2181
}

fn default_znode() -> String {
    "/hbase".to_string()
}

fn default_limit() -> usize {
    100
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            zk_quorum: default_quorum(),
            zk_port: default_zk_port(),
            znode: default_znode(),
            limit: default_limit(),
            batch_size: None,
        }
    }
}

impl CliConfig {
    /// Loads configuration from a file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }

    /// Loads the default configuration file.
    ///
    /// Looks in the following locations:
    /// 1. `~/.config/tablescan/config.toml`
    /// 2. `~/.tablescan/config.toml`
    /// 3. Returns defaults if neither exists
    pub fn load_default() -> Result<Self> {
        if let Some(config_dir) = dirs::config_dir() {
            let path = config_dir.join("tablescan").join("config.toml");
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        if let Some(home) = dirs::home_dir() {
            let path = home.join(".tablescan").join("config.toml");
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }
}

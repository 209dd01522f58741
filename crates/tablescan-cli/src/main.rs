//! Tablescan command-line interface.
//!
//! Lists and scans tables in an HBase-compatible cluster.
//!
//! # Usage
//!
//! ```bash
//! # List all tables
//! tablescan --list
//!
//! # List tables matching a pattern, with full descriptors
//! tablescan --list=^order -d
//!
//! # Scan a table, 100 rows by default
//! tablescan --table orders
//!
//! # Scan cell by cell with a small session batch
//! tablescan --table orders --cell -b 10 --limit 500
//! ```

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Parser};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use tablescan_client::{Connection, ConnectionConfig, MemoryCluster, Regex};

mod commands;
mod config;
mod formatter;

use config::CliConfig;
use formatter::RenderMode;

/// Tablescan command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "tablescan",
    version,
    about = "List and scan tables in an HBase-compatible cluster",
    group(ArgGroup::new("mode").required(true).args(["list", "table"])),
    // `requires` pointing directly at `list` is waived by clap whenever
    // `--table` satisfies the "mode" group, so route it through a
    // single-member group instead.
    group(ArgGroup::new("listing").args(["list"]))
)]
struct Args {
    /// List tables, optionally filtered by a regex pattern
    #[arg(
        short = 'l',
        long,
        value_name = "PATTERN",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = ".*"
    )]
    list: Option<String>,

    /// Table to scan
    #[arg(short = 't', long, value_name = "NAME")]
    table: Option<String>,

    /// Display full descriptors when listing
    #[arg(short = 'd', long, requires = "listing")]
    descriptors: bool,

    /// Emit one line per cell instead of one line per row
    #[arg(short = 'c', long)]
    cell: bool,

    /// Rows per server scan session (transport default when omitted)
    #[arg(short = 'b', long = "batchSize", value_name = "N")]
    batch_size: Option<usize>,

    /// Global row (or cell) limit (default: 100)
    #[arg(long, value_name = "N")]
    limit: Option<usize>,

    /// ZooKeeper quorum (default: localhost)
    #[arg(long = "zkQuorum", value_name = "HOSTS")]
    zk_quorum: Option<String>,

    /// ZooKeeper port (default: 2181)
    #[arg(long = "zkPort", value_name = "PORT")]
    zk_port: Option<u16>,

    /// Cluster znode (default: /hbase)
    #[arg(long = "znode", value_name = "PATH")]
    znode: Option<String>,

    /// Enable verbose output
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Configuration file path
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Run against a seeded in-memory cluster (no server connection)
    #[arg(long, hide = true)]
    mock: bool,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // --help and --version print and exit 0; real argument errors
            // exit 1 before any pipeline runs
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    init_logging(args.verbose);

    let file_config = load_config(&args)?;
    let limit = args.limit.unwrap_or(file_config.limit);
    if limit == 0 {
        bail!("--limit must be a positive integer");
    }
    let batch_hint = args.batch_size.or(file_config.batch_size);
    if batch_hint == Some(0) {
        bail!("--batchSize must be a positive integer");
    }

    // Argument validation happens before any connection is made.
    let pattern = args
        .list
        .as_deref()
        .map(|p| Regex::new(p).with_context(|| format!("invalid table pattern '{p}'")))
        .transpose()?;

    let conn_config = ConnectionConfig::new()
        .quorum(args.zk_quorum.clone().unwrap_or(file_config.zk_quorum))
        .port(args.zk_port.unwrap_or(file_config.zk_port))
        .znode(args.znode.clone().unwrap_or(file_config.znode));

    let cluster = build_cluster(&args, &conn_config)?;
    let mut conn = Connection::open(conn_config, cluster)?;
    let (master_host, master_port) = conn.master_address();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match (&pattern, &args.table) {
        (Some(pattern), _) => {
            commands::run_list(&conn, pattern, args.descriptors, &mut out)?;
        }
        (None, Some(table)) => {
            let mode = if args.cell {
                RenderMode::Cell
            } else {
                RenderMode::Row
            };
            commands::run_scan(&conn, table, mode, batch_hint, limit, &mut out)?;
        }
        // unreachable behind the required arg group
        (None, None) => bail!("missing required option: --list or --table"),
    }

    out.flush()?;
    conn.close()?;
    println!("Master address: {master_host}:{master_port}");
    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("tablescan_cli=debug,tablescan_client=debug")
    } else {
        EnvFilter::new("tablescan_cli=warn,tablescan_client=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &Args) -> Result<CliConfig> {
    match &args.config {
        Some(path) => {
            debug!(path = %path.display(), "loading config file");
            CliConfig::from_file(path)
        }
        None => CliConfig::load_default(),
    }
}

fn build_cluster(
    args: &Args,
    config: &ConnectionConfig,
) -> Result<Box<dyn tablescan_client::Cluster>> {
    if args.mock {
        return Ok(Box::new(mock_cluster()));
    }

    // The wire protocol lives behind the Cluster trait; a native transport
    // for live clusters plugs in there. Until one lands, only the
    // in-memory cluster is available.
    bail!(
        "no transport available for cluster at {}; rerun with --mock",
        config.quorum_address()
    )
}

/// Seeded in-memory cluster backing `--mock`.
fn mock_cluster() -> MemoryCluster {
    let cluster = MemoryCluster::new();

    cluster.create_table("orders", &["info"]);
    for (key, qty) in [("o-1001", "3"), ("o-1002", "1"), ("o-1003", "7")] {
        let _ = cluster.put("orders", key, "info", "qty", qty);
    }

    cluster.create_table("users", &["info", "login"]);
    for (key, name) in [("u-1", "alice"), ("u-2", "bob")] {
        let _ = cluster.put("users", key, "info", "name", name);
        let _ = cluster.put("users", key, "login", "count", "0");
    }

    cluster
}

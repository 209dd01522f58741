//! The listing and scan pipelines.
//!
//! Both write incrementally to a sink and end with a `---` separator and a
//! total-count summary. The summary is only reached on a clean run; output
//! already emitted before a transport failure stands.

use std::io::Write;

use anyhow::Result;
use tracing::debug;

use tablescan_client::{Connection, Regex, RowStream};

use crate::formatter::{self, RenderMode, Tally};

/// Lists tables matching `pattern`, one line per entry plus a count.
pub fn run_list(
    conn: &Connection,
    pattern: &Regex,
    with_descriptors: bool,
    out: &mut impl Write,
) -> Result<()> {
    let entries = conn.list_tables(pattern, with_descriptors)?;

    let mut tally = Tally::unbounded();
    for entry in &entries {
        writeln!(out, "{entry}")?;
        tally.record();
    }

    writeln!(out, "---")?;
    writeln!(out, "Total tables: {}", tally.total())?;
    Ok(())
}

/// Scans `table` through the resumable cursor, rendering in `mode` and
/// stopping once `limit` units (rows or cells) have been emitted.
pub fn run_scan(
    conn: &Connection,
    table: &str,
    mode: RenderMode,
    batch_hint: Option<usize>,
    limit: usize,
    out: &mut impl Write,
) -> Result<()> {
    let mut tally = Tally::with_limit(limit);
    let mut stream = RowStream::new(conn, table, batch_hint);

    // One counting loop for both modes: the limit check is the single exit
    // for the row loop and, in cell mode, the inner cell loop as well.
    // Breaking stops the engine at that exact point; no further session is
    // opened and the current one is dropped mid-batch.
    'scan: for row in &mut stream {
        let row = row?;
        match mode {
            RenderMode::Row => {
                writeln!(out, "{}", formatter::row_line(tally.total(), &row))?;
                if tally.record() {
                    break 'scan;
                }
            }
            RenderMode::Cell => {
                for cell in row.cells() {
                    writeln!(out, "{}", formatter::cell_line(row.key(), cell))?;
                    if tally.record() {
                        break 'scan;
                    }
                }
            }
        }
    }

    debug!(
        table,
        sessions = stream.sessions_opened(),
        emitted = tally.total(),
        "scan pipeline finished"
    );

    writeln!(out, "---")?;
    writeln!(out, "{}", mode.summary(tally.total()))?;
    Ok(())
}

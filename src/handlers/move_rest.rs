//! Handler for the `move` command.

use super::rest::{note_orphaned_anchor, print_recorded};
use anyhow::Result;
use colored::Colorize;
use folga::engine::config::Config;
use folga::engine::cycle::CycleTracker;
use folga::engine::db::Db;
use folga::engine::repo::WorkerRepo;
use folga::engine::types::{parse_date, span_end};

/// Replaces a rest interval with new dates for the same worker.
///
/// # Errors
/// Returns error if the interval is unknown, a date is malformed, the span is
/// inverted, or the database write fails.
pub fn handle(config: &Config, id: i64, start: &str, end: Option<&str>, days: u32) -> Result<()> {
    let start = parse_date("start", start)?;
    let end = end.map(|e| parse_date("end", e)).transpose()?;
    let end = span_end(start, end, days)?;

    let conn = Db::connect(&config.db_path)?;
    let rest = CycleTracker::new(&conn).move_rest(id, start, end, config.today())?;
    let worker = WorkerRepo::new(&conn).get(rest.worker_id)?;

    println!("   {} replaced rest [{}]", "↺".cyan(), id);
    print_recorded(&rest, &worker.name);
    note_orphaned_anchor(&conn, worker.id)?;
    Ok(())
}

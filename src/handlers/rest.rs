//! Handler for the `rest` command.

use anyhow::Result;
use colored::Colorize;
use folga::engine::config::Config;
use folga::engine::cycle::{anchor_is_backed, CycleTracker};
use folga::engine::db::Db;
use folga::engine::repo::{IntervalRepo, WorkerRepo};
use folga::engine::resolver::WorkerResolver;
use folga::engine::types::{parse_date, span_end, RestInterval};
use folga::engine::views::format_last_rest;
use rusqlite::Connection;

/// Records a rest interval for a worker.
///
/// # Errors
/// Returns error if the worker is unknown, a date is malformed, the span is
/// inverted, or the database write fails.
pub fn handle(
    config: &Config,
    worker_ref: &str,
    start: &str,
    end: Option<&str>,
    days: u32,
) -> Result<()> {
    let start = parse_date("start", start)?;
    let end = end.map(|e| parse_date("end", e)).transpose()?;
    let end = span_end(start, end, days)?;

    let conn = Db::connect(&config.db_path)?;
    let worker = WorkerResolver::new(&conn).resolve(worker_ref)?.worker;

    let today = config.today();
    let rest = CycleTracker::new(&conn).record_rest(worker.id, start, end, today)?;
    let updated = WorkerRepo::new(&conn).get(worker.id)?;

    print_recorded(&rest, &updated.name);
    if updated.last_rest_end != worker.last_rest_end {
        if let Some(anchor) = updated.last_rest_end {
            println!("   {} last rest end is now {}", "→".cyan(), anchor);
        }
    }
    Ok(())
}

pub(crate) fn print_recorded(rest: &RestInterval, name: &str) {
    let days = (rest.end - rest.start).num_days() + 1;
    println!(
        "{} Rest [{}] for {}: {} → {} ({} days)",
        "✓".green(),
        rest.id.to_string().yellow(),
        name,
        rest.start,
        rest.end,
        days
    );
}

/// Notes when a worker's last rest end no longer matches any stored rest.
pub(crate) fn note_orphaned_anchor(conn: &Connection, worker_id: i64) -> Result<()> {
    let worker = WorkerRepo::new(conn).get(worker_id)?;
    let history = IntervalRepo::new(conn).list(Some(worker_id))?;
    if !anchor_is_backed(worker.last_rest_end, &history) {
        tracing::warn!(worker_id, "last rest end no longer backed by a rest interval");
        println!(
            "   {} {} keeps last rest end {}, which no longer matches a recorded rest",
            "note:".yellow(),
            worker.name,
            format_last_rest(worker.last_rest_end)
        );
    }
    Ok(())
}

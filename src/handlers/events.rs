//! Handler for the `events` command.

use anyhow::Result;
use folga::engine::config::Config;
use folga::engine::cycle::CycleTracker;
use folga::engine::db::Db;
use folga::engine::repo::{IntervalRepo, WorkerRepo};
use folga::engine::resolver::WorkerResolver;
use folga::engine::views::{build_events, EventFilter};
use rusqlite::Connection;

/// Prints rest and projected work events as calendar JSON.
///
/// # Errors
/// Returns error if the worker filter does not resolve or a query fails.
pub fn handle(
    config: &Config,
    worker_ref: Option<&str>,
    fuzzy: bool,
    rest: bool,
    work: bool,
) -> Result<()> {
    let conn = Db::connect(&config.db_path)?;
    let today = config.today();
    CycleTracker::new(&conn).sync(today)?;

    let worker_id = worker_ref
        .map(|r| resolver(&conn, fuzzy).resolve(r).map(|res| res.worker.id))
        .transpose()?;

    let workers = WorkerRepo::new(&conn).list_active()?;
    let intervals = IntervalRepo::new(&conn).list_for_active_workers(worker_id)?;

    let filter = EventFilter {
        worker_id,
        rest,
        work,
    };
    let events = build_events(&workers, &intervals, today, config.window, filter);

    println!("{}", serde_json::to_string_pretty(&events)?);
    Ok(())
}

pub(crate) fn resolver(conn: &Connection, fuzzy: bool) -> WorkerResolver<'_> {
    if fuzzy {
        WorkerResolver::fuzzy(conn)
    } else {
        WorkerResolver::new(conn)
    }
}

//! Handler for the `resources` command.

use anyhow::Result;
use folga::engine::config::Config;
use folga::engine::cycle::CycleTracker;
use folga::engine::db::Db;
use folga::engine::repo::WorkerRepo;
use folga::engine::views::{resource, Resource};

/// Prints one calendar resource per active worker as JSON.
///
/// # Errors
/// Returns error if database query fails.
pub fn handle(config: &Config) -> Result<()> {
    let conn = Db::connect(&config.db_path)?;
    let today = config.today();
    CycleTracker::new(&conn).sync(today)?;

    let resources: Vec<Resource> = WorkerRepo::new(&conn)
        .list_active()?
        .iter()
        .map(|w| resource(w, today))
        .collect();

    println!("{}", serde_json::to_string_pretty(&resources)?);
    Ok(())
}

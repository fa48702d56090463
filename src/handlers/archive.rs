//! Handler for the `archive` and `restore` commands.

use anyhow::Result;
use colored::Colorize;
use folga::engine::config::Config;
use folga::engine::db::Db;
use folga::engine::repo::WorkerRepo;
use folga::engine::resolver::WorkerResolver;

/// Archives (`active == false`) or restores a worker.
///
/// # Errors
/// Returns error if the worker is unknown or the update fails.
pub fn handle(config: &Config, worker_ref: &str, active: bool) -> Result<()> {
    let conn = Db::connect(&config.db_path)?;
    let worker = WorkerResolver::new(&conn).resolve(worker_ref)?.worker;

    WorkerRepo::new(&conn).set_active(worker.id, active)?;
    tracing::info!(worker_id = worker.id, active, "worker archival changed");

    let verb = if active { "Restored" } else { "Archived" };
    println!("{} {} [{}] {}", "✓".green(), verb, worker.id.to_string().yellow(), worker.name);
    Ok(())
}

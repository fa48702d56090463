//! Handler for the `hire` command.

use anyhow::Result;
use colored::Colorize;
use folga::engine::config::Config;
use folga::engine::db::Db;
use folga::engine::error::FolgaError;
use folga::engine::repo::WorkerRepo;
use folga::engine::resolver::normalize_name;

/// Registers a new active worker.
///
/// # Errors
/// Returns error if the name is blank or the insert fails.
pub fn handle(config: &Config, name: &str, role: Option<&str>) -> Result<()> {
    let name = normalize_name(name);
    if name.is_empty() {
        return Err(FolgaError::InvalidInput("worker name cannot be empty".to_string()).into());
    }
    let role = role.map(str::trim).filter(|r| !r.is_empty());

    let conn = Db::connect(&config.db_path)?;
    let id = WorkerRepo::new(&conn).add(&name, role)?;

    tracing::info!(worker_id = id, "hired worker");
    println!("{} Hired [{}] {}", "✓".green(), id.to_string().yellow(), name);
    Ok(())
}

//! Handler for the `cancel` command.

use super::rest::note_orphaned_anchor;
use anyhow::Result;
use colored::Colorize;
use folga::engine::config::Config;
use folga::engine::db::Db;
use folga::engine::error::FolgaError;
use folga::engine::repo::IntervalRepo;
use folga::engine::views::WORK_EVENT_PREFIX;

/// Deletes a rest interval by ID.
///
/// # Errors
/// Returns error if the ID names a projected work event, is not numeric, or
/// does not exist.
pub fn handle(config: &Config, id: &str) -> Result<()> {
    let id = id.trim();
    if id.starts_with(WORK_EVENT_PREFIX) {
        return Err(FolgaError::InvalidInput(format!(
            "'{id}' is a projected work span; cancel a rest interval instead"
        ))
        .into());
    }
    let id: i64 = id
        .parse()
        .map_err(|_| FolgaError::InvalidInput(format!("'{id}' is not a rest interval ID")))?;

    let conn = Db::connect(&config.db_path)?;
    let repo = IntervalRepo::new(&conn);
    let rest = repo.get(id)?;
    repo.delete(id)?;

    tracing::info!(interval_id = id, worker_id = rest.worker_id, "cancelled rest interval");
    println!(
        "{} Cancelled rest [{}] {} → {}",
        "✓".green(),
        id.to_string().yellow(),
        rest.start,
        rest.end
    );
    note_orphaned_anchor(&conn, rest.worker_id)?;
    Ok(())
}

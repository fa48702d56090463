//! Handler for the `archived` command.

use anyhow::Result;
use colored::Colorize;
use folga::engine::config::Config;
use folga::engine::db::Db;
use folga::engine::repo::WorkerRepo;
use folga::engine::views::format_last_rest;

/// Lists archived workers by name.
///
/// # Errors
/// Returns error if database query fails.
pub fn handle(config: &Config, json: bool) -> Result<()> {
    let conn = Db::connect(&config.db_path)?;
    let workers = WorkerRepo::new(&conn).list_archived()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&workers)?);
        return Ok(());
    }

    println!("{} Archived workers:", "🗄".cyan());
    if workers.is_empty() {
        println!("   (None)");
        return Ok(());
    }
    for worker in workers {
        println!(
            "   [{}] {} {}",
            worker.id.to_string().blue(),
            worker.name,
            format!("(last rest {})", format_last_rest(worker.last_rest_end)).dimmed()
        );
    }
    Ok(())
}

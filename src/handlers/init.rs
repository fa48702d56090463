//! Handler for the `init` command.

use anyhow::Result;
use colored::Colorize;
use folga::engine::config::Config;
use folga::engine::db::Db;

/// Initializes the folga database.
///
/// # Errors
/// Returns error if database initialization fails.
pub fn handle(config: &Config) -> Result<()> {
    Db::init(&config.db_path)?;
    println!("{} Initialized {}", "✓".green(), config.db_path.display());
    Ok(())
}

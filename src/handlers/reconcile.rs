//! Handler for the `reconcile` command.

use anyhow::Result;
use colored::Colorize;
use folga::engine::config::Config;
use folga::engine::cycle::CycleTracker;
use folga::engine::db::Db;

/// Brings every cached cycle anchor up to date with the rest history.
///
/// # Errors
/// Returns error if the database cannot be read or written.
pub fn handle(config: &Config) -> Result<()> {
    let conn = Db::connect(&config.db_path)?;
    let today = config.today();
    let advanced = CycleTracker::new(&conn).sync(today)?;

    if advanced == 0 {
        println!("{} All cycle anchors are current as of {today}.", "✓".green());
    } else {
        println!("{} Advanced {advanced} worker(s) as of {today}.", "✓".green());
    }
    Ok(())
}

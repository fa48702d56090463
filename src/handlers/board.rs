//! Handler for the `board` command.

use anyhow::Result;
use colored::{ColoredString, Colorize};
use folga::engine::config::Config;
use folga::engine::cycle::CycleTracker;
use folga::engine::db::Db;
use folga::engine::repo::WorkerRepo;
use folga::engine::status::Severity;
use folga::engine::views::{worker_row, WorkerRow};

/// Displays the cycle status of every active worker.
///
/// # Errors
/// Returns error if database query fails.
pub fn handle(config: &Config, json: bool) -> Result<()> {
    let conn = Db::connect(&config.db_path)?;
    let today = config.today();
    CycleTracker::new(&conn).sync(today)?;

    let rows: Vec<WorkerRow> = WorkerRepo::new(&conn)
        .list_active()?
        .iter()
        .map(|w| worker_row(w, today))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    print_human(&rows, today);
    Ok(())
}

fn print_human(rows: &[WorkerRow], today: chrono::NaiveDate) {
    println!("{} Rest cycles as of {}", "📊".cyan(), today.format("%d/%m/%Y"));

    if rows.is_empty() {
        println!("   (No active workers. Add one with `folga hire <name>`.)");
        return;
    }

    let width = rows.iter().map(|r| r.name.chars().count()).max().unwrap_or(0);
    for row in rows {
        println!(
            "   [{:>3}] {:<width$}  {}  {:>4}d  last rest {}",
            row.id,
            row.name,
            paint(&format!("{:<10}", row.status), row.severity),
            row.days_worked,
            row.last_rest.dimmed(),
        );
    }
}

pub(crate) fn paint(label: &str, severity: Severity) -> ColoredString {
    match severity {
        Severity::High => label.red().bold(),
        Severity::Medium => label.yellow(),
        Severity::Normal => label.green(),
        Severity::Neutral => label.dimmed(),
    }
}

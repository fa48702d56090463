//! Handler for the `why` command.

use super::board::paint;
use super::events::resolver;
use anyhow::Result;
use chrono::NaiveDate;
use colored::Colorize;
use folga::engine::config::Config;
use folga::engine::cycle::{AnchorCheck, CycleTracker};
use folga::engine::db::Db;
use folga::engine::projection::{WorkInterval, CYCLE_LIMIT_DAYS};
use folga::engine::repo::{IntervalRepo, WorkerRepo};
use folga::engine::status::{CycleStatus, OVERDUE_THRESHOLD_DAYS, WARNING_THRESHOLD_DAYS};
use folga::engine::types::RestInterval;
use folga::engine::views::{cycle_report, format_last_rest, CycleReport};

/// Explains a worker's cycle status and shows the rest history.
///
/// # Errors
/// Returns error if worker resolution or a DB query fails.
pub fn handle(config: &Config, worker_ref: &str, fuzzy: bool) -> Result<()> {
    let conn = Db::connect(&config.db_path)?;
    let today = config.today();

    let resolved = resolver(&conn, fuzzy).resolve(worker_ref)?;
    if resolved.confidence < 1.0 {
        println!(
            "{} '{}' matched {} ({:.0}% confidence)",
            "note:".dimmed(),
            worker_ref,
            resolved.worker.name,
            resolved.confidence * 100.0
        );
    }
    CycleTracker::new(&conn).sync(today)?;
    let worker = WorkerRepo::new(&conn).get(resolved.worker.id)?;
    let history = IntervalRepo::new(&conn).list(Some(worker.id))?;

    let report = cycle_report(&worker, &history, today, config.window);

    println!(
        "[{}] {} {}",
        worker.id.to_string().cyan(),
        worker.name.bold(),
        worker.role.as_deref().map(|r| format!("({r})")).unwrap_or_default().dimmed()
    );
    println!(
        "   Status:    {} ({} days worked)",
        paint(report.status.status.label(), report.status.severity),
        report.status.days_worked
    );
    println!("   Today:     {}", today.to_string().dimmed());
    println!("   Last rest: {}", format_last_rest(worker.last_rest_end));
    println!();

    print_explanation(&report);
    print_anchor(&report, worker.last_rest_end);
    println!();
    if let Some(work) = &report.projection {
        if worker.active {
            print_projection(work, today, config.window.to_string().as_str());
            println!();
        }
    }
    print_history(&history, today);

    Ok(())
}

fn print_explanation(report: &CycleReport) {
    let days = report.status.days_worked;
    match report.status.status {
        CycleStatus::Archived => {
            println!("{} Worker is archived; cycle tracking is paused.", "reason:".dimmed());
        }
        CycleStatus::Undefined => {
            println!("{} No rest has ended yet, so the cycle has no start.", "reason:".dimmed());
        }
        CycleStatus::InCycle => println!(
            "{} {} days worked, below the {}-day warning threshold.",
            "reason:".green(),
            days,
            WARNING_THRESHOLD_DAYS
        ),
        CycleStatus::Warning => println!(
            "{} {} days worked; rest is due in {} days.",
            "reason:".yellow(),
            days,
            OVERDUE_THRESHOLD_DAYS - days
        ),
        CycleStatus::Overdue => println!(
            "{} {} days worked, {} past the {}-day limit.",
            "reason:".red(),
            days,
            days - OVERDUE_THRESHOLD_DAYS,
            OVERDUE_THRESHOLD_DAYS
        ),
    }
}

fn print_anchor(report: &CycleReport, cached: Option<NaiveDate>) {
    match report.anchor {
        AnchorCheck::Consistent => {}
        AnchorCheck::Ahead => println!(
            "         Last rest end {} was recorded while the rest was under way (history: {}).",
            format_last_rest(cached),
            format_last_rest(report.derived_last_rest_end)
        ),
        AnchorCheck::Behind => println!(
            "         {} cached last rest end {} trails history {}.",
            "warning:".yellow(),
            format_last_rest(cached),
            format_last_rest(report.derived_last_rest_end)
        ),
    }
}

fn print_projection(work: &WorkInterval, today: NaiveDate, policy: &str) {
    let span = work.span_days();
    let label = if work.overflow {
        format!("{span} days").red()
    } else {
        format!("{span} days").normal()
    };
    println!("{}", "Work span:".dimmed().underline());
    println!("   {} → {} ({})", work.start, work.end, label);
    match work.next_rest {
        Some(rest) => println!("   ends before the rest starting {rest}"),
        None => println!("   no rest scheduled; projected with the {policy} window"),
    }
    if let Some(day) = work.day_number(today) {
        println!("   today is day {day} of {CYCLE_LIMIT_DAYS}");
    }
}

fn print_history(history: &[RestInterval], today: NaiveDate) {
    println!("{}", "Rest history:".dimmed().underline());
    if history.is_empty() {
        println!("   (No rest recorded)");
        return;
    }

    for rest in history {
        let state = if rest.has_elapsed(today) {
            "DONE     ".green()
        } else if rest.has_started(today) {
            "RESTING  ".cyan()
        } else {
            "SCHEDULED".blue()
        };
        let days = (rest.end - rest.start).num_days() + 1;
        println!(
            "   [{}]  {}  {} → {}  {}",
            rest.id.to_string().yellow(),
            state,
            rest.start,
            rest.end,
            format!("{days}d").dimmed()
        );
    }
}

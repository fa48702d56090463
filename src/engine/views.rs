//! View payloads: board rows, calendar resources and calendar events.
//!
//! Everything here is derived per request from workers, their rest history
//! and today's date. Calendar spans use exclusive ends (last day + 1).

use super::cycle::{check_anchor, derive_last_rest_end, AnchorCheck};
use super::projection::{project, WindowPolicy, WorkInterval};
use super::status::{classify, Severity, StatusResult};
use super::types::{RestCategory, RestInterval, Worker};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

pub const REST_COMPLETED_COLOR: &str = "#198754";
pub const REST_SCHEDULED_COLOR: &str = "#0d6efd";

/// Background, border and text colors of a work event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkColors {
    pub background: &'static str,
    pub border: &'static str,
    pub text: &'static str,
}

pub const WORK_COLORS: WorkColors = WorkColors {
    background: "#f8f9fa",
    border: "#dee2e6",
    text: "#495057",
};

pub const WORK_OVERFLOW_COLORS: WorkColors = WorkColors {
    background: "#ffebee",
    border: "#ef9a9a",
    text: "#c62828",
};

/// Prefix of the synthetic work event ids.
pub const WORK_EVENT_PREFIX: &str = "work-";

/// One line of the status board.
#[derive(Debug, Clone, Serialize)]
pub struct WorkerRow {
    pub id: i64,
    pub name: String,
    pub status: &'static str,
    pub severity: Severity,
    pub status_class: &'static str,
    pub days_worked: i64,
    pub last_rest: String,
}

/// A calendar resource (one row of the timeline).
#[derive(Debug, Clone, Serialize)]
pub struct Resource {
    pub id: String,
    pub title: String,
    pub status_label: &'static str,
    pub status_class: &'static str,
    pub days_worked: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Rest,
    Work,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventProps {
    pub worker_id: i64,
    pub kind: EventKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<RestCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncated: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overflow: Option<bool>,
}

/// A calendar event with an exclusive `end`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub resource_id: String,
    pub title: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<&'static str>,
    pub extended_props: EventProps,
    pub display: &'static str,
}

/// Which events to emit.
#[derive(Debug, Clone, Copy)]
pub struct EventFilter {
    pub worker_id: Option<i64>,
    pub rest: bool,
    pub work: bool,
}

impl Default for EventFilter {
    fn default() -> Self {
        Self {
            worker_id: None,
            rest: true,
            work: true,
        }
    }
}

/// Formats the cached anchor as `dd/mm/YYYY`, or `-` when undefined.
#[must_use]
pub fn format_last_rest(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| "-".to_string(), |d| d.format("%d/%m/%Y").to_string())
}

#[must_use]
pub fn worker_row(worker: &Worker, today: NaiveDate) -> WorkerRow {
    let status = classify(worker, today);
    WorkerRow {
        id: worker.id,
        name: worker.name.clone(),
        status: status.status.label(),
        severity: status.severity,
        status_class: status.severity.css_class(),
        days_worked: status.days_worked,
        last_rest: format_last_rest(worker.last_rest_end),
    }
}

#[must_use]
pub fn resource(worker: &Worker, today: NaiveDate) -> Resource {
    let status = classify(worker, today);
    Resource {
        id: worker.id.to_string(),
        title: worker.name.clone(),
        status_label: status.status.label(),
        status_class: status.severity.css_class(),
        days_worked: status.days_worked,
    }
}

#[must_use]
pub fn rest_event(rest: &RestInterval, today: NaiveDate) -> CalendarEvent {
    let (title, color) = if rest.has_started(today) {
        ("REST (Completed)", REST_COMPLETED_COLOR)
    } else {
        ("REST (Scheduled)", REST_SCHEDULED_COLOR)
    };

    CalendarEvent {
        id: rest.id.to_string(),
        resource_id: rest.worker_id.to_string(),
        title: title.to_string(),
        start: rest.start,
        end: rest.exclusive_end(),
        color: Some(color),
        background_color: None,
        border_color: None,
        text_color: None,
        extended_props: EventProps {
            worker_id: rest.worker_id,
            kind: EventKind::Rest,
            category: Some(rest.category),
            truncated: None,
            overflow: None,
        },
        display: "block",
    }
}

#[must_use]
pub fn work_event(worker_id: i64, work: &WorkInterval) -> CalendarEvent {
    let colors = if work.overflow {
        WORK_OVERFLOW_COLORS
    } else {
        WORK_COLORS
    };

    CalendarEvent {
        id: format!("{WORK_EVENT_PREFIX}{worker_id}"),
        resource_id: worker_id.to_string(),
        title: "WORK".to_string(),
        start: work.start,
        end: work.exclusive_end(),
        color: None,
        background_color: Some(colors.background),
        border_color: Some(colors.border),
        text_color: Some(colors.text),
        extended_props: EventProps {
            worker_id,
            kind: EventKind::Work,
            category: None,
            truncated: Some(work.truncated),
            overflow: Some(work.overflow),
        },
        display: "block",
    }
}

/// Builds the calendar events for active workers.
///
/// Rest events come first in interval order, then one projected work event
/// per worker. Projections always see every rest start of the worker, even
/// when rest events are filtered out.
#[must_use]
pub fn build_events(
    workers: &[Worker],
    intervals: &[RestInterval],
    today: NaiveDate,
    policy: WindowPolicy,
    filter: EventFilter,
) -> Vec<CalendarEvent> {
    let wanted = |worker_id: i64| filter.worker_id.map_or(true, |id| id == worker_id);
    let active: HashMap<i64, &Worker> = workers
        .iter()
        .filter(|w| w.active && wanted(w.id))
        .map(|w| (w.id, w))
        .collect();

    let mut events = Vec::new();
    let mut rest_starts: HashMap<i64, Vec<NaiveDate>> = HashMap::new();

    for rest in intervals.iter().filter(|r| active.contains_key(&r.worker_id)) {
        rest_starts.entry(rest.worker_id).or_default().push(rest.start);
        if filter.rest {
            events.push(rest_event(rest, today));
        }
    }

    if filter.work {
        for worker in workers.iter().filter(|w| active.contains_key(&w.id)) {
            let starts = rest_starts.get(&worker.id).map_or(&[][..], Vec::as_slice);
            if let Some(work) = project(worker, today, starts, policy) {
                events.push(work_event(worker.id, &work));
            }
        }
    }

    events
}

/// Everything known about one worker's cycle, for explanations.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub status: StatusResult,
    pub derived_last_rest_end: Option<NaiveDate>,
    pub anchor: AnchorCheck,
    pub projection: Option<WorkInterval>,
}

#[must_use]
pub fn cycle_report(
    worker: &Worker,
    intervals: &[RestInterval],
    today: NaiveDate,
    policy: WindowPolicy,
) -> CycleReport {
    let own: Vec<_> = intervals.iter().filter(|r| r.worker_id == worker.id).collect();
    let derived = derive_last_rest_end(own.iter().copied(), today);
    let starts: Vec<_> = own.iter().map(|r| r.start).collect();

    CycleReport {
        status: classify(worker, today),
        derived_last_rest_end: derived,
        anchor: check_anchor(worker.last_rest_end, derived),
        projection: project(worker, today, &starts, policy),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::status::CycleStatus;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn worker(id: i64, active: bool, last: Option<&str>) -> Worker {
        Worker {
            id,
            name: format!("W{id}"),
            role: None,
            active,
            last_rest_end: last.map(d),
        }
    }

    fn rest(id: i64, worker_id: i64, start: &str, end: &str) -> RestInterval {
        RestInterval {
            id,
            worker_id,
            start: d(start),
            end: d(end),
            category: RestCategory::Field,
        }
    }

    #[test]
    fn test_worker_row() {
        let row = worker_row(&worker(1, true, Some("2024-01-10")), d("2024-03-01"));
        assert_eq!(row.status, "Warning");
        assert_eq!(row.days_worked, 51);
        assert_eq!(row.last_rest, "10/01/2024");
        assert_eq!(row.status_class, "bg-warning text-dark");

        let row = worker_row(&worker(2, true, None), d("2024-03-01"));
        assert_eq!(row.status, CycleStatus::Undefined.label());
        assert_eq!(row.last_rest, "-");
    }

    #[test]
    fn test_rest_event_end_is_exclusive() {
        let event = rest_event(&rest(9, 1, "2024-01-01", "2024-01-12"), d("2024-01-05"));
        assert_eq!(event.end, d("2024-01-13"));
        assert_eq!(event.color, Some(REST_COMPLETED_COLOR));
        assert_eq!(event.title, "REST (Completed)");

        let future = rest_event(&rest(9, 1, "2024-02-01", "2024-02-12"), d("2024-01-05"));
        assert_eq!(future.color, Some(REST_SCHEDULED_COLOR));
    }

    #[test]
    fn test_build_events_skips_archived_and_filters() {
        let workers = vec![
            worker(1, true, Some("2024-01-10")),
            worker(2, false, Some("2024-01-10")),
            worker(3, true, None),
        ];
        let intervals = vec![
            rest(1, 1, "2024-01-01", "2024-01-10"),
            rest(2, 1, "2024-02-01", "2024-02-12"),
            rest(3, 2, "2024-01-01", "2024-01-10"),
            rest(4, 3, "2024-04-01", "2024-04-12"),
        ];
        let today = d("2024-01-20");

        let all = build_events(&workers, &intervals, today, WindowPolicy::Fixed, EventFilter::default());
        let ids: Vec<_> = all.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "4", "work-1"]);

        let work = all.last().unwrap();
        assert_eq!(work.start, d("2024-01-11"));
        assert_eq!(work.end, d("2024-02-01"));
        assert_eq!(work.extended_props.truncated, Some(true));

        // hiding rest events must not change the projection
        let only_work = build_events(
            &workers,
            &intervals,
            today,
            WindowPolicy::Fixed,
            EventFilter {
                worker_id: Some(1),
                rest: false,
                work: true,
            },
        );
        assert_eq!(only_work.len(), 1);
        assert_eq!(only_work[0].end, d("2024-02-01"));
    }

    #[test]
    fn test_overflow_colors() {
        let workers = vec![worker(1, true, Some("2024-01-10"))];
        let intervals = vec![rest(1, 1, "2024-05-01", "2024-05-12")];
        let events = build_events(
            &workers,
            &intervals,
            d("2024-01-20"),
            WindowPolicy::Fixed,
            EventFilter {
                worker_id: None,
                rest: false,
                work: true,
            },
        );
        assert_eq!(events[0].background_color, Some(WORK_OVERFLOW_COLORS.background));
        assert_eq!(events[0].extended_props.overflow, Some(true));
    }

    #[test]
    fn test_event_json_shape() {
        let event = rest_event(&rest(5, 2, "2024-01-01", "2024-01-03"), d("2024-01-02"));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["resourceId"], "2");
        assert_eq!(json["end"], "2024-01-04");
        assert_eq!(json["extendedProps"]["kind"], "rest");
        assert!(json.get("backgroundColor").is_none());
    }

    #[test]
    fn test_cycle_report_flags_eager_anchor() {
        // rest in progress was recorded eagerly: cache ahead of history
        let w = worker(1, true, Some("2024-03-05"));
        let intervals = vec![
            rest(1, 1, "2024-01-01", "2024-01-10"),
            rest(2, 1, "2024-02-25", "2024-03-05"),
        ];
        let report = cycle_report(&w, &intervals, d("2024-03-01"), WindowPolicy::Fixed);
        assert_eq!(report.derived_last_rest_end, Some(d("2024-01-10")));
        assert_eq!(report.anchor, AnchorCheck::Ahead);
        assert_eq!(report.status.days_worked, 0);
        assert_eq!(report.projection.unwrap().start, d("2024-03-06"));
    }
}

//! Work-Interval Projector: the synthetic work span drawn on calendars.
//!
//! A worker's current work span starts the day after the last rest ended and
//! runs until the day before the next known rest. With no rest scheduled the
//! span is extended by a default window chosen by `WindowPolicy`.
//! Projections are presentation-only and never stored.

use super::error::FolgaError;
use super::types::{next_day, Worker};
use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Nominal length of a work cycle, in days.
pub const CYCLE_LIMIT_DAYS: i64 = 60;
/// Fixed policy: end = start + 59, a 60-day span.
pub const FIXED_WINDOW_OFFSET_DAYS: u64 = 59;
/// Widening policy: the offset never drops below this.
pub const WIDENING_MIN_OFFSET_DAYS: i64 = 60;
/// Widening policy: days kept visible beyond today.
pub const WIDENING_LOOKAHEAD_DAYS: i64 = 10;

/// How far an open-ended work span is projected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowPolicy {
    /// Always `start + 59` days.
    #[default]
    Fixed,
    /// `start + max(60, elapsed + 10)` days, so long cycles stay visible.
    Widening,
}

impl WindowPolicy {
    /// Offset in days from the work start to the projected end.
    #[must_use]
    pub fn offset_days(&self, start: NaiveDate, today: NaiveDate) -> u64 {
        match self {
            WindowPolicy::Fixed => FIXED_WINDOW_OFFSET_DAYS,
            WindowPolicy::Widening => {
                let elapsed = (today - start).num_days().max(0);
                let offset = WIDENING_MIN_OFFSET_DAYS.max(elapsed + WIDENING_LOOKAHEAD_DAYS);
                u64::try_from(offset).unwrap_or(FIXED_WINDOW_OFFSET_DAYS)
            }
        }
    }
}

impl fmt::Display for WindowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowPolicy::Fixed => write!(f, "fixed"),
            WindowPolicy::Widening => write!(f, "widening"),
        }
    }
}

impl FromStr for WindowPolicy {
    type Err = FolgaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fixed" => Ok(WindowPolicy::Fixed),
            "widening" | "dynamic" => Ok(WindowPolicy::Widening),
            other => Err(FolgaError::InvalidInput(format!(
                "unknown window policy '{other}' (expected fixed or widening)"
            ))),
        }
    }
}

/// A projected work span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkInterval {
    pub start: NaiveDate,
    /// Last working day (inclusive).
    pub end: NaiveDate,
    /// Cut short by a known rest rather than the default window.
    pub truncated: bool,
    /// The span is longer than the nominal cycle.
    pub overflow: bool,
    /// First day of the rest that truncated the span.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_rest: Option<NaiveDate>,
}

impl WorkInterval {
    /// Number of days in the span, both ends included.
    #[must_use]
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    #[must_use]
    pub fn exclusive_end(&self) -> NaiveDate {
        next_day(self.end)
    }

    /// 1-based day number of `date` within the span.
    #[must_use]
    pub fn day_number(&self, date: NaiveDate) -> Option<i64> {
        if date < self.start || date > self.end {
            return None;
        }
        Some((date - self.start).num_days() + 1)
    }
}

/// Last working day before `next_rest`, or `None` when that would fall
/// before `start`.
#[must_use]
pub fn truncated_end(start: NaiveDate, next_rest: NaiveDate) -> Option<NaiveDate> {
    let end = next_rest.pred_opt()?;
    (end >= start).then_some(end)
}

/// Projects the current work span for a worker.
///
/// `rest_starts` are the start dates of the worker's rest intervals; only
/// those strictly after the work start can truncate it. Returns `None` when
/// the worker has no cycle anchor or the span would be empty.
#[must_use]
pub fn project(
    worker: &Worker,
    today: NaiveDate,
    rest_starts: &[NaiveDate],
    policy: WindowPolicy,
) -> Option<WorkInterval> {
    let last_rest_end = worker.last_rest_end?;
    let start = last_rest_end.succ_opt()?;

    let next_rest = rest_starts.iter().copied().filter(|d| *d > start).min();

    let (end, truncated) = match next_rest {
        Some(rest) => (truncated_end(start, rest)?, true),
        None => {
            let offset = policy.offset_days(start, today);
            (start.checked_add_days(Days::new(offset))?, false)
        }
    };

    let span = (end - start).num_days() + 1;
    Some(WorkInterval {
        start,
        end,
        truncated,
        overflow: span > CYCLE_LIMIT_DAYS,
        next_rest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn worker(last_rest_end: Option<&str>) -> Worker {
        Worker {
            id: 7,
            name: "MARIA".to_string(),
            role: Some("Operator".to_string()),
            active: true,
            last_rest_end: last_rest_end.map(d),
        }
    }

    #[test]
    fn test_no_anchor_no_projection() {
        assert!(project(&worker(None), d("2024-01-15"), &[], WindowPolicy::Fixed).is_none());
    }

    #[test]
    fn test_truncated_by_next_rest() {
        let w = worker(Some("2024-01-10"));
        let starts = [d("2024-02-01"), d("2023-12-01")];
        let work = project(&w, d("2024-01-20"), &starts, WindowPolicy::Fixed).unwrap();
        assert_eq!(work.start, d("2024-01-11"));
        assert_eq!(work.end, d("2024-01-31"));
        assert!(work.truncated);
        assert!(!work.overflow);
        assert_eq!(work.next_rest, Some(d("2024-02-01")));
    }

    #[test]
    fn test_earliest_future_rest_wins() {
        let w = worker(Some("2024-01-10"));
        let starts = [d("2024-03-01"), d("2024-02-01"), d("2024-02-15")];
        let work = project(&w, d("2024-01-20"), &starts, WindowPolicy::Fixed).unwrap();
        assert_eq!(work.end, d("2024-01-31"));
    }

    #[test]
    fn test_rest_on_work_start_does_not_truncate() {
        // only starts strictly after the work start count
        let w = worker(Some("2024-01-10"));
        let work = project(&w, d("2024-01-11"), &[d("2024-01-11")], WindowPolicy::Fixed).unwrap();
        assert!(!work.truncated);
        assert_eq!(work.end, d("2024-03-10"));
    }

    #[test]
    fn test_fixed_default_window() {
        let w = worker(Some("2024-01-10"));
        let work = project(&w, d("2024-01-20"), &[], WindowPolicy::Fixed).unwrap();
        assert_eq!(work.start, d("2024-01-11"));
        // 2024-01-10 + 1 + 59
        assert_eq!(work.end, d("2024-03-10"));
        assert_eq!(work.span_days(), 60);
        assert!(!work.truncated);
        assert!(!work.overflow);
    }

    #[test]
    fn test_widening_window() {
        let w = worker(Some("2024-01-10"));
        // early in the cycle the floor of 60 applies
        let early = project(&w, d("2024-01-20"), &[], WindowPolicy::Widening).unwrap();
        assert_eq!(early.end, d("2024-03-11"));
        // 70 days in: 70 + 10 = 80
        let late = project(&w, d("2024-03-21"), &[], WindowPolicy::Widening).unwrap();
        assert_eq!(late.end, d("2024-03-31"));
        assert!(late.overflow);
    }

    #[test]
    fn test_overflow_when_next_rest_is_far() {
        let w = worker(Some("2024-01-10"));
        let work = project(&w, d("2024-01-20"), &[d("2024-03-12")], WindowPolicy::Fixed).unwrap();
        assert_eq!(work.span_days(), 61);
        assert!(work.truncated);
        assert!(work.overflow);

        let exact = project(&w, d("2024-01-20"), &[d("2024-03-11")], WindowPolicy::Fixed).unwrap();
        assert_eq!(exact.span_days(), 60);
        assert!(!exact.overflow);
    }

    #[test]
    fn test_degenerate_truncation_suppressed() {
        let start = d("2024-01-11");
        assert_eq!(truncated_end(start, d("2024-01-12")), Some(start));
        assert_eq!(truncated_end(start, start), None);
        assert_eq!(truncated_end(start, d("2024-01-01")), None);
    }

    #[test]
    fn test_day_numbers() {
        let w = worker(Some("2024-01-10"));
        let work = project(&w, d("2024-01-20"), &[], WindowPolicy::Fixed).unwrap();
        assert_eq!(work.day_number(d("2024-01-11")), Some(1));
        assert_eq!(work.day_number(d("2024-03-10")), Some(60));
        assert_eq!(work.day_number(d("2024-01-10")), None);
        assert_eq!(work.exclusive_end(), d("2024-03-11"));
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("fixed".parse::<WindowPolicy>().unwrap(), WindowPolicy::Fixed);
        assert_eq!("Widening".parse::<WindowPolicy>().unwrap(), WindowPolicy::Widening);
        assert!("weekly".parse::<WindowPolicy>().is_err());
        assert_eq!(WindowPolicy::Widening.to_string(), "widening");
    }
}

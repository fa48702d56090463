//! Cycle Status Engine: classifies how far a worker is into the work cycle.
//!
//! This module answers "how long has this worker been working since the last
//! rest, and is that a problem?" from the cached `last_rest_end` and today's
//! date. It never touches the database.

use super::types::Worker;
use chrono::NaiveDate;
use serde::Serialize;

/// Days worked from which a worker is flagged for attention.
pub const WARNING_THRESHOLD_DAYS: i64 = 40;
/// Days worked from which the rest is overdue.
pub const OVERDUE_THRESHOLD_DAYS: i64 = 60;

/// The derived (computed) classification of a worker's cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleStatus {
    /// Worker is archived; excluded from cycle tracking
    Archived,
    /// No rest has ever elapsed - the cycle has no anchor
    Undefined,
    /// Fewer than 40 days worked
    InCycle,
    /// 40 to 59 days worked
    Warning,
    /// 60 or more days worked
    Overdue,
}

/// How loudly a status should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Neutral,
    Normal,
    Medium,
    High,
}

impl Severity {
    /// CSS class hint for UI rendering.
    #[must_use]
    pub fn css_class(&self) -> &'static str {
        match self {
            Severity::Neutral => "bg-secondary",
            Severity::Normal => "bg-success",
            Severity::Medium => "bg-warning text-dark",
            Severity::High => "bg-danger",
        }
    }
}

impl CycleStatus {
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            CycleStatus::Archived | CycleStatus::Undefined => Severity::Neutral,
            CycleStatus::InCycle => Severity::Normal,
            CycleStatus::Warning => Severity::Medium,
            CycleStatus::Overdue => Severity::High,
        }
    }

    /// Human label shown on boards and resources.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            CycleStatus::Archived => "Archived",
            CycleStatus::Undefined => "Undefined",
            CycleStatus::InCycle => "In cycle",
            CycleStatus::Warning => "Warning",
            CycleStatus::Overdue => "Overdue",
        }
    }

    /// Returns true if the worker needs a rest scheduled soon.
    #[must_use]
    pub fn needs_attention(&self) -> bool {
        matches!(self, CycleStatus::Warning | CycleStatus::Overdue)
    }

    /// Classifies a clamped day count against the thresholds.
    #[must_use]
    pub fn from_days_worked(days: i64) -> Self {
        if days >= OVERDUE_THRESHOLD_DAYS {
            CycleStatus::Overdue
        } else if days >= WARNING_THRESHOLD_DAYS {
            CycleStatus::Warning
        } else {
            CycleStatus::InCycle
        }
    }
}

impl std::fmt::Display for CycleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of classifying one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusResult {
    pub status: CycleStatus,
    pub severity: Severity,
    pub days_worked: i64,
}

impl StatusResult {
    fn new(status: CycleStatus, days_worked: i64) -> Self {
        Self {
            status,
            severity: status.severity(),
            days_worked,
        }
    }
}

/// Days elapsed since `last_rest_end`, clamped at zero.
///
/// A `last_rest_end` after `today` happens when a rest in progress was
/// recorded eagerly.
#[must_use]
pub fn days_worked(last_rest_end: NaiveDate, today: NaiveDate) -> i64 {
    (today - last_rest_end).num_days().max(0)
}

/// Classifies a worker's current cycle.
///
/// Pure function: no I/O, no side effects.
#[must_use]
pub fn classify(worker: &Worker, today: NaiveDate) -> StatusResult {
    if !worker.active {
        return StatusResult::new(CycleStatus::Archived, 0);
    }

    let Some(last_rest_end) = worker.last_rest_end else {
        return StatusResult::new(CycleStatus::Undefined, 0);
    };

    let days = days_worked(last_rest_end, today);
    StatusResult::new(CycleStatus::from_days_worked(days), days)
}

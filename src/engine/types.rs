//! Core types for the folga system.
//!
//! Note: `CycleStatus` (the computed classification) lives in `status.rs`.
//! `Worker::last_rest_end` here is the stored/cached anchor in SQLite.

use super::error::FolgaError;
use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Kind of rest leave. Only field rest exists today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RestCategory {
    #[default]
    Field,
}

impl fmt::Display for RestCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field => write!(f, "field"),
        }
    }
}

impl FromStr for RestCategory {
    type Err = FolgaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "field" => Ok(Self::Field),
            other => Err(FolgaError::InvalidInput(format!("unknown rest category '{other}'"))),
        }
    }
}

/// A tracked field worker.
#[derive(Debug, Clone, Serialize)]
pub struct Worker {
    pub id: i64,
    pub name: String,
    pub role: Option<String>,
    /// Archived workers are `active == false`.
    pub active: bool,
    /// Cached end of the latest elapsed rest (see `cycle::reconcile`).
    pub last_rest_end: Option<NaiveDate>,
}

/// A closed date range during which a worker is on rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestInterval {
    pub id: i64,
    pub worker_id: i64,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub category: RestCategory,
}

impl RestInterval {
    /// The interval has fully elapsed: its last day is before `today`.
    #[must_use]
    pub fn has_elapsed(&self, today: NaiveDate) -> bool {
        self.end < today
    }

    /// The interval has begun (or begins today).
    #[must_use]
    pub fn has_started(&self, today: NaiveDate) -> bool {
        self.start <= today
    }

    /// Day after the last rest day, for calendars with exclusive ends.
    #[must_use]
    pub fn exclusive_end(&self) -> NaiveDate {
        next_day(self.end)
    }
}

/// Parses a `YYYY-MM-DD` date coming from the outside world.
///
/// # Errors
/// Returns `FolgaError::InvalidDate` naming the offending field.
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, FolgaError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| FolgaError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

/// Validates a rest span at the boundary. Inverted spans are refused.
///
/// # Errors
/// Returns `FolgaError::InvertedInterval` when `start > end`.
pub fn check_span(start: NaiveDate, end: NaiveDate) -> Result<(), FolgaError> {
    if start > end {
        return Err(FolgaError::InvertedInterval { start, end });
    }
    Ok(())
}

/// Resolves the end of a rest from either an explicit end or a length in days.
///
/// # Errors
/// Returns `FolgaError::InvalidInput` for a zero length.
pub fn span_end(start: NaiveDate, end: Option<NaiveDate>, days: u32) -> Result<NaiveDate, FolgaError> {
    if let Some(end) = end {
        return Ok(end);
    }
    if days == 0 {
        return Err(FolgaError::InvalidInput(
            "rest length must be at least 1 day".to_string(),
        ));
    }
    start
        .checked_add_days(Days::new(u64::from(days) - 1))
        .ok_or_else(|| FolgaError::InvalidInput(format!("rest of {days} days overflows the calendar")))
}

pub(crate) fn next_day(date: NaiveDate) -> NaiveDate {
    date.succ_opt().unwrap_or(date)
}

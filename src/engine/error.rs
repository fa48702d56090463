//! Domain errors surfaced to callers.
//!
//! Repositories and handlers speak `anyhow::Result`; these variants travel
//! inside it so the binary can tell a missing record from a fatal failure.

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FolgaError {
    #[error("worker {0} not found")]
    WorkerNotFound(String),

    #[error("rest interval {0} not found")]
    IntervalNotFound(i64),

    #[error("invalid {field} date '{value}' (expected YYYY-MM-DD)")]
    InvalidDate { field: &'static str, value: String },

    #[error("rest interval starts {start} but ends {end}")]
    InvertedInterval { start: NaiveDate, end: NaiveDate },

    #[error("{0}")]
    InvalidInput(String),

    #[error("folga not initialized at {}. Run `folga init` first.", .0.display())]
    NotInitialized(PathBuf),
}

impl FolgaError {
    /// True for the 404-equivalent variants.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::WorkerNotFound(_) | Self::IntervalNotFound(_))
    }

    /// True for errors caused by malformed caller input.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidDate { .. } | Self::InvertedInterval { .. } | Self::InvalidInput(_)
        )
    }
}

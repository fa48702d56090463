//! Cycle Tracker: keeps each worker's cached `last_rest_end` in step with
//! the rest history.
//!
//! The cache only ever moves forward. Both the bulk reconciliation and the
//! eager update on the write path go through `advances`, so they agree on
//! what "later" means.

use super::repo::{IntervalRepo, WorkerRepo};
use super::types::{check_span, RestInterval, Worker};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::Connection;
use std::collections::HashMap;

/// Whether `candidate` should replace the cached value.
#[must_use]
pub fn advances(current: Option<NaiveDate>, candidate: NaiveDate) -> bool {
    current.map_or(true, |cur| candidate > cur)
}

/// Latest end among the intervals that have fully elapsed by `today`.
///
/// This is the pure recomputation of the cached field.
#[must_use]
pub fn derive_last_rest_end<'a, I>(intervals: I, today: NaiveDate) -> Option<NaiveDate>
where
    I: IntoIterator<Item = &'a RestInterval>,
{
    intervals
        .into_iter()
        .filter(|r| r.has_elapsed(today))
        .map(|r| r.end)
        .max()
}

/// Computes the cache updates implied by the rest history.
///
/// Returns `(worker_id, new_last_rest_end)` for every worker whose cached
/// value is absent or earlier than its latest elapsed rest end, ordered by
/// worker id. Intervals of unknown workers are ignored. Pure: applying the
/// result and calling again yields nothing.
#[must_use]
pub fn reconcile(
    today: NaiveDate,
    workers: &[Worker],
    intervals: &[RestInterval],
) -> Vec<(i64, NaiveDate)> {
    let mut latest: HashMap<i64, NaiveDate> = HashMap::new();
    for rest in intervals.iter().filter(|r| r.has_elapsed(today)) {
        latest
            .entry(rest.worker_id)
            .and_modify(|end| *end = (*end).max(rest.end))
            .or_insert(rest.end);
    }

    let mut updates: Vec<_> = workers
        .iter()
        .filter_map(|w| {
            let end = *latest.get(&w.id)?;
            advances(w.last_rest_end, end).then_some((w.id, end))
        })
        .collect();
    updates.sort_by_key(|(id, _)| *id);
    updates
}

/// Applies cycle rules against the database.
pub struct CycleTracker<'a> {
    conn: &'a Connection,
}

impl<'a> CycleTracker<'a> {
    #[must_use]
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Reconciles every worker's cached anchor with the rest history.
    ///
    /// Writes happen in one transaction, each as a compare-and-set, so a
    /// concurrent writer can never move a value backwards. Returns the
    /// number of workers actually advanced.
    ///
    /// # Errors
    /// Returns an error if reading the snapshot or writing fails.
    pub fn sync(&self, today: NaiveDate) -> Result<usize> {
        let workers = WorkerRepo::new(self.conn).list_all()?;
        let intervals = IntervalRepo::new(self.conn).list(None)?;
        let updates = reconcile(today, &workers, &intervals);

        if updates.is_empty() {
            tracing::debug!(%today, "cycle anchors already current");
            return Ok(0);
        }

        let tx = self
            .conn
            .unchecked_transaction()
            .context("Failed to open reconciliation transaction")?;
        let repo = WorkerRepo::new(&tx);
        let mut advanced = 0;
        for (worker_id, end) in &updates {
            if repo.advance_last_rest_end(*worker_id, *end)? {
                advanced += 1;
            }
        }
        tx.commit().context("Failed to commit reconciliation")?;

        tracing::info!(%today, advanced, "reconciled cycle anchors");
        Ok(advanced)
    }

    /// Records a rest interval and eagerly advances the worker's anchor when
    /// the rest has already begun.
    ///
    /// # Errors
    /// Returns `FolgaError::WorkerNotFound` for an unknown worker,
    /// `FolgaError::InvertedInterval` when `start > end`, or a storage error.
    pub fn record_rest(
        &self,
        worker_id: i64,
        start: NaiveDate,
        end: NaiveDate,
        today: NaiveDate,
    ) -> Result<RestInterval> {
        check_span(start, end)?;

        let tx = self
            .conn
            .unchecked_transaction()
            .context("Failed to open rest transaction")?;
        let rest = Self::record_in(&tx, worker_id, start, end, today)?;
        tx.commit().context("Failed to commit rest interval")?;
        Ok(rest)
    }

    /// Replaces a rest interval with a new span for the same worker.
    ///
    /// # Errors
    /// Returns `FolgaError::IntervalNotFound` for an unknown interval,
    /// `FolgaError::InvertedInterval` when `start > end`, or a storage error.
    pub fn move_rest(
        &self,
        interval_id: i64,
        start: NaiveDate,
        end: NaiveDate,
        today: NaiveDate,
    ) -> Result<RestInterval> {
        check_span(start, end)?;

        let tx = self
            .conn
            .unchecked_transaction()
            .context("Failed to open move transaction")?;
        let intervals = IntervalRepo::new(&tx);
        let old = intervals.get(interval_id)?;
        intervals.delete(interval_id)?;
        let rest = Self::record_in(&tx, old.worker_id, start, end, today)?;
        tx.commit().context("Failed to commit moved rest interval")?;

        tracing::info!(
            from = interval_id,
            to = rest.id,
            worker_id = rest.worker_id,
            "moved rest interval"
        );
        Ok(rest)
    }

    fn record_in(
        conn: &Connection,
        worker_id: i64,
        start: NaiveDate,
        end: NaiveDate,
        today: NaiveDate,
    ) -> Result<RestInterval> {
        let workers = WorkerRepo::new(conn);
        let worker = workers.get(worker_id)?;

        let rest = IntervalRepo::new(conn).add(worker.id, start, end)?;

        if start <= today && advances(worker.last_rest_end, end) {
            let moved = workers.advance_last_rest_end(worker.id, end)?;
            tracing::debug!(worker_id, %end, moved, "eager anchor advance");
        }
        Ok(rest)
    }
}

/// Whether the cached anchor matches a fresh recomputation.
///
/// An eagerly advanced anchor (rest still in progress) is ahead of the
/// recomputed value; that is reported as `Ahead`, not a mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorCheck {
    Consistent,
    Ahead,
    Behind,
}

#[must_use]
pub fn check_anchor(cached: Option<NaiveDate>, derived: Option<NaiveDate>) -> AnchorCheck {
    match (cached, derived) {
        (Some(c), Some(d)) if c > d => AnchorCheck::Ahead,
        (Some(c), Some(d)) if c < d => AnchorCheck::Behind,
        (Some(_), None) => AnchorCheck::Ahead,
        (None, Some(_)) => AnchorCheck::Behind,
        _ => AnchorCheck::Consistent,
    }
}

/// Whether some stored interval still ends on the cached anchor.
///
/// Cancelling or moving the rest that set the anchor leaves it in place,
/// since the anchor never moves backwards.
#[must_use]
pub fn anchor_is_backed<'a, I>(cached: Option<NaiveDate>, intervals: I) -> bool
where
    I: IntoIterator<Item = &'a RestInterval>,
{
    cached.map_or(true, |anchor| intervals.into_iter().any(|r| r.end == anchor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::RestCategory;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn worker(id: i64, last: Option<&str>) -> Worker {
        Worker {
            id,
            name: format!("W{id}"),
            role: None,
            active: true,
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

    fn apply(workers: &mut [Worker], updates: &[(i64, NaiveDate)]) {
        for (id, end) in updates {
            if let Some(w) = workers.iter_mut().find(|w| w.id == *id) {
                w.last_rest_end = Some(*end);
            }
        }
    }

    #[test]
    fn test_only_elapsed_intervals_count() {
        let workers = vec![worker(1, None)];
        let intervals = vec![
            rest(1, 1, "2024-01-01", "2024-01-10"),
            rest(2, 1, "2024-02-01", "2024-02-12"),
        ];
        // the February rest ends on "today" so it has not elapsed
        let updates = reconcile(d("2024-02-12"), &workers, &intervals);
        assert_eq!(updates, vec![(1, d("2024-01-10"))]);

        let updates = reconcile(d("2024-02-13"), &workers, &intervals);
        assert_eq!(updates, vec![(1, d("2024-02-12"))]);
    }

    #[test]
    fn test_idempotent() {
        let mut workers = vec![worker(1, None), worker(2, Some("2024-01-05"))];
        let intervals = vec![
            rest(1, 1, "2024-01-01", "2024-01-10"),
            rest(2, 2, "2023-12-20", "2024-01-02"),
            rest(3, 2, "2024-01-20", "2024-01-25"),
        ];
        let today = d("2024-03-01");
        let first = reconcile(today, &workers, &intervals);
        assert_eq!(first, vec![(1, d("2024-01-10")), (2, d("2024-01-25"))]);
        apply(&mut workers, &first);
        assert!(reconcile(today, &workers, &intervals).is_empty());
    }

    #[test]
    fn test_never_moves_backwards() {
        // cache ahead of history (eager write of a rest in progress)
        let workers = vec![worker(1, Some("2024-03-05"))];
        let intervals = vec![rest(1, 1, "2024-01-01", "2024-01-10")];
        assert!(reconcile(d("2024-03-01"), &workers, &intervals).is_empty());
    }

    #[test]
    fn test_monotonic_across_additions() {
        let mut workers = vec![worker(1, None)];
        let mut intervals = vec![rest(1, 1, "2024-01-01", "2024-01-10")];
        let today = d("2024-06-01");
        let mut history = Vec::new();

        for (i, (s, e)) in [("2024-03-01", "2024-03-10"), ("2024-02-01", "2024-02-05")]
            .iter()
            .enumerate()
        {
            let updates = reconcile(today, &workers, &intervals);
            apply(&mut workers, &updates);
            history.push(workers[0].last_rest_end);
            intervals.push(rest(i64::try_from(i).unwrap() + 2, 1, s, e));
        }
        let updates = reconcile(today, &workers, &intervals);
        apply(&mut workers, &updates);
        history.push(workers[0].last_rest_end);

        assert!(history.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(workers[0].last_rest_end, Some(d("2024-03-10")));
    }

    #[test]
    fn test_overlapping_and_inverted_tolerated() {
        let workers = vec![worker(1, None)];
        let intervals = vec![
            rest(1, 1, "2024-01-01", "2024-01-20"),
            rest(2, 1, "2024-01-10", "2024-01-15"),
            rest(3, 1, "2024-01-25", "2024-01-22"),
        ];
        let updates = reconcile(d("2024-02-01"), &workers, &intervals);
        assert_eq!(updates, vec![(1, d("2024-01-22"))]);
    }

    #[test]
    fn test_derive_matches_reconcile() {
        let intervals = vec![
            rest(1, 1, "2024-01-01", "2024-01-10"),
            rest(2, 1, "2024-04-01", "2024-04-10"),
        ];
        assert_eq!(derive_last_rest_end(&intervals, d("2024-03-01")), Some(d("2024-01-10")));
        assert_eq!(derive_last_rest_end(&intervals, d("2024-01-10")), None);
    }

    #[test]
    fn test_anchor_check() {
        assert_eq!(check_anchor(None, None), AnchorCheck::Consistent);
        assert_eq!(check_anchor(Some(d("2024-01-10")), Some(d("2024-01-10"))), AnchorCheck::Consistent);
        assert_eq!(check_anchor(Some(d("2024-01-12")), Some(d("2024-01-10"))), AnchorCheck::Ahead);
        assert_eq!(check_anchor(None, Some(d("2024-01-10"))), AnchorCheck::Behind);
    }

    #[test]
    fn test_advances_rule() {
        assert!(advances(None, d("2024-01-01")));
        assert!(advances(Some(d("2024-01-01")), d("2024-01-02")));
        assert!(!advances(Some(d("2024-01-02")), d("2024-01-02")));
    }

    #[test]
    fn test_anchor_backing() {
        let history = vec![rest(1, 1, "2024-01-01", "2024-01-10")];
        assert!(anchor_is_backed(None, &history));
        assert!(anchor_is_backed(Some(d("2024-01-10")), &history));
        assert!(!anchor_is_backed(Some(d("2024-03-12")), &history));
        assert!(!anchor_is_backed(Some(d("2024-01-10")), std::iter::empty()));
    }
}

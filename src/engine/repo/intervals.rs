//! Rest Interval Repository: the raw rest history.

use crate::engine::error::FolgaError;
use crate::engine::types::{RestCategory, RestInterval};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};

pub const INTERVAL_SELECT: &str =
    "SELECT r.id, r.worker_id, r.start_date, r.end_date, r.category FROM rest_intervals r";

pub struct IntervalRepo<'a> {
    conn: &'a Connection,
}

impl<'a> IntervalRepo<'a> {
    /// Creates a new interval repository instance.
    #[must_use]
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Stores a field rest interval.
    ///
    /// # Errors
    /// Returns an error if the insertion fails.
    pub fn add(&self, worker_id: i64, start: NaiveDate, end: NaiveDate) -> Result<RestInterval> {
        let category = RestCategory::Field;
        self.conn.execute(
            "INSERT INTO rest_intervals (worker_id, start_date, end_date, category)
             VALUES (?1, ?2, ?3, ?4)",
            params![worker_id, start, end, category.to_string()],
        )?;
        Ok(RestInterval {
            id: self.conn.last_insert_rowid(),
            worker_id,
            start,
            end,
            category,
        })
    }

    /// Finds an interval by ID.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn find_by_id(&self, id: i64) -> Result<Option<RestInterval>> {
        let sql = format!("{INTERVAL_SELECT} WHERE r.id = ?1");
        self.conn
            .query_row(&sql, params![id], row_to_interval)
            .optional()
            .context("Search by ID failed")
    }

    /// Fetches an interval that must exist.
    ///
    /// # Errors
    /// Returns `FolgaError::IntervalNotFound` if absent.
    pub fn get(&self, id: i64) -> Result<RestInterval> {
        self.find_by_id(id)?
            .ok_or_else(|| FolgaError::IntervalNotFound(id).into())
    }

    /// Rest intervals, optionally for one worker, ordered by start.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn list(&self, worker_id: Option<i64>) -> Result<Vec<RestInterval>> {
        match worker_id {
            Some(id) => self.query_list(
                &format!("{INTERVAL_SELECT} WHERE r.worker_id = ?1 ORDER BY r.start_date, r.id"),
                params![id],
            ),
            None => self.query_list(
                &format!("{INTERVAL_SELECT} ORDER BY r.start_date, r.id"),
                params![],
            ),
        }
    }

    /// Rest intervals belonging to active workers, optionally for one worker.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn list_for_active_workers(&self, worker_id: Option<i64>) -> Result<Vec<RestInterval>> {
        let base = format!("{INTERVAL_SELECT} JOIN workers w ON w.id = r.worker_id WHERE w.active = 1");
        match worker_id {
            Some(id) => self.query_list(
                &format!("{base} AND r.worker_id = ?1 ORDER BY r.start_date, r.id"),
                params![id],
            ),
            None => self.query_list(&format!("{base} ORDER BY r.start_date, r.id"), params![]),
        }
    }

    /// Deletes a rest interval.
    ///
    /// # Errors
    /// Returns `FolgaError::IntervalNotFound` if no such interval exists.
    pub fn delete(&self, id: i64) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM rest_intervals WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(FolgaError::IntervalNotFound(id).into());
        }
        Ok(())
    }

    fn query_list(&self, sql: &str, args: &[&dyn rusqlite::ToSql]) -> Result<Vec<RestInterval>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(args, row_to_interval)?;
        let mut intervals = Vec::new();
        for r in rows {
            intervals.push(r?);
        }
        Ok(intervals)
    }
}

fn row_to_interval(row: &rusqlite::Row) -> rusqlite::Result<RestInterval> {
    let category = row
        .get::<_, String>(4)?
        .parse::<RestCategory>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;
    Ok(RestInterval {
        id: row.get(0)?,
        worker_id: row.get(1)?,
        start: row.get(2)?,
        end: row.get(3)?,
        category,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::db::Db;
    use crate::engine::repo::WorkerRepo;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_round_trip_and_filtering() {
        let conn = Db::open_in_memory().unwrap();
        let workers = WorkerRepo::new(&conn);
        let ana = workers.add("ANA", None).unwrap();
        let bia = workers.add("BIA", None).unwrap();
        let repo = IntervalRepo::new(&conn);

        let late = repo.add(ana, d("2024-03-01"), d("2024-03-12")).unwrap();
        let early = repo.add(ana, d("2024-01-01"), d("2024-01-12")).unwrap();
        repo.add(bia, d("2024-02-01"), d("2024-02-12")).unwrap();

        let ids: Vec<_> = repo.list(Some(ana)).unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![early.id, late.id]);
        assert_eq!(repo.list(None).unwrap().len(), 3);
        assert_eq!(repo.get(early.id).unwrap(), early);

        workers.set_active(bia, false).unwrap();
        assert_eq!(repo.list_for_active_workers(None).unwrap().len(), 2);
        assert!(repo.list_for_active_workers(Some(bia)).unwrap().is_empty());
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let conn = Db::open_in_memory().unwrap();
        let workers = WorkerRepo::new(&conn);
        let ana = workers.add("ANA", None).unwrap();
        let repo = IntervalRepo::new(&conn);
        let rest = repo.add(ana, d("2024-01-01"), d("2024-01-12")).unwrap();

        repo.delete(rest.id).unwrap();
        let err = repo.delete(rest.id).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FolgaError>(),
            Some(FolgaError::IntervalNotFound(_))
        ));
    }

    #[test]
    fn test_unknown_category_is_an_error() {
        let conn = Db::open_in_memory().unwrap();
        let ana = WorkerRepo::new(&conn).add("ANA", None).unwrap();
        conn.execute(
            "INSERT INTO rest_intervals (worker_id, start_date, end_date, category)
             VALUES (?1, '2024-01-01', '2024-01-12', 'vacation')",
            params![ana],
        )
        .unwrap();

        assert!(IntervalRepo::new(&conn).list(Some(ana)).is_err());
    }
}

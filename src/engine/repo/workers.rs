//! Worker Repository: workers, archival flag and the cached cycle anchor.

use crate::engine::error::FolgaError;
use crate::engine::types::Worker;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

pub const WORKER_SELECT: &str = "SELECT id, name, role, active, last_rest_end FROM workers";

pub struct WorkerRepo<'a> {
    conn: &'a Connection,
}

impl<'a> WorkerRepo<'a> {
    /// Creates a new repository instance borrowing the connection.
    #[must_use]
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Adds a new active worker.
    ///
    /// # Errors
    /// Returns an error if the insertion fails.
    pub fn add(&self, name: &str, role: Option<&str>) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO workers (name, role, active) VALUES (?1, ?2, 1)",
            params![name, role],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Finds a worker by its internal ID.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn find_by_id(&self, id: i64) -> Result<Option<Worker>> {
        let sql = format!("{WORKER_SELECT} WHERE id = ?1");
        self.conn
            .query_row(&sql, params![id], row_to_worker)
            .optional()
            .context("Search by ID failed")
    }

    /// Fetches a worker that must exist.
    ///
    /// # Errors
    /// Returns `FolgaError::WorkerNotFound` if absent.
    pub fn get(&self, id: i64) -> Result<Worker> {
        self.find_by_id(id)?
            .ok_or_else(|| FolgaError::WorkerNotFound(id.to_string()).into())
    }

    /// Finds a worker by name (case-insensitive).
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn find_by_name(&self, name: &str) -> Result<Option<Worker>> {
        let sql = format!("{WORKER_SELECT} WHERE LOWER(name) = LOWER(?1) ORDER BY id LIMIT 1");
        self.conn
            .query_row(&sql, params![name.trim()], row_to_worker)
            .optional()
            .context("Search by name failed")
    }

    /// Active workers ordered by name.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn list_active(&self) -> Result<Vec<Worker>> {
        self.query_list(&format!("{WORKER_SELECT} WHERE active = 1 ORDER BY name, id"))
    }

    /// Archived workers ordered by name.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn list_archived(&self) -> Result<Vec<Worker>> {
        self.query_list(&format!("{WORKER_SELECT} WHERE active = 0 ORDER BY name, id"))
    }

    /// Every worker, archived included, ordered by ID.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn list_all(&self) -> Result<Vec<Worker>> {
        self.query_list(&format!("{WORKER_SELECT} ORDER BY id"))
    }

    /// Archives (`false`) or restores (`true`) a worker.
    ///
    /// # Errors
    /// Returns `FolgaError::WorkerNotFound` if no such worker exists.
    pub fn set_active(&self, id: i64, active: bool) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE workers SET active = ?1 WHERE id = ?2",
            params![active, id],
        )?;
        if changed == 0 {
            return Err(FolgaError::WorkerNotFound(id.to_string()).into());
        }
        Ok(())
    }

    /// Moves the cached anchor forward to `end`, never backwards.
    ///
    /// The comparison happens inside the UPDATE so a stale reader cannot
    /// overwrite a later value. Returns whether the row changed.
    ///
    /// # Errors
    /// Returns an error if the update fails.
    pub fn advance_last_rest_end(&self, id: i64, end: NaiveDate) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE workers SET last_rest_end = ?1
             WHERE id = ?2 AND (last_rest_end IS NULL OR last_rest_end < ?1)",
            params![end, id],
        )?;
        Ok(changed > 0)
    }

    fn query_list(&self, sql: &str) -> Result<Vec<Worker>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], row_to_worker)?;
        let mut workers = Vec::new();
        for worker in rows {
            workers.push(worker?);
        }
        Ok(workers)
    }
}

/// Converts a database row to a Worker.
///
/// # Errors
/// Returns a `rusqlite` error if data conversion fails.
pub fn row_to_worker(row: &rusqlite::Row) -> rusqlite::Result<Worker> {
    Ok(Worker {
        id: row.get(0)?,
        name: row.get(1)?,
        role: row.get(2)?,
        active: row.get(3)?,
        last_rest_end: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::db::Db;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_active_listing_excludes_archived() {
        let conn = Db::open_in_memory().unwrap();
        let repo = WorkerRepo::new(&conn);
        let zoe = repo.add("ZOE", None).unwrap();
        let ana = repo.add("ANA", Some("Welder")).unwrap();
        let bia = repo.add("BIA", None).unwrap();
        repo.set_active(bia, false).unwrap();

        let active: Vec<_> = repo.list_active().unwrap().into_iter().map(|w| w.id).collect();
        assert_eq!(active, vec![ana, zoe]);
        let archived: Vec<_> = repo.list_archived().unwrap().into_iter().map(|w| w.id).collect();
        assert_eq!(archived, vec![bia]);

        repo.set_active(bia, true).unwrap();
        assert_eq!(repo.list_active().unwrap().len(), 3);
    }

    #[test]
    fn test_missing_worker_is_not_found() {
        let conn = Db::open_in_memory().unwrap();
        let repo = WorkerRepo::new(&conn);
        let err = repo.get(42).unwrap_err();
        assert!(err.downcast_ref::<FolgaError>().is_some_and(FolgaError::is_not_found));
        assert!(repo.set_active(42, false).is_err());
    }

    #[test]
    fn test_anchor_only_moves_forward() {
        let conn = Db::open_in_memory().unwrap();
        let repo = WorkerRepo::new(&conn);
        let id = repo.add("ANA", None).unwrap();

        assert!(repo.advance_last_rest_end(id, d("2024-01-10")).unwrap());
        assert!(!repo.advance_last_rest_end(id, d("2024-01-05")).unwrap());
        assert!(!repo.advance_last_rest_end(id, d("2024-01-10")).unwrap());
        assert!(repo.advance_last_rest_end(id, d("2024-02-01")).unwrap());
        assert_eq!(repo.get(id).unwrap().last_rest_end, Some(d("2024-02-01")));
    }

    #[test]
    fn test_find_by_name_is_case_insensitive() {
        let conn = Db::open_in_memory().unwrap();
        let repo = WorkerRepo::new(&conn);
        let id = repo.add("JOAO SILVA", None).unwrap();
        assert_eq!(repo.find_by_name("joao silva").unwrap().map(|w| w.id), Some(id));
        assert!(repo.find_by_name("maria").unwrap().is_none());
    }
}

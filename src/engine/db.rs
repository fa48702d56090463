use super::error::FolgaError;
use anyhow::{Context, Result};
use rusqlite::Connection;
use std::fs;
use std::path::Path;

pub struct Db;

impl Db {
    /// Creates the database directory and `SQLite` schema at `path`.
    ///
    /// # Errors
    /// Returns error if directory creation, DB opening, or migration fails.
    pub fn init(path: &Path) -> Result<Connection> {
        if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !dir.exists() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create {}", dir.display()))?;
            }
        }

        let conn = Connection::open(path).context("Failed to open database")?;
        Self::migrate(&conn)?;
        Ok(conn)
    }

    /// Connects to an existing database.
    ///
    /// # Errors
    /// Returns `FolgaError::NotInitialized` if the database file does not
    /// exist, or an error if it cannot be opened.
    pub fn connect(path: &Path) -> Result<Connection> {
        if !path.exists() {
            return Err(FolgaError::NotInitialized(path.to_path_buf()).into());
        }
        let conn = Connection::open(path).context("Failed to open database")?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .context("Failed to enable foreign keys")?;
        Ok(conn)
    }

    /// Opens a throwaway in-memory database with the schema applied.
    ///
    /// # Errors
    /// Returns error if migration fails.
    pub fn open_in_memory() -> Result<Connection> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::migrate(&conn)?;
        Ok(conn)
    }

    /// Applies the schema migrations.
    fn migrate(conn: &Connection) -> Result<()> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .context("Failed to enable foreign keys")?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS workers (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                role TEXT,
                active INTEGER NOT NULL DEFAULT 1,
                last_rest_end TEXT
            )",
            [],
        )
        .context("Failed to create workers table")?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS rest_intervals (
                id INTEGER PRIMARY KEY,
                worker_id INTEGER NOT NULL,
                start_date TEXT NOT NULL,
                end_date TEXT NOT NULL,
                category TEXT NOT NULL DEFAULT 'field',
                FOREIGN KEY(worker_id) REFERENCES workers(id) ON DELETE CASCADE
            )",
            [],
        )
        .context("Failed to create rest_intervals table")?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_rest_intervals_worker ON rest_intervals(worker_id)",
            [],
        )
        .context("Failed to create rest interval index")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_requires_init() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".folga").join("state.db");

        let err = Db::connect(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FolgaError>(),
            Some(FolgaError::NotInitialized(_))
        ));

        Db::init(&path).unwrap();
        assert!(Db::connect(&path).is_ok());
        // init is repeatable
        assert!(Db::init(&path).is_ok());
    }
}

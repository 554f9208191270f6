//! Local persistence for finished trips.
//!
//! One `SQLite` database at `<root>/trips.sqlite` holds every finished trip:
//!
//! ```text
//! trips(id INTEGER PRIMARY KEY AUTOINCREMENT,
//!       datetime TEXT,        -- "YYYY-MM-DD HH:MM:SS", local time
//!       stopped_time REAL,    -- seconds, unrounded
//!       moving_time REAL,     -- seconds, unrounded
//!       total_fare REAL)      -- euros, unrounded
//! ```
//!
//! Insertion order is the display order: history lists the newest trip first.

use std::{fs, io, path::PathBuf};

use jiff::civil::DateTime;
use rusqlite::Connection;

use crate::model::TripRecord;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("corrupt trip record: {0}")]
    Corrupt(String),
}

pub type Result<T> = core::result::Result<T, StorageError>;

/// Text form of the `datetime` column.
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The trip record store, backed by a single `SQLite` file.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Opens the store rooted at the given directory, creating the directory
    /// and the schema if missing.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        let conn = Connection::open(root.join("trips.sqlite"))?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS trips (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 datetime TEXT,
                 stopped_time REAL,
                 moving_time REAL,
                 total_fare REAL
             )",
            [],
        )?;
        Ok(Self { conn })
    }

    /// Returns the default storage root: `~/.farebox/`.
    pub fn default_root() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".farebox"))
    }

    /// Appends a finished trip to the log.
    pub fn insert_trip(&self, record: &TripRecord) -> Result<()> {
        self.conn.execute(
            "INSERT INTO trips (datetime, stopped_time, moving_time, total_fare)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                record.finished_at.strftime(DATETIME_FORMAT).to_string(),
                record.stopped_secs,
                record.moving_secs,
                record.total_fare,
            ],
        )?;
        Ok(())
    }

    /// Loads every recorded trip, most recently inserted first.
    pub fn list_trips(&self) -> Result<Vec<TripRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT datetime, stopped_time, moving_time, total_fare
             FROM trips ORDER BY id DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, f64>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, f64>(3)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (datetime, stopped_secs, moving_secs, total_fare) = row?;
            let finished_at = DateTime::strptime(DATETIME_FORMAT, &datetime)
                .map_err(|e| StorageError::Corrupt(format!("invalid datetime: {e}")))?;
            records.push(TripRecord {
                finished_at,
                stopped_secs,
                moving_secs,
                total_fare,
            });
        }
        Ok(records)
    }
}

//! SQLite database - schema definitions and connection management
//!
//! Table operations live in the tables/ subdirectory.

use rusqlite::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use super::StoreError;

/// Main database wrapper; the connection is serialized behind a Mutex
pub struct Database {
    pub(crate) conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the database file and initialize the schema.
    /// `:memory:` opens a private in-memory database.
    pub fn new(database_url: &str) -> Result<Self, StoreError> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = Path::new(database_url).parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    log::warn!("Failed to create database directory {:?}: {}", parent, e);
                }
            }
        }

        let conn = Connection::open(database_url)?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init()?;
        Ok(db)
    }

    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    fn init(&self) -> Result<(), StoreError> {
        let conn = self.lock()?;

        // Contact form inquiries; rows are only ever inserted
        conn.execute(
            "CREATE TABLE IF NOT EXISTS contact_submissions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                phone TEXT NOT NULL,
                subject TEXT NOT NULL,
                message TEXT NOT NULL,
                preferred_visit_date TEXT,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_contact_submissions_created_at ON contact_submissions(created_at)",
            [],
        )?;

        Ok(())
    }
}

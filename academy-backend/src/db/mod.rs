//! Persistence for contact submissions
//!
//! Handlers talk to the `SubmissionStore` trait; `Database` is the SQLite
//! implementation used in production.

mod sqlite;
mod tables;

use thiserror::Error;

use crate::models::{ContactSubmission, NewContactSubmission};

pub use sqlite::Database;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("database connection lock poisoned")]
    LockPoisoned,

    #[error("stored record is corrupt: {0}")]
    Corrupt(String),
}

pub trait SubmissionStore: Send + Sync {
    /// Persist one submission and return the stored record
    fn insert_submission(&self, submission: &NewContactSubmission) -> Result<ContactSubmission, StoreError>;

    fn count_submissions(&self) -> Result<i64, StoreError>;

    /// Cheap liveness check for the health endpoint
    fn ping(&self) -> Result<(), StoreError>;
}

//! Contact submission database operations

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, OptionalExtension};

use crate::models::{ContactSubmission, NewContactSubmission};
use super::super::{Database, StoreError, SubmissionStore};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw row as stored; dates are TEXT columns
struct SubmissionRow {
    id: i64,
    name: String,
    email: String,
    phone: String,
    subject: String,
    message: String,
    preferred_visit_date: Option<String>,
    created_at: String,
}

impl SubmissionRow {
    fn into_submission(self) -> Result<ContactSubmission, StoreError> {
        let preferred_visit_date = self
            .preferred_visit_date
            .map(|d| {
                NaiveDate::parse_from_str(&d, DATE_FORMAT)
                    .map_err(|e| StoreError::Corrupt(format!("visit date {:?}: {}", d, e)))
            })
            .transpose()?;

        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| StoreError::Corrupt(format!("created_at {:?}: {}", self.created_at, e)))?
            .with_timezone(&Utc);

        Ok(ContactSubmission {
            id: self.id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            subject: self.subject,
            message: self.message,
            preferred_visit_date,
            created_at,
        })
    }
}

impl Database {
    /// Insert a submission stamped with the current time
    pub fn create_contact_submission(
        &self,
        submission: &NewContactSubmission,
    ) -> Result<ContactSubmission, StoreError> {
        let conn = self.lock()?;
        let now = Utc::now().to_rfc3339();
        let visit_date = submission
            .preferred_visit_date
            .map(|d| d.format(DATE_FORMAT).to_string());

        conn.execute(
            "INSERT INTO contact_submissions (name, email, phone, subject, message, preferred_visit_date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                submission.name,
                submission.email,
                submission.phone,
                submission.subject,
                submission.message,
                visit_date,
                now,
            ],
        )?;

        let id = conn.last_insert_rowid();
        drop(conn);

        self.get_contact_submission(id)?
            .ok_or_else(|| StoreError::Corrupt(format!("submission {} missing after insert", id)))
    }

    pub fn get_contact_submission(&self, id: i64) -> Result<Option<ContactSubmission>, StoreError> {
        let conn = self.lock()?;

        let row = conn
            .query_row(
                "SELECT id, name, email, phone, subject, message, preferred_visit_date, created_at
                 FROM contact_submissions WHERE id = ?1",
                [id],
                |row| {
                    Ok(SubmissionRow {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        email: row.get(2)?,
                        phone: row.get(3)?,
                        subject: row.get(4)?,
                        message: row.get(5)?,
                        preferred_visit_date: row.get(6)?,
                        created_at: row.get(7)?,
                    })
                },
            )
            .optional()?;

        row.map(SubmissionRow::into_submission).transpose()
    }

    pub fn count_contact_submissions(&self) -> Result<i64, StoreError> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM contact_submissions", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl SubmissionStore for Database {
    fn insert_submission(&self, submission: &NewContactSubmission) -> Result<ContactSubmission, StoreError> {
        self.create_contact_submission(submission)
    }

    fn count_submissions(&self) -> Result<i64, StoreError> {
        self.count_contact_submissions()
    }

    fn ping(&self) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NewContactSubmission {
        NewContactSubmission {
            name: "Priya Sharma".to_string(),
            email: "priya@example.com".to_string(),
            phone: "+91-9876543210".to_string(),
            subject: "Admissions enquiry".to_string(),
            message: "I would like to know about Grade 6 admissions.".to_string(),
            preferred_visit_date: NaiveDate::from_ymd_opt(2026, 11, 3),
        }
    }

    #[test]
    fn test_insert_and_read_back() {
        let db = Database::new(":memory:").unwrap();
        let before = Utc::now();

        let stored = db.create_contact_submission(&sample()).unwrap();
        assert!(stored.id > 0);
        assert_eq!(stored.name, "Priya Sharma");
        assert_eq!(stored.preferred_visit_date, NaiveDate::from_ymd_opt(2026, 11, 3));
        assert!(stored.created_at >= before - chrono::Duration::seconds(1));

        let fetched = db.get_contact_submission(stored.id).unwrap().unwrap();
        assert_eq!(fetched, stored);
        assert_eq!(db.count_contact_submissions().unwrap(), 1);
    }

    #[test]
    fn test_missing_visit_date_is_null() {
        let db = Database::new(":memory:").unwrap();
        let mut submission = sample();
        submission.preferred_visit_date = None;

        let stored = db.insert_submission(&submission).unwrap();
        assert!(stored.preferred_visit_date.is_none());

        let conn = db.lock().unwrap();
        let raw: Option<String> = conn
            .query_row(
                "SELECT preferred_visit_date FROM contact_submissions WHERE id = ?1",
                [stored.id],
                |row| row.get(0),
            )
            .unwrap();
        assert!(raw.is_none());
    }

    #[test]
    fn test_unknown_id() {
        let db = Database::new(":memory:").unwrap();
        assert!(db.get_contact_submission(42).unwrap().is_none());
        assert!(db.ping().is_ok());
    }

    #[test]
    fn test_file_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("academy.db");
        let path = path.to_str().unwrap();

        {
            let db = Database::new(path).unwrap();
            db.insert_submission(&sample()).unwrap();
            db.insert_submission(&sample()).unwrap();
        }

        let db = Database::new(path).unwrap();
        assert_eq!(db.count_submissions().unwrap(), 2);
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A stored contact form inquiry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
    pub preferred_visit_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// A validated submission that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContactSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
    pub preferred_visit_date: Option<NaiveDate>,
}

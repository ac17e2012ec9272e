//! Shared fixtures for handler tests

use std::sync::Arc;

use crate::config::Config;
use crate::db::{Database, StoreError, SubmissionStore};
use crate::models::{ContactSubmission, NewContactSubmission};
use crate::notify::LogNotifier;
use crate::rate_limit::RateLimiter;
use crate::AppState;

/// Store whose every operation fails
pub struct FailingStore;

impl SubmissionStore for FailingStore {
    fn insert_submission(&self, _submission: &NewContactSubmission) -> Result<ContactSubmission, StoreError> {
        Err(StoreError::LockPoisoned)
    }

    fn count_submissions(&self) -> Result<i64, StoreError> {
        Err(StoreError::LockPoisoned)
    }

    fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::LockPoisoned)
    }
}

pub fn test_config() -> Config {
    Config::from_lookup(|_| None).expect("default config is valid")
}

pub fn test_state_with_store(store: Arc<dyn SubmissionStore>) -> AppState {
    let config = test_config();
    AppState {
        store,
        rate_limiter: Arc::new(RateLimiter::new(
            config.rate_limit_max_requests,
            config.rate_limit_window,
        )),
        notifier: Arc::new(LogNotifier::new(config.admin_email.clone())),
        config,
    }
}

pub fn test_state() -> AppState {
    let db = Database::new(":memory:").expect("in-memory database opens");
    test_state_with_store(Arc::new(db))
}

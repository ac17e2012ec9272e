//! Staff notification for new contact submissions
//!
//! Runs after the submission is stored. Failures are reported to the caller
//! but the contact handler only logs them.

mod webhook;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::config::Config;
use crate::models::ContactSubmission;

pub use webhook::WebhookNotifier;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("webhook request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("webhook returned status {0}")]
    Status(u16),
}

#[async_trait]
pub trait ContactNotifier: Send + Sync {
    fn name(&self) -> &'static str;

    async fn notify(&self, submission: &ContactSubmission) -> Result<(), NotifyError>;
}

/// The message staff receive for one submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

pub fn render_email(submission: &ContactSubmission, admin_email: &str) -> ContactEmail {
    let visit_date = submission
        .preferred_visit_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "Not specified".to_string());

    let body = format!(
        "New Contact Form Submission\n\n\
         Name: {}\n\
         Email: {}\n\
         Phone: {}\n\
         Subject: {}\n\
         Preferred Visit Date: {}\n\
         Received: {}\n\n\
         Message:\n{}\n",
        submission.name,
        submission.email,
        submission.phone,
        submission.subject,
        visit_date,
        submission.created_at.to_rfc3339(),
        submission.message,
    );

    ContactEmail {
        to: admin_email.to_string(),
        subject: format!("New Contact Form Submission: {}", submission.subject),
        body,
    }
}

/// Writes the staff e-mail to the log; used when no delivery hook is configured
pub struct LogNotifier {
    admin_email: String,
}

impl LogNotifier {
    pub fn new(admin_email: impl Into<String>) -> Self {
        Self {
            admin_email: admin_email.into(),
        }
    }
}

#[async_trait]
impl ContactNotifier for LogNotifier {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn notify(&self, submission: &ContactSubmission) -> Result<(), NotifyError> {
        let email = render_email(submission, &self.admin_email);
        log::info!(
            "[NOTIFY] Email for {} (submission #{}): {}\n{}",
            email.to,
            submission.id,
            email.subject,
            email.body
        );
        Ok(())
    }
}

/// Pick the notifier for this deployment
pub fn build_notifier(config: &Config) -> Arc<dyn ContactNotifier> {
    match &config.contact_webhook_url {
        Some(url) => match WebhookNotifier::new(url.clone()) {
            Ok(webhook) => Arc::new(webhook),
            Err(e) => {
                log::error!("Failed to build webhook client, notifying via log instead: {}", e);
                Arc::new(LogNotifier::new(config.admin_email.clone()))
            }
        },
        None => Arc::new(LogNotifier::new(config.admin_email.clone())),
    }
}

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::{ContactNotifier, NotifyError};
use crate::models::ContactSubmission;

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// POSTs each stored submission as JSON to a relay (mail service, spreadsheet hook)
pub struct WebhookNotifier {
    url: String,
    client: Client,
}

impl WebhookNotifier {
    pub fn new(url: String) -> Result<Self, NotifyError> {
        let client = Client::builder().timeout(WEBHOOK_TIMEOUT).build()?;
        Ok(Self { url, client })
    }
}

#[async_trait]
impl ContactNotifier for WebhookNotifier {
    fn name(&self) -> &'static str {
        "webhook"
    }

    async fn notify(&self, submission: &ContactSubmission) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({
                "event": "contact_submission",
                "submission": submission,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status.as_u16()));
        }

        log::debug!("[NOTIFY] Webhook accepted submission #{}", submission.id);
        Ok(())
    }
}

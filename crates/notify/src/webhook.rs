//! Webhook lead delivery
//!
//! Posts the lead payload as JSON to a configured HTTP endpoint.

use std::time::Duration;

use async_trait::async_trait;

use crate::{LeadNotification, LeadNotifier, NotifyError};

/// Delivers leads to an HTTP webhook
pub struct WebhookNotifier {
    client: reqwest::Client,
    endpoint: String,
}

impl WebhookNotifier {
    /// Create a notifier for the given endpoint
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, NotifyError> {
        let endpoint = endpoint.into();

        let url: reqwest::Url = endpoint
            .parse()
            .map_err(|e| NotifyError::InvalidConfig(format!("{}: {}", endpoint, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(NotifyError::InvalidConfig(format!(
                "Unsupported scheme '{}' in {}",
                url.scheme(),
                endpoint
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotifyError::InvalidConfig(e.to_string()))?;

        Ok(Self { client, endpoint })
    }

    /// Configured endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LeadNotifier for WebhookNotifier {
    async fn notify(&self, lead: &LeadNotification) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(lead)
            .send()
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status.as_u16()));
        }

        tracing::info!(endpoint = %self.endpoint, "Lead delivered");
        Ok(())
    }
}

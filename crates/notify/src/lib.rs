//! Outbound lead notification
//!
//! When a visitor completes onboarding, the host layer dispatches the
//! collected contact details here exactly once per session. Delivery is
//! asynchronous and best-effort: a failure is logged for diagnostics
//! and never changes conversation state or visitor-visible output.

pub mod webhook;

pub use webhook::WebhookNotifier;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Notification errors
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Invalid notifier configuration: {0}")]
    InvalidConfig(String),

    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Endpoint returned status {0}")]
    Status(u16),
}

/// Lead payload dispatched when onboarding completes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadNotification {
    /// Visitor name, as entered
    pub name: String,
    /// Validated 10-digit contact number
    pub phone: String,
    /// Fixed subject line from configuration
    pub subject: String,
}

impl LeadNotification {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            subject: subject.into(),
        }
    }
}

/// Lead delivery backend
///
/// Implement this trait to integrate with a CRM, mailer, or messaging
/// gateway.
#[async_trait]
pub trait LeadNotifier: Send + Sync {
    /// Deliver one lead
    async fn notify(&self, lead: &LeadNotification) -> Result<(), NotifyError>;
}

/// Stub notifier for development and tests
///
/// Records payloads in memory without contacting any external system.
#[derive(Default)]
pub struct StubNotifier {
    sent: parking_lot::Mutex<Vec<LeadNotification>>,
}

impl StubNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Payloads delivered so far
    pub fn sent(&self) -> Vec<LeadNotification> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl LeadNotifier for StubNotifier {
    async fn notify(&self, lead: &LeadNotification) -> Result<(), NotifyError> {
        tracing::info!(name = %lead.name, "Lead recorded by stub notifier");
        self.sent.lock().push(lead.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stub_records_leads() {
        let notifier = StubNotifier::new();
        let lead = LeadNotification::new("Asha", "9876543210", "New admission inquiry");

        notifier.notify(&lead).await.unwrap();
        notifier.notify(&lead).await.unwrap();

        let sent = notifier.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].name, "Asha");
        assert_eq!(sent[0].phone, "9876543210");
    }

    #[test]
    fn test_lead_serializes_flat() {
        let lead = LeadNotification::new("Asha", "9876543210", "Subject");
        let json = serde_json::to_value(&lead).unwrap();
        assert_eq!(json["name"], "Asha");
        assert_eq!(json["phone"], "9876543210");
        assert_eq!(json["subject"], "Subject");
    }
}

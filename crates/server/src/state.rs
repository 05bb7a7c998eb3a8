//! Application state
//!
//! Shared state across all handlers.

use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;

use chat_widget_config::{IntentCatalog, MessageTemplates, Settings, WidgetConfig};
use chat_widget_notify::{LeadNotification, LeadNotifier};

use crate::session::{Session, SessionManager};

/// Application state
#[derive(Clone)]
pub struct AppState {
    /// Configuration wrapped in RwLock for hot-reload support
    pub config: Arc<RwLock<Settings>>,
    /// Intent catalog shared by all sessions
    pub catalog: Arc<IntentCatalog>,
    /// Message templates shared by all sessions
    pub messages: Arc<MessageTemplates>,
    /// Quick-question menu items
    pub quick_questions: Arc<Vec<String>>,
    /// Session manager
    pub sessions: Arc<SessionManager>,
    /// Outbound lead delivery
    pub notifier: Arc<dyn LeadNotifier>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: Settings, widget: WidgetConfig, notifier: Arc<dyn LeadNotifier>) -> Self {
        let sessions = SessionManager::with_config(
            config.server.max_sessions,
            Duration::from_secs(config.server.session_idle_timeout_secs),
            Duration::from_secs(config.server.cleanup_interval_secs),
        );

        Self {
            config: Arc::new(RwLock::new(config)),
            catalog: Arc::new(widget.catalog),
            messages: Arc::new(widget.messages),
            quick_questions: Arc::new(widget.quick_questions),
            sessions: Arc::new(sessions),
            notifier,
        }
    }

    /// Create a new visitor session
    pub fn create_session(&self) -> Result<Arc<Session>, crate::ServerError> {
        self.sessions
            .create(self.catalog.clone(), self.messages.clone())
    }

    /// Fire the one-time lead notification for a completed onboarding
    ///
    /// Dispatch is fire-and-forget: the conversation never waits on the
    /// result, and a delivery failure is only logged.
    pub fn dispatch_lead(&self, session: &Session) {
        let Some((name, phone)) = session.contact_details() else {
            tracing::warn!(
                session_id = %session.id,
                "Onboarding completed without full contact details"
            );
            return;
        };

        let subject = self.config.read().notification.subject.clone();
        let notifier = self.notifier.clone();
        let session_id = session.id.clone();

        tokio::spawn(async move {
            let lead = LeadNotification::new(name, phone, subject);
            match notifier.notify(&lead).await {
                Ok(()) => {
                    tracing::info!(session_id = %session_id, "Lead notification dispatched");
                }
                Err(e) => {
                    tracing::warn!(
                        session_id = %session_id,
                        error = %e,
                        "Lead notification failed"
                    );
                }
            }
        });
    }
}

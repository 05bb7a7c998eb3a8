//! Session management
//!
//! Each visitor session owns one flow controller. Sessions live in
//! memory only and are evicted after a period of inactivity; there is
//! no persistence across restarts.

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

use chat_widget_config::{IntentCatalog, MessageTemplates};
use chat_widget_core::ConversationState;
use chat_widget_engine::{FlowController, Reply};

use crate::ServerError;

/// A single visitor session
pub struct Session {
    /// Session ID
    pub id: String,
    /// The session's flow controller
    flow: Mutex<FlowController>,
    /// Creation time
    pub created_at: Instant,
    /// Last activity
    last_activity: RwLock<Instant>,
}

impl Session {
    /// Create a new session with a fresh flow controller
    pub fn new(
        id: impl Into<String>,
        catalog: Arc<IntentCatalog>,
        messages: Arc<MessageTemplates>,
    ) -> Self {
        Self {
            id: id.into(),
            flow: Mutex::new(FlowController::new(catalog, messages)),
            created_at: Instant::now(),
            last_activity: RwLock::new(Instant::now()),
        }
    }

    /// Handle one visitor message
    ///
    /// Messages within a session are strictly sequential; the lock
    /// ensures one message is fully processed before the next.
    pub fn handle(&self, input: &str) -> Reply {
        self.touch();
        self.flow.lock().handle(input)
    }

    /// Current conversation state
    pub fn state(&self) -> ConversationState {
        self.flow.lock().state()
    }

    /// Number of visitor messages handled
    pub fn turn_count(&self) -> usize {
        self.flow.lock().turn_count()
    }

    /// Collected contact details, once both fields are present
    pub fn contact_details(&self) -> Option<(String, String)> {
        let flow = self.flow.lock();
        let profile = flow.profile();
        match (profile.name(), profile.phone()) {
            (Some(name), Some(phone)) => Some((name.to_string(), phone.to_string())),
            _ => None,
        }
    }

    /// Update last activity
    pub fn touch(&self) {
        *self.last_activity.write() = Instant::now();
    }

    /// Check if session is expired
    pub fn is_expired(&self, timeout: Duration) -> bool {
        self.last_activity.read().elapsed() > timeout
    }
}

/// Session manager
pub struct SessionManager {
    sessions: RwLock<HashMap<String, Arc<Session>>>,
    max_sessions: usize,
    session_timeout: Duration,
    cleanup_interval: Duration,
}

impl SessionManager {
    /// Create a new session manager
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions,
            session_timeout: Duration::from_secs(1800),
            cleanup_interval: Duration::from_secs(300),
        }
    }

    /// Create a new session manager with custom timeout and cleanup interval
    pub fn with_config(
        max_sessions: usize,
        session_timeout: Duration,
        cleanup_interval: Duration,
    ) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions,
            session_timeout,
            cleanup_interval,
        }
    }

    /// Start a background task that periodically evicts idle sessions.
    ///
    /// Returns a shutdown sender that can be used to stop the task.
    pub fn start_cleanup_task(self: &Arc<Self>) -> watch::Sender<bool> {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let manager = Arc::clone(self);
        let interval = manager.cleanup_interval;

        tokio::spawn(async move {
            let mut interval_timer = tokio::time::interval(interval);
            interval_timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = interval_timer.tick() => {
                        let before = manager.count();
                        manager.cleanup_expired();
                        let after = manager.count();
                        if before != after {
                            tracing::info!(
                                "Session cleanup: removed {} idle sessions ({} remaining)",
                                before - after,
                                after
                            );
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            tracing::info!("Session cleanup task shutting down");
                            break;
                        }
                    }
                }
            }
        });

        shutdown_tx
    }

    /// Create a new session
    pub fn create(
        &self,
        catalog: Arc<IntentCatalog>,
        messages: Arc<MessageTemplates>,
    ) -> Result<Arc<Session>, ServerError> {
        let mut sessions = self.sessions.write();

        if sessions.len() >= self.max_sessions {
            // Try to reclaim capacity from idle sessions first
            self.cleanup_expired_internal(&mut sessions);

            if sessions.len() >= self.max_sessions {
                return Err(ServerError::Session("Max sessions reached".to_string()));
            }
        }

        let id = uuid::Uuid::new_v4().to_string();
        let session = Arc::new(Session::new(&id, catalog, messages));
        sessions.insert(id.clone(), session.clone());

        tracing::info!(session_id = %id, "Session created");
        Ok(session)
    }

    /// Get a session by ID
    pub fn get(&self, id: &str) -> Option<Arc<Session>> {
        self.sessions.read().get(id).cloned()
    }

    /// Remove a session
    pub fn remove(&self, id: &str) {
        if self.sessions.write().remove(id).is_some() {
            tracing::info!(session_id = %id, "Session removed");
        }
    }

    /// List session IDs
    pub fn list(&self) -> Vec<String> {
        self.sessions.read().keys().cloned().collect()
    }

    /// Number of live sessions
    pub fn count(&self) -> usize {
        self.sessions.read().len()
    }

    /// Remove sessions idle longer than the configured timeout
    pub fn cleanup_expired(&self) {
        let mut sessions = self.sessions.write();
        self.cleanup_expired_internal(&mut sessions);
    }

    fn cleanup_expired_internal(&self, sessions: &mut HashMap<String, Arc<Session>>) {
        sessions.retain(|id, session| {
            let keep = !session.is_expired(self.session_timeout);
            if !keep {
                tracing::debug!(session_id = %id, "Evicting idle session");
            }
            keep
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(max: usize, timeout: Duration) -> SessionManager {
        SessionManager::with_config(max, timeout, Duration::from_secs(60))
    }

    fn content() -> (Arc<IntentCatalog>, Arc<MessageTemplates>) {
        (
            Arc::new(IntentCatalog::builtin()),
            Arc::new(MessageTemplates::default()),
        )
    }

    #[test]
    fn test_create_and_get() {
        let manager = manager(10, Duration::from_secs(60));
        let (catalog, messages) = content();

        let session = manager.create(catalog, messages).unwrap();
        assert_eq!(manager.count(), 1);

        let fetched = manager.get(&session.id).unwrap();
        assert_eq!(fetched.id, session.id);
        assert_eq!(fetched.state(), ConversationState::AwaitingName);
    }

    #[test]
    fn test_sessions_are_independent() {
        let manager = manager(10, Duration::from_secs(60));
        let (catalog, messages) = content();

        let a = manager
            .create(catalog.clone(), messages.clone())
            .unwrap();
        let b = manager.create(catalog, messages).unwrap();

        a.handle("Asha");
        assert_eq!(a.state(), ConversationState::AwaitingPhone);
        assert_eq!(b.state(), ConversationState::AwaitingName);
    }

    #[test]
    fn test_max_sessions_enforced() {
        let manager = manager(2, Duration::from_secs(60));
        let (catalog, messages) = content();

        manager.create(catalog.clone(), messages.clone()).unwrap();
        manager.create(catalog.clone(), messages.clone()).unwrap();
        assert!(manager.create(catalog, messages).is_err());
    }

    #[test]
    fn test_idle_sessions_reclaimed_at_capacity() {
        let manager = manager(1, Duration::from_millis(0));
        let (catalog, messages) = content();

        manager.create(catalog.clone(), messages.clone()).unwrap();
        // The earlier session is already past the zero-length timeout
        std::thread::sleep(Duration::from_millis(5));
        assert!(manager.create(catalog, messages).is_ok());
        assert_eq!(manager.count(), 1);
    }

    #[test]
    fn test_remove() {
        let manager = manager(10, Duration::from_secs(60));
        let (catalog, messages) = content();

        let session = manager.create(catalog, messages).unwrap();
        manager.remove(&session.id);
        assert!(manager.get(&session.id).is_none());
        assert_eq!(manager.count(), 0);
    }

    #[test]
    fn test_contact_details_after_onboarding() {
        let manager = manager(10, Duration::from_secs(60));
        let (catalog, messages) = content();
        let session = manager.create(catalog, messages).unwrap();

        assert!(session.contact_details().is_none());
        session.handle("Asha");
        assert!(session.contact_details().is_none());
        session.handle("9876543210");
        assert_eq!(
            session.contact_details(),
            Some(("Asha".to_string(), "9876543210".to_string()))
        );
    }
}

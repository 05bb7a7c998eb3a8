//! Conversational flow controller
//!
//! Owns the session's conversation state and visitor profile, and
//! decides per message whether to advance the onboarding sequence or
//! delegate to the intent resolver.

use std::sync::Arc;

use serde::Serialize;

use chat_widget_config::{IntentCatalog, MessageTemplates};
use chat_widget_core::{
    is_valid_phone, ConversationState, Turn, TurnMetadata, VisitorProfile,
};

use crate::resolver::IntentResolver;

/// Outcome of handling one visitor message
#[derive(Debug, Clone, Serialize)]
pub struct Reply {
    /// Reply text; embedded newlines are rendered as line breaks
    pub text: String,
    /// Whether the quick-question menu should be shown with this reply
    pub show_menu: bool,
    /// True exactly once per session, on the transition into free-form
    /// mode. The caller uses this to fire the lead notification.
    pub onboarding_just_completed: bool,
}

impl Reply {
    fn new(text: impl Into<String>, show_menu: bool) -> Self {
        Self {
            text: text.into(),
            show_menu,
            onboarding_just_completed: false,
        }
    }

    fn completed(mut self) -> Self {
        self.onboarding_just_completed = true;
        self
    }
}

/// Per-session flow controller
///
/// One instance per visitor session; never shared across sessions. The
/// controller performs no I/O and holds no timers - every `handle` call
/// runs to completion synchronously and always produces a reply.
pub struct FlowController {
    state: ConversationState,
    profile: VisitorProfile,
    resolver: IntentResolver,
    messages: Arc<MessageTemplates>,
    transcript: Vec<Turn>,
}

impl FlowController {
    /// Create a fresh controller in the initial onboarding state
    pub fn new(catalog: Arc<IntentCatalog>, messages: Arc<MessageTemplates>) -> Self {
        Self {
            state: ConversationState::default(),
            profile: VisitorProfile::new(),
            resolver: IntentResolver::new(catalog),
            messages,
            transcript: Vec::new(),
        }
    }

    /// Handle one visitor message
    ///
    /// The caller must pass a non-empty trimmed string; empty input is
    /// filtered at the boundary and never reaches this method.
    pub fn handle(&mut self, input: &str) -> Reply {
        self.transcript
            .push(Turn::user(input).with_metadata(TurnMetadata::new().with_state(self.state)));

        let (reply, intent) = match self.state {
            ConversationState::AwaitingName => (self.handle_name(input), None),
            ConversationState::AwaitingPhone => (self.handle_phone(input), None),
            ConversationState::FreeForm => self.handle_enquiry(input),
        };

        let mut metadata = TurnMetadata::new().with_state(self.state);
        if let Some(intent) = intent {
            metadata = metadata.with_intent(intent);
        }
        self.transcript
            .push(Turn::bot(&reply.text).with_metadata(metadata));

        reply
    }

    fn handle_name(&mut self, input: &str) -> Reply {
        // Stored verbatim; the boundary has already trimmed the message
        self.profile.record_name(input);
        self.advance(ConversationState::AwaitingPhone);
        tracing::debug!(name = %input, "Visitor name collected");

        Reply::new(self.messages.render_name_ack(input), false)
    }

    fn handle_phone(&mut self, input: &str) -> Reply {
        if !is_valid_phone(input) {
            // Stay in AwaitingPhone; there is no retry limit
            tracing::debug!("Rejected contact number, re-prompting");
            return Reply::new(self.messages.phone_reprompt.clone(), false);
        }

        self.profile.record_phone(input);
        self.advance(ConversationState::FreeForm);
        tracing::info!(
            name = %self.profile.display_name(),
            "Onboarding complete"
        );

        Reply::new(self.messages.completion_ack.clone(), true).completed()
    }

    fn handle_enquiry(&mut self, input: &str) -> (Reply, Option<String>) {
        let intent = self.resolver.classify(input).map(|e| e.key.clone());
        let text = self.resolver.resolve(input).to_string();
        tracing::debug!(intent = ?intent, "Resolved enquiry");

        (Reply::new(text, true), intent)
    }

    fn advance(&mut self, target: ConversationState) {
        if !self.state.can_transition_to(target) {
            tracing::error!(from = %self.state, to = %target, "Invalid state transition ignored");
            return;
        }
        self.state = target;
    }

    /// Current conversation state
    pub fn state(&self) -> ConversationState {
        self.state
    }

    /// Collected visitor profile
    pub fn profile(&self) -> &VisitorProfile {
        &self.profile
    }

    /// Session transcript (oldest first)
    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    /// Number of visitor messages handled so far
    pub fn turn_count(&self) -> usize {
        self.transcript
            .iter()
            .filter(|t| t.role == chat_widget_core::TurnRole::User)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> FlowController {
        FlowController::new(
            Arc::new(IntentCatalog::builtin()),
            Arc::new(MessageTemplates::default()),
        )
    }

    #[test]
    fn test_initial_state() {
        let flow = controller();
        assert_eq!(flow.state(), ConversationState::AwaitingName);
        assert!(flow.profile().name().is_none());
        assert_eq!(flow.turn_count(), 0);
    }

    #[test]
    fn test_name_step() {
        let mut flow = controller();
        let reply = flow.handle("Asha");

        assert_eq!(
            reply.text,
            "Thank you, Asha. Please share your contact number:"
        );
        assert!(!reply.show_menu);
        assert!(!reply.onboarding_just_completed);
        assert_eq!(flow.state(), ConversationState::AwaitingPhone);
        assert_eq!(flow.profile().name(), Some("Asha"));
    }

    #[test]
    fn test_invalid_phone_keeps_state() {
        let mut flow = controller();
        flow.handle("Asha");

        for input in ["12345", "123-456-7890", "abcdefghij", "12345678901"] {
            let reply = flow.handle(input);
            assert_eq!(reply.text, "Please enter a valid 10-digit contact number:");
            assert!(!reply.show_menu);
            assert!(!reply.onboarding_just_completed);
            assert_eq!(flow.state(), ConversationState::AwaitingPhone);
            assert!(flow.profile().phone().is_none());
        }
    }

    #[test]
    fn test_phone_retries_are_unbounded() {
        let mut flow = controller();
        flow.handle("Asha");

        for _ in 0..25 {
            flow.handle("nope");
        }
        assert_eq!(flow.state(), ConversationState::AwaitingPhone);

        let reply = flow.handle("9876543210");
        assert!(reply.onboarding_just_completed);
    }

    #[test]
    fn test_valid_phone_completes_onboarding() {
        let mut flow = controller();
        flow.handle("Asha");
        let reply = flow.handle("9876543210");

        assert_eq!(reply.text, "Thank you! How can I help you today?");
        assert!(reply.show_menu);
        assert!(reply.onboarding_just_completed);
        assert_eq!(flow.state(), ConversationState::FreeForm);
        assert_eq!(flow.profile().phone(), Some("9876543210"));
        assert!(flow.profile().is_complete());
    }

    #[test]
    fn test_completion_flag_fires_exactly_once() {
        let mut flow = controller();
        assert!(!flow.handle("Asha").onboarding_just_completed);
        assert!(!flow.handle("98765").onboarding_just_completed);
        assert!(flow.handle("9876543210").onboarding_just_completed);
        assert!(!flow.handle("What is the fee structure?").onboarding_just_completed);
        assert!(!flow.handle("hello").onboarding_just_completed);
    }

    #[test]
    fn test_free_form_delegates_to_resolver() {
        let mut flow = controller();
        flow.handle("Asha");
        flow.handle("9876543210");

        let reply = flow.handle("What is the fee structure?");
        assert!(reply.text.starts_with("Fee structure:"));
        assert!(reply.show_menu);

        let reply = flow.handle("hello there");
        assert!(reply.text.contains("contact our office"));
        assert!(reply.show_menu);
    }

    #[test]
    fn test_menu_visibility_per_state() {
        let mut flow = controller();
        assert!(!flow.handle("Asha").show_menu);
        assert!(!flow.handle("bad number").show_menu);
        assert!(flow.handle("9876543210").show_menu);
        assert!(flow.handle("anything at all").show_menu);
    }

    #[test]
    fn test_profile_fields_never_overwritten() {
        let mut flow = controller();
        flow.handle("Asha");
        flow.handle("9876543210");
        // A free-form message that happens to look like onboarding data
        flow.handle("Ravi");
        flow.handle("0123456789");

        assert_eq!(flow.profile().name(), Some("Asha"));
        assert_eq!(flow.profile().phone(), Some("9876543210"));
    }

    #[test]
    fn test_transcript_records_both_sides() {
        let mut flow = controller();
        flow.handle("Asha");
        flow.handle("9876543210");
        flow.handle("fee?");

        assert_eq!(flow.turn_count(), 3);
        assert_eq!(flow.transcript().len(), 6);

        let last = flow.transcript().last().unwrap();
        assert_eq!(last.role, chat_widget_core::TurnRole::Bot);
        let meta = last.metadata.as_ref().unwrap();
        assert_eq!(meta.intent.as_deref(), Some("fees"));
        assert_eq!(meta.state, Some(ConversationState::FreeForm));
    }
}

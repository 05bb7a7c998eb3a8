//! Conversation state machine and transcript types

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// State of a widget conversation
///
/// A session moves strictly forward: name is collected first, then a
/// contact number, after which the conversation stays in free-form
/// enquiry mode until the session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    /// Waiting for the visitor to introduce themselves
    #[default]
    AwaitingName,
    /// Waiting for a valid 10-digit contact number
    AwaitingPhone,
    /// Onboarding complete, answering enquiries
    FreeForm,
}

/// Static transition map for O(1) lookup
static STATE_TRANSITIONS: Lazy<HashMap<ConversationState, &'static [ConversationState]>> =
    Lazy::new(|| {
        use ConversationState::*;
        let mut map = HashMap::new();
        map.insert(AwaitingName, &[AwaitingPhone] as &[_]);
        map.insert(AwaitingPhone, &[FreeForm] as &[_]);
        map.insert(FreeForm, &[] as &[_]);
        map
    });

impl ConversationState {
    /// Get allowed transitions from the current state
    pub fn allowed_transitions(&self) -> &'static [ConversationState] {
        STATE_TRANSITIONS.get(self).copied().unwrap_or(&[])
    }

    /// Check if transition to the target state is allowed
    pub fn can_transition_to(&self, target: ConversationState) -> bool {
        self.allowed_transitions().contains(&target)
    }

    /// Get the next state in the onboarding sequence
    pub fn next(&self) -> Option<ConversationState> {
        match self {
            ConversationState::AwaitingName => Some(ConversationState::AwaitingPhone),
            ConversationState::AwaitingPhone => Some(ConversationState::FreeForm),
            ConversationState::FreeForm => None,
        }
    }

    /// Whether this state is absorbing (no further transitions)
    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }

    /// Whether onboarding has finished in this state
    pub fn onboarding_complete(&self) -> bool {
        matches!(self, ConversationState::FreeForm)
    }

    /// Get state display name
    pub fn display_name(&self) -> &'static str {
        match self {
            ConversationState::AwaitingName => "Awaiting Name",
            ConversationState::AwaitingPhone => "Awaiting Phone",
            ConversationState::FreeForm => "Free Form",
        }
    }
}

impl std::fmt::Display for ConversationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Role in a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    /// Visitor message
    User,
    /// Widget reply
    Bot,
}

impl TurnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Bot => "bot",
        }
    }
}

impl std::fmt::Display for TurnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single turn in the conversation transcript
///
/// The transcript lives only as long as the session; nothing is
/// persisted across sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// Role of the speaker
    pub role: TurnRole,
    /// Content of the turn
    pub content: String,
    /// When the turn occurred
    pub timestamp: DateTime<Utc>,
    /// Optional metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TurnMetadata>,
}

impl Turn {
    /// Create a new turn
    pub fn new(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
            metadata: None,
        }
    }

    /// Create a visitor turn
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(TurnRole::User, content)
    }

    /// Create a widget turn
    pub fn bot(content: impl Into<String>) -> Self {
        Self::new(TurnRole::Bot, content)
    }

    /// Add metadata to the turn
    pub fn with_metadata(mut self, metadata: TurnMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Metadata for a conversation turn
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TurnMetadata {
    /// Catalog key of the matched intent, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    /// State when this turn occurred
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<ConversationState>,
}

impl TurnMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_intent(mut self, intent: impl Into<String>) -> Self {
        self.intent = Some(intent.into());
        self
    }

    pub fn with_state(mut self, state: ConversationState) -> Self {
        self.state = Some(state);
        self
    }
}

//! Visitor profile collected during onboarding

use serde::{Deserialize, Serialize};

/// Contact details collected from a visitor during onboarding
///
/// Each field is written once: the name during the first onboarding
/// step, the phone only after validation. The profile is owned by one
/// flow controller and discarded with the session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisitorProfile {
    /// Visitor name, stored verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    /// 10-digit contact number
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
}

impl VisitorProfile {
    /// Create a new empty profile
    pub fn new() -> Self {
        Self::default()
    }

    /// Get visitor name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Get contact number
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// Record the visitor's name. The first value sticks.
    pub fn record_name(&mut self, name: impl Into<String>) {
        if self.name.is_none() {
            self.name = Some(name.into());
        }
    }

    /// Record the contact number. The first value sticks.
    pub fn record_phone(&mut self, phone: impl Into<String>) {
        if self.phone.is_none() {
            self.phone = Some(phone.into());
        }
    }

    /// Get display name (name or "Visitor")
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Visitor")
    }

    /// Whether both onboarding fields have been collected
    pub fn is_complete(&self) -> bool {
        self.name.is_some() && self.phone.is_some()
    }
}

//! Widget content configuration
//!
//! Message templates, the quick-question menu, and the intent catalog,
//! loaded together from widget.yaml with compiled-in defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::catalog::IntentCatalog;
use crate::ConfigError;

/// Fixed visitor-facing message templates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageTemplates {
    /// Welcome line shown when a session opens, asking for the name
    #[serde(default = "default_greeting")]
    pub greeting: String,
    /// Acknowledgement after the name step; `{name}` is substituted
    #[serde(default = "default_name_ack")]
    pub name_ack: String,
    /// Re-prompt when the contact number fails validation
    #[serde(default = "default_phone_reprompt")]
    pub phone_reprompt: String,
    /// Acknowledgement when onboarding completes
    #[serde(default = "default_completion_ack")]
    pub completion_ack: String,
}

fn default_greeting() -> String {
    "Welcome to ASIT Institute! Please enter your name:".to_string()
}

fn default_name_ack() -> String {
    "Thank you, {name}. Please share your contact number:".to_string()
}

fn default_phone_reprompt() -> String {
    "Please enter a valid 10-digit contact number:".to_string()
}

fn default_completion_ack() -> String {
    "Thank you! How can I help you today?".to_string()
}

impl Default for MessageTemplates {
    fn default() -> Self {
        Self {
            greeting: default_greeting(),
            name_ack: default_name_ack(),
            phone_reprompt: default_phone_reprompt(),
            completion_ack: default_completion_ack(),
        }
    }
}

impl MessageTemplates {
    /// Render the name acknowledgement with the visitor's name
    pub fn render_name_ack(&self, name: &str) -> String {
        self.name_ack.replace("{name}", name)
    }
}

/// Widget content configuration loaded from widget.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// Message templates
    #[serde(default)]
    pub messages: MessageTemplates,
    /// Ordered quick-reply menu shown once onboarding is complete
    #[serde(default = "default_quick_questions")]
    pub quick_questions: Vec<String>,
    /// Intent catalog
    #[serde(default)]
    pub catalog: IntentCatalog,
}

fn default_quick_questions() -> Vec<String> {
    [
        "What courses do you offer?",
        "How to apply for admission?",
        "What is the fee structure?",
        "Do you have hostel facilities?",
        "What are the eligibility criteria?",
        "Is the institute government recognized?",
        "What are the class timings?",
        "Do you provide placement assistance?",
        "What is the course duration?",
        "Do you offer online classes?",
    ]
    .iter()
    .map(|q| q.to_string())
    .collect()
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            messages: MessageTemplates::default(),
            quick_questions: default_quick_questions(),
            catalog: IntentCatalog::default(),
        }
    }
}

impl WidgetConfig {
    /// Load from a YAML file, or fall back to compiled-in defaults when
    /// the file does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if !path.as_ref().exists() {
            tracing::info!(
                path = %path.as_ref().display(),
                "Widget config not found, using built-in defaults"
            );
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Load from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::FileNotFound(format!("{}: {}", path.as_ref().display(), e))
        })?;

        let mut config: Self =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.catalog.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Validate content invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.messages.greeting.trim().is_empty() {
            return Err(ConfigError::MissingField("messages.greeting".to_string()));
        }
        if !self.messages.name_ack.contains("{name}") {
            return Err(ConfigError::InvalidValue {
                field: "messages.name_ack".to_string(),
                message: "Template must contain the {name} placeholder".to_string(),
            });
        }
        if self.messages.phone_reprompt.trim().is_empty() {
            return Err(ConfigError::MissingField(
                "messages.phone_reprompt".to_string(),
            ));
        }
        if self.messages.completion_ack.trim().is_empty() {
            return Err(ConfigError::MissingField(
                "messages.completion_ack".to_string(),
            ));
        }
        if self.quick_questions.iter().any(|q| q.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "quick_questions".to_string(),
                message: "Menu items must not be empty".to_string(),
            });
        }

        self.catalog.validate()
    }
}

//! Configuration management for the enquiry chat widget
//!
//! Supports loading configuration from:
//! - YAML files (`config/default.yaml`, `config/{env}.yaml`)
//! - Environment variables (`CHAT_WIDGET__` prefix)
//!
//! Widget content — the intent catalog, quick-question menu, and
//! message templates — lives in a separate YAML document
//! (`config/widget.yaml` by default) and falls back to compiled-in
//! defaults when the file is absent.

pub mod catalog;
pub mod settings;
pub mod widget;

pub use catalog::{IntentCatalog, IntentEntry};
pub use settings::{
    load_settings, NotificationConfig, ObservabilityConfig, RuntimeEnvironment, ServerConfig,
    Settings,
};
pub use widget::{MessageTemplates, WidgetConfig};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Environment error: {0}")]
    Environment(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Runtime environment enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - relaxed validation, warnings only
    #[default]
    Development,
    /// Staging mode - stricter validation
    Staging,
    /// Production mode - all validations enforced
    Production,
}

impl RuntimeEnvironment {
    /// Check if this is a production environment
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Check if strict validation should be applied
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Lead notification configuration
    #[serde(default)]
    pub notification: NotificationConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Path to the widget content file (catalog, menu, templates)
    #[serde(default = "default_widget_config_path")]
    pub widget_config_path: String,
}

fn default_widget_config_path() -> String {
    "config/widget.yaml".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            environment: RuntimeEnvironment::default(),
            server: ServerConfig::default(),
            notification: NotificationConfig::default(),
            observability: ObservabilityConfig::default(),
            widget_config_path: default_widget_config_path(),
        }
    }
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_notification()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        let server = &self.server;

        if server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }

        if server.max_sessions == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.max_sessions".to_string(),
                message: "Max sessions must be at least 1".to_string(),
            });
        }

        if server.session_idle_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.session_idle_timeout_secs".to_string(),
                message: "Idle timeout must be at least 1 second".to_string(),
            });
        }

        if !server.ws_path.starts_with('/') {
            return Err(ConfigError::InvalidValue {
                field: "server.ws_path".to_string(),
                message: format!("Path must start with '/', got '{}'", server.ws_path),
            });
        }

        if server.typing_delay_ms > 10_000 {
            return Err(ConfigError::InvalidValue {
                field: "server.typing_delay_ms".to_string(),
                message: format!(
                    "Typing delay too long (maximum 10000ms, got {})",
                    server.typing_delay_ms
                ),
            });
        }

        // CORS validation in production
        if self.environment.is_production() && server.cors_enabled && server.cors_origins.is_empty()
        {
            tracing::warn!(
                "CORS is enabled in production but no origins are configured. \
                 This may block legitimate requests."
            );
        }

        Ok(())
    }

    fn validate_notification(&self) -> Result<(), ConfigError> {
        let notification = &self.notification;

        if notification.enabled && notification.webhook_url.is_none() {
            if self.environment.is_strict() {
                return Err(ConfigError::InvalidValue {
                    field: "notification.webhook_url".to_string(),
                    message: "Webhook URL must be set when notifications are enabled".to_string(),
                });
            }
            tracing::warn!(
                "Notifications enabled without a webhook URL; leads will only be logged"
            );
        }

        if notification.subject.trim().is_empty() {
            return Err(ConfigError::MissingField("notification.subject".to_string()));
        }

        if notification.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "notification.timeout_secs".to_string(),
                message: "Timeout must be at least 1 second".to_string(),
            });
        }

        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// WebSocket path
    #[serde(default = "default_ws_path")]
    pub ws_path: String,

    /// Maximum concurrent visitor sessions
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Seconds of inactivity before a session is evicted
    #[serde(default = "default_idle_timeout")]
    pub session_idle_timeout_secs: u64,

    /// Seconds between idle-session sweeps
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_secs: u64,

    /// Artificial "typing" delay before a reply is delivered, in ms
    #[serde(default = "default_typing_delay")]
    pub typing_delay_ms: u64,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// CORS allowed origins
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_ws_path() -> String {
    "/ws/chat".to_string()
}
fn default_max_sessions() -> usize {
    1000
}
fn default_idle_timeout() -> u64 {
    1800
}
fn default_cleanup_interval() -> u64 {
    300
}
fn default_typing_delay() -> u64 {
    1000
}
fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            ws_path: default_ws_path(),
            max_sessions: default_max_sessions(),
            session_idle_timeout_secs: default_idle_timeout(),
            cleanup_interval_secs: default_cleanup_interval(),
            typing_delay_ms: default_typing_delay(),
            cors_enabled: default_true(),
            // Empty by default - must be explicitly configured for production
            cors_origins: Vec::new(),
        }
    }
}

/// Lead notification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Enable outbound lead notifications
    #[serde(default)]
    pub enabled: bool,

    /// Webhook endpoint receiving the lead payload
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Fixed subject line attached to each lead
    #[serde(default = "default_subject")]
    pub subject: String,

    /// Request timeout in seconds
    #[serde(default = "default_notify_timeout")]
    pub timeout_secs: u64,
}

fn default_subject() -> String {
    "New admission inquiry from chat widget".to_string()
}
fn default_notify_timeout() -> u64 {
    10
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: false, // Disabled by default for development
            webhook_url: None,
            subject: default_subject(),
            timeout_secs: default_notify_timeout(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

/// Load settings from files and environment
///
/// Priority (highest to lowest):
/// 1. Environment variables (CHAT_WIDGET__ prefix)
/// 2. config/{env}.yaml (if env specified)
/// 3. config/default.yaml
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    // Load default config
    builder = builder.add_source(File::with_name("config/default").required(false));

    // Load environment-specific config
    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    // Load from environment variables
    builder = builder.add_source(
        Environment::with_prefix("CHAT_WIDGET")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.typing_delay_ms, 1000);
        assert!(!settings.notification.enabled);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_server_validation() {
        let mut settings = Settings::default();

        settings.server.port = 0;
        assert!(settings.validate().is_err());
        settings.server.port = 8080;

        settings.server.max_sessions = 0;
        assert!(settings.validate().is_err());
        settings.server.max_sessions = 100;

        settings.server.typing_delay_ms = 60_000;
        assert!(settings.validate().is_err());
        settings.server.typing_delay_ms = 1000;

        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_notification_validation() {
        let mut settings = Settings::default();
        settings.notification.enabled = true;
        settings.notification.webhook_url = None;

        // Development tolerates a missing endpoint
        assert!(settings.validate().is_ok());

        // Production does not
        settings.environment = RuntimeEnvironment::Production;
        assert!(settings.validate().is_err());

        settings.notification.webhook_url = Some("https://hooks.example.com/leads".to_string());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_empty_subject_rejected() {
        let mut settings = Settings::default();
        settings.notification.subject = "  ".to_string();
        assert!(settings.validate().is_err());
    }
}

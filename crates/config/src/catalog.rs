//! Intent catalog configuration
//!
//! The catalog is an ordered list of (trigger substrings, response)
//! pairs plus one fallback response. Order is significant: the resolver
//! tests entries top to bottom and the first match wins, so an input
//! mentioning both courses and fees gets the course answer.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::ConfigError;

/// Single catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentEntry {
    /// Entry identifier
    pub key: String,
    /// Trigger substrings; any one firing anywhere in the input matches
    pub triggers: Vec<String>,
    /// Canned response text; embedded newlines are rendered as line breaks
    pub response: String,
}

/// Intent catalog loaded from widget.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentCatalog {
    /// Ordered entry list
    #[serde(default)]
    pub entries: Vec<IntentEntry>,
    /// Fallback response when no trigger matches
    #[serde(default = "default_fallback")]
    pub default_response: String,
}

fn default_fallback() -> String {
    "For more information, please contact our office at +91-7398081633 or visit our website"
        .to_string()
}

impl Default for IntentCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl IntentCatalog {
    /// Compiled-in catalog used when no widget.yaml is provided
    pub fn builtin() -> Self {
        let entry = |key: &str, triggers: &[&str], response: &str| IntentEntry {
            key: key.to_string(),
            triggers: triggers.iter().map(|t| t.to_string()).collect(),
            response: response.to_string(),
        };

        Self {
            entries: vec![
                entry(
                    "courses",
                    &["course"],
                    "We offer:\n- BSc in Computer Science\n- MBA\n- BCA\n- B.Com\n- PGDCA\n- 'O' Level\nand other specialized courses",
                ),
                entry(
                    "admission",
                    &["apply"],
                    "You can apply by visiting our campus admission office with the required documents",
                ),
                entry(
                    "fees",
                    &["fee"],
                    "Fee structure:\n- 'O' Level: ₹6000 + exam fee per semester\n- ADCA: ₹5000 + exam fee per semester\n- BCA: ₹20,000 + exam fee per semester",
                ),
                entry(
                    "hostel",
                    &["hostel"],
                    "Currently we don't have hostel facilities for students",
                ),
                entry(
                    "eligibility",
                    &["eligib"],
                    "Eligibility varies by course:\n- For UG courses: 10+2 pass\n- For PG courses: Graduation\n- For diploma courses: 10th pass",
                ),
                entry(
                    "recognition",
                    &["recogn"],
                    "Yes, we are recognized by:\n- National Institute of Electronics & IT (NIELIT)\n- Rajiv Gandhi Computer Saksharta Mission\n- Swami Vivekanand Subharti University",
                ),
                entry(
                    "timings",
                    &["timing", "schedule"],
                    "Regular batches:\nMorning: 8AM-12PM\nEvening: 4PM-8PM\nWeekend batches also available",
                ),
                entry(
                    "placement",
                    &["placement", "job"],
                    "We provide 100% placement assistance with:\n- Resume building\n- Interview preparation\n- Campus recruitment drives",
                ),
                entry(
                    "duration",
                    &["duration", "length"],
                    "Course duration:\n- Diploma courses: 6-12 months\n- UG courses: 3 years\n- PG courses: 2 years",
                ),
                entry(
                    "online",
                    &["online", "distance"],
                    "We offer hybrid learning options with:\n- Live online classes\n- Recorded lectures\n- Online doubt clearing sessions",
                ),
            ],
            default_response: default_fallback(),
        }
    }

    /// Load from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::FileNotFound(format!("{}: {}", path.as_ref().display(), e))
        })?;

        let mut catalog: Self =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        catalog.normalize();
        catalog.validate()?;
        Ok(catalog)
    }

    /// Lowercase all triggers; matching is case-insensitive on the
    /// lowercased input, so triggers must be stored lowercase
    pub fn normalize(&mut self) {
        for entry in &mut self.entries {
            for trigger in &mut entry.triggers {
                *trigger = trigger.to_lowercase();
            }
        }
    }

    /// Validate catalog invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_response.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "catalog.default_response".to_string(),
                message: "Fallback response must not be empty".to_string(),
            });
        }

        let mut seen = std::collections::HashSet::new();
        for entry in &self.entries {
            if entry.key.trim().is_empty() {
                return Err(ConfigError::MissingField("catalog.entries[].key".to_string()));
            }
            if !seen.insert(entry.key.as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: "catalog.entries".to_string(),
                    message: format!("Duplicate entry key '{}'", entry.key),
                });
            }
            if entry.triggers.is_empty() || entry.triggers.iter().any(|t| t.trim().is_empty()) {
                return Err(ConfigError::InvalidValue {
                    field: format!("catalog.entries.{}.triggers", entry.key),
                    message: "Each entry needs at least one non-empty trigger".to_string(),
                });
            }
            if entry.response.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("catalog.entries.{}.response", entry.key),
                    message: "Response text must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Get an entry by key
    pub fn get(&self, key: &str) -> Option<&IntentEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    /// Get all entry keys in catalog order
    pub fn keys(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.key.as_str()).collect()
    }
}

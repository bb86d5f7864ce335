//! Machine configuration.

use serde::{Deserialize, Serialize};

/// Label used when none is configured.
pub const DEFAULT_LABEL: &str = "fsm";

/// Number of transition records kept when none is configured.
pub const DEFAULT_HISTORY_LIMIT: usize = 64;

/// Settings applied to a [`StateMachine`](crate::core::StateMachine) at construction.
///
/// Missing fields fall back to their defaults when deserialized.
///
/// # Example
///
/// ```rust
/// use stance::MachineConfig;
///
/// let config = MachineConfig::from_json(r#"{ "label": "elevator" }"#).unwrap();
/// assert_eq!(config.label, "elevator");
/// assert_eq!(config.history_limit, 64);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Name attached to every log event emitted by the machine
    pub label: String,

    /// Maximum number of transition records retained; 0 disables history
    pub history_limit: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            label: DEFAULT_LABEL.to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl MachineConfig {
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_applied() {
        let config = MachineConfig::default();
        assert_eq!(config.label, "fsm");
        assert_eq!(config.history_limit, DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn setters_override_defaults() {
        let config = MachineConfig::default()
            .with_label("traffic")
            .with_history_limit(0);

        assert_eq!(config.label, "traffic");
        assert_eq!(config.history_limit, 0);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = MachineConfig::from_json(r#"{ "history_limit": 8 }"#).unwrap();
        assert_eq!(config.label, DEFAULT_LABEL);
        assert_eq!(config.history_limit, 8);
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(MachineConfig::from_json(r#"{ "history_limit": "many" }"#).is_err());
    }

    #[test]
    fn config_serializes_correctly() {
        let config = MachineConfig::default().with_label("doors");
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: MachineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}

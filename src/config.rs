//! Machine configuration.

use serde::{Deserialize, Serialize};

/// Number of states a machine remembers unless configured otherwise.
pub const DEFAULT_MAX_HISTORY_LENGTH: usize = 10;

/// Tunables for a [`StateMachine`](crate::StateMachine).
///
/// Every field has a default, so hosts can embed this in their own
/// configuration files and only spell out what they change.
///
/// # Example
///
/// ```rust
/// use switchyard::MachineConfig;
///
/// let config = MachineConfig::default().with_max_history_length(3);
/// assert_eq!(config.max_history_length, 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Upper bound on remembered states; zero disables history
    pub max_history_length: usize,
}

impl MachineConfig {
    pub fn with_max_history_length(mut self, max_history_length: usize) -> Self {
        self.max_history_length = max_history_length;
        self
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            max_history_length: DEFAULT_MAX_HISTORY_LENGTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_keeps_ten_states() {
        assert_eq!(MachineConfig::default().max_history_length, 10);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: MachineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, MachineConfig::default());
    }

    #[test]
    fn deserializes_explicit_bound() {
        let config: MachineConfig =
            serde_json::from_str(r#"{ "max_history_length": 0 }"#).unwrap();
        assert_eq!(config.max_history_length, 0);
    }

    #[test]
    fn config_roundtrips_through_json() {
        let config = MachineConfig::default().with_max_history_length(25);
        let json = serde_json::to_string(&config).unwrap();
        let parsed: MachineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, parsed);
    }
}

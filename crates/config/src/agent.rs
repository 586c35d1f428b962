//! Dialog engine configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::limits;
use crate::ConfigError;

/// Pacing, retention and keyword-table settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Simulated typing delay before each response
    #[serde(default = "default_typing_delay_ms")]
    pub typing_delay_ms: u64,

    /// Messages kept in the history (oldest dropped first)
    #[serde(default = "default_max_history")]
    pub max_history_messages: usize,

    /// Optional YAML file replacing the built-in keyword tables
    #[serde(default)]
    pub keywords_path: Option<String>,
}

fn default_typing_delay_ms() -> u64 {
    limits::TYPING_DELAY_MS
}

fn default_max_history() -> usize {
    limits::MAX_HISTORY_MESSAGES
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            typing_delay_ms: default_typing_delay_ms(),
            max_history_messages: default_max_history(),
            keywords_path: None,
        }
    }
}

impl AgentConfig {
    pub fn typing_delay(&self) -> Duration {
        Duration::from_millis(self.typing_delay_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.typing_delay_ms > limits::MAX_TYPING_DELAY_MS {
            return Err(ConfigError::InvalidValue {
                field: "agent.typing_delay_ms".to_string(),
                message: format!(
                    "Typing delay too high (maximum {}ms)",
                    limits::MAX_TYPING_DELAY_MS
                ),
            });
        }

        if self.max_history_messages < limits::MIN_HISTORY_MESSAGES {
            return Err(ConfigError::InvalidValue {
                field: "agent.max_history_messages".to_string(),
                message: format!(
                    "History cap too low (minimum {})",
                    limits::MIN_HISTORY_MESSAGES
                ),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_defaults() {
        let config = AgentConfig::default();
        assert_eq!(config.typing_delay(), Duration::from_millis(800));
        assert_eq!(config.max_history_messages, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_agent_validation_bounds() {
        let mut config = AgentConfig {
            typing_delay_ms: 20_000,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.typing_delay_ms = 0;
        config.max_history_messages = 5;
        assert!(config.validate().is_err());

        config.max_history_messages = 10;
        assert!(config.validate().is_ok());
    }
}

//! Configuration management for the lead qualification dialog
//!
//! Supports loading configuration from:
//! - YAML files under `config/`
//! - Environment variables (`LEAD_AGENT__` prefix)
//!
//! Visitor-facing copy and limits live in [`constants`].

pub mod agent;
pub mod chatbot;
pub mod constants;
pub mod settings;

pub use agent::AgentConfig;
pub use chatbot::ChatbotConfig;
pub use settings::{
    load_settings, load_settings_from, ObservabilityConfig, PersistenceConfig,
    RuntimeEnvironment, ServerConfig, Settings, ENV_PREFIX, ENV_SELECTOR,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::constants::{limits, storage};
use crate::{AgentConfig, ChatbotConfig, ConfigError};

/// Environment variable prefix, e.g. `LEAD_AGENT__SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "LEAD_AGENT";

/// Environment variable selecting `config/{env}`
pub const ENV_SELECTOR: &str = "LEAD_AGENT_ENV";

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    #[default]
    Development,
    Staging,
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    #[serde(default)]
    pub server: ServerConfig,

    /// Dialog pacing and keyword tables
    #[serde(default)]
    pub agent: AgentConfig,

    /// Business content and outbound destination
    #[serde(default)]
    pub chatbot: ChatbotConfig,

    #[serde(default)]
    pub persistence: PersistenceConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Live sessions held at once
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Sessions idle longer than this are evicted from memory
    #[serde(default = "default_session_idle")]
    pub session_idle_seconds: u64,

    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_seconds: u64,
}

impl ServerConfig {
    pub fn session_idle(&self) -> Duration {
        Duration::from_secs(self.session_idle_seconds)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_seconds)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_timeout() -> u64 {
    30
}
fn default_max_sessions() -> usize {
    limits::MAX_SESSIONS
}
fn default_session_idle() -> u64 {
    limits::SESSION_IDLE_SECONDS
}
fn default_cleanup_interval() -> u64 {
    limits::SESSION_CLEANUP_SECONDS
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            timeout_seconds: default_timeout(),
            max_sessions: default_max_sessions(),
            session_idle_seconds: default_session_idle(),
            cleanup_interval_seconds: default_cleanup_interval(),
        }
    }
}

/// Snapshot persistence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Disabled keeps sessions in memory only
    #[serde(default)]
    pub enabled: bool,

    /// Directory of the file-backed store
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Namespace prepended to every stored key
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

fn default_data_dir() -> String {
    storage::DEFAULT_DATA_DIR.to_string()
}
fn default_key_prefix() -> String {
    storage::DEFAULT_KEY_PREFIX.to_string()
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            data_dir: default_data_dir(),
            key_prefix: default_key_prefix(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

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

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.agent.validate()?;
        self.chatbot.validate()?;
        self.validate_server()?;
        self.validate_persistence()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }
        if self.server.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.timeout_seconds".to_string(),
                message: "Timeout cannot be 0".to_string(),
            });
        }
        let sessions = [
            ("server.max_sessions", self.server.max_sessions as u64),
            ("server.session_idle_seconds", self.server.session_idle_seconds),
            ("server.cleanup_interval_seconds", self.server.cleanup_interval_seconds),
        ];
        for (field, value) in sessions {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    message: "Must be greater than 0".to_string(),
                });
            }
        }
        Ok(())
    }

    fn validate_persistence(&self) -> Result<(), ConfigError> {
        let persistence = &self.persistence;
        if persistence.key_prefix.trim().is_empty() {
            return Err(ConfigError::MissingField("persistence.key_prefix".to_string()));
        }
        if persistence.enabled && persistence.data_dir.trim().is_empty() {
            return Err(ConfigError::MissingField("persistence.data_dir".to_string()));
        }
        Ok(())
    }
}

/// Load settings from `config/default`, `config/{env}` and `LEAD_AGENT__*`
/// environment variables
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from(Path::new("config"), env)
}

/// Same layering as [`load_settings`] with an explicit config directory
pub fn load_settings_from(dir: &Path, env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    let default_path = dir.join("default");
    builder = builder.add_source(File::with_name(&default_path.to_string_lossy()).required(false));

    if let Some(env_name) = env {
        let env_path = dir.join(env_name);
        builder = builder.add_source(File::with_name(&env_path.to_string_lossy()).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    tracing::debug!(
        environment = ?settings.environment,
        persistence = settings.persistence.enabled,
        "Settings loaded"
    );

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.agent.typing_delay_ms, 800);
        assert_eq!(settings.persistence.key_prefix, "furnarius_chatbot_");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_settings_validation() {
        let mut settings = Settings::default();
        settings.server.port = 0;
        assert!(settings.validate().is_err());

        settings.server.port = 3000;
        settings.server.session_idle_seconds = 0;
        assert!(settings.validate().is_err());

        settings.server.session_idle_seconds = 60;
        settings.persistence.key_prefix = " ".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_load_settings_layers_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.yaml"),
            "server:\n  port: 9000\nchatbot:\n  whatsapp_number: \"5493410000000\"\n  faq_payments: \"Transferencia\"\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("production.yaml"),
            "environment: production\nagent:\n  typing_delay_ms: 400\n",
        )
        .unwrap();

        let settings = load_settings_from(dir.path(), Some("production")).unwrap();
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.session_idle(), Duration::from_secs(3600));
        assert_eq!(settings.environment, RuntimeEnvironment::Production);
        assert_eq!(settings.agent.typing_delay_ms, 400);
        assert_eq!(settings.chatbot.whatsapp_number, "5493410000000");
        assert_eq!(settings.chatbot.faq_payments(), Some("Transferencia"));
        assert_eq!(settings.chatbot.advisor_name, "Equipo Furnarius");
    }

    #[test]
    fn test_load_settings_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.yaml"),
            "chatbot:\n  whatsapp_number: \"not-a-number\"\n",
        )
        .unwrap();

        assert!(load_settings_from(dir.path(), None).is_err());
    }

    #[test]
    fn test_missing_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_from(dir.path(), Some("staging")).unwrap();
        assert_eq!(settings.environment, RuntimeEnvironment::Development);
        assert_eq!(settings.agent.max_history_messages, 100);
    }
}

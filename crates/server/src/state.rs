//! Application State
//!
//! Shared state across all handlers.

use std::sync::Arc;

use lead_agent_agent::DialogEngine;
use lead_agent_config::Settings;
use lead_agent_persistence::{InMemoryStore, KeyValueStore};
use metrics_exporter_prometheus::PrometheusHandle;

use crate::session::SessionManager;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub sessions: Arc<SessionManager>,
    /// Key-value store behind every session's snapshots
    pub store: Arc<dyn KeyValueStore>,
    /// Absent when another recorder was installed first
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(
        config: Settings,
        engine: Arc<DialogEngine>,
        store: Arc<dyn KeyValueStore>,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        let sessions = SessionManager::new(
            engine,
            store.clone(),
            config.persistence.key_prefix.clone(),
            config.agent.typing_delay(),
            config.server.max_sessions,
        )
        .with_expiry(config.server.session_idle(), config.server.cleanup_interval());
        Self {
            config: Arc::new(config),
            sessions: Arc::new(sessions),
            store,
            metrics,
        }
    }

    /// In-memory state, used by tests and when persistence is disabled
    pub fn in_memory(config: Settings, engine: Arc<DialogEngine>) -> Self {
        Self::new(config, engine, Arc::new(InMemoryStore::new()), None)
    }
}

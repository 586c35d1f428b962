//! Chat state snapshots under a per-session namespace
//!
//! Keys are `{prefix}{session_id}_chat_state` and `{prefix}{session_id}_lead_data`.
//! The lead is stored on its own, stamped with `updated_at`, so leads can be
//! listed without decoding whole conversations.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use lead_agent_config::constants::storage;
use lead_agent_core::{ChatState, ChatStateStore, LeadData};
use serde::{Deserialize, Serialize};

use crate::{KeyValueStore, PersistenceError};

/// Lead found by [`all_leads`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredLead {
    pub session_id: String,
    pub lead: LeadData,
}

/// Snapshot store for one session
#[derive(Clone)]
pub struct ChatStateRepository {
    store: Arc<dyn KeyValueStore>,
    namespace: String,
}

impl ChatStateRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, prefix: &str, session_id: &str) -> Self {
        Self {
            store,
            namespace: format!("{}{}_", prefix, session_id),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn key(&self, name: &str) -> String {
        format!("{}{}", self.namespace, name)
    }

    pub async fn try_save(&self, state: &ChatState) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(state)?;
        self.store.set(&self.key(storage::CHAT_STATE_KEY), &json).await?;

        if state.lead_data.is_empty() {
            return Ok(());
        }

        let now = Utc::now();
        let created_at = match state.lead_data.created_at {
            Some(created_at) => Some(created_at),
            // A previously stored copy that no longer decodes is replaced
            None => self.load_lead().await.ok().flatten().and_then(|l| l.created_at),
        };
        let lead = LeadData {
            created_at: created_at.or(Some(now)),
            updated_at: Some(now),
            ..state.lead_data.clone()
        };
        let json = serde_json::to_string(&lead)?;
        self.store.set(&self.key(storage::LEAD_DATA_KEY), &json).await
    }

    /// Stored state; `Err` for undecodable data
    pub async fn try_load(&self) -> Result<Option<ChatState>, PersistenceError> {
        match self.store.get(&self.key(storage::CHAT_STATE_KEY)).await? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    pub async fn try_clear(&self) -> Result<(), PersistenceError> {
        self.store.remove(&self.key(storage::CHAT_STATE_KEY)).await?;
        self.store.remove(&self.key(storage::LEAD_DATA_KEY)).await
    }

    pub async fn load_lead(&self) -> Result<Option<LeadData>, PersistenceError> {
        match self.store.get(&self.key(storage::LEAD_DATA_KEY)).await? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }
}

impl std::fmt::Debug for ChatStateRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatStateRepository")
            .field("namespace", &self.namespace)
            .finish()
    }
}

#[async_trait]
impl ChatStateStore for ChatStateRepository {
    async fn save(&self, state: &ChatState) {
        if let Err(e) = self.try_save(state).await {
            tracing::warn!(namespace = %self.namespace, error = %e, "Failed to save chat state");
        }
    }

    async fn load(&self) -> Option<ChatState> {
        match self.try_load().await {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(
                    namespace = %self.namespace,
                    error = %e,
                    "Discarding unreadable chat state"
                );
                None
            },
        }
    }

    async fn clear(&self) {
        if let Err(e) = self.try_clear().await {
            tracing::warn!(namespace = %self.namespace, error = %e, "Failed to clear chat state");
        }
    }
}

/// Every decodable lead stored under `prefix`, ordered by key
pub async fn all_leads(
    store: &dyn KeyValueStore,
    prefix: &str,
) -> Result<Vec<StoredLead>, PersistenceError> {
    let suffix = format!("_{}", storage::LEAD_DATA_KEY);
    let mut leads = Vec::new();

    for key in store.keys(prefix).await? {
        let Some(session_id) = key
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_suffix(suffix.as_str()))
        else {
            continue;
        };
        let Some(json) = store.get(&key).await? else {
            continue;
        };
        match serde_json::from_str::<LeadData>(&json) {
            Ok(lead) => leads.push(StoredLead {
                session_id: session_id.to_string(),
                lead,
            }),
            Err(e) => tracing::warn!(key = %key, error = %e, "Skipping unreadable lead"),
        }
    }

    Ok(leads)
}

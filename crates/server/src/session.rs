//! Session Management
//!
//! Every visitor owns one `ChatSession` behind its own async mutex. A turn
//! holds that mutex for its whole duration, typing delay included, so a
//! second turn on the same session is rejected instead of queued while
//! other sessions proceed independently.
//!
//! Idle sessions are evicted from memory by a background sweep; their
//! stored state stays behind and is restored on the next request.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use lead_agent_agent::{ChatSession, DialogEngine, TurnOutcome};
use lead_agent_config::constants::limits;
use lead_agent_core::{
    ButtonOption, ChatMessage, ChatStateStore, FlowState, LeadData, QuotationStep,
};
use lead_agent_persistence::{ChatStateRepository, KeyValueStore};
use lead_agent_tools::OutboundLink;
use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::{watch, Mutex};

use crate::metrics::record_session_created;
use crate::ServerError;

pub type SharedSession = Arc<Mutex<ChatSession>>;

/// What the chat widget renders
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub messages: Vec<ChatMessage>,
    pub quick_options: Vec<ButtonOption>,
    pub composing: bool,
    pub flow: FlowState,
    pub step: Option<QuotationStep>,
    pub lead: LeadData,
    pub show_summary_card: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outbound_link: Option<OutboundLink>,
}

impl SessionSnapshot {
    pub fn of(session: &ChatSession) -> Self {
        Self {
            session_id: session.session_id().to_string(),
            messages: session.messages().to_vec(),
            quick_options: session.quick_options(),
            composing: session.is_composing(),
            flow: session.flow(),
            step: session.step(),
            lead: session.lead().clone(),
            show_summary_card: session.show_summary_card(),
            outbound_link: session
                .last_outcome()
                .and_then(|outcome| outcome.outbound_link.clone()),
        }
    }
}

/// Snapshot after a turn, with what the turn did
#[derive(Debug, Clone, Serialize)]
pub struct TurnResponse {
    #[serde(flatten)]
    pub session: SessionSnapshot,
    pub turn: TurnOutcome,
}

/// One live conversation with what can be read without its lock
struct LiveSession {
    session: SharedSession,
    composing: watch::Receiver<bool>,
    /// Snapshot as of the last completed turn
    snapshot: RwLock<SessionSnapshot>,
    last_activity: RwLock<Instant>,
}

impl LiveSession {
    fn new(session: ChatSession) -> Self {
        Self {
            composing: session.composing(),
            snapshot: RwLock::new(SessionSnapshot::of(&session)),
            session: Arc::new(Mutex::new(session)),
            last_activity: RwLock::new(Instant::now()),
        }
    }

    fn touch(&self) {
        *self.last_activity.write() = Instant::now();
    }

    /// A session mid-turn is never expired
    fn is_expired(&self, timeout: Duration) -> bool {
        self.last_activity.read().elapsed() > timeout && self.session.try_lock().is_ok()
    }
}

/// Live sessions plus restore-on-demand from the store
pub struct SessionManager {
    sessions: RwLock<HashMap<String, Arc<LiveSession>>>,
    engine: Arc<DialogEngine>,
    store: Arc<dyn KeyValueStore>,
    key_prefix: String,
    typing_delay: Duration,
    max_sessions: usize,
    session_timeout: Duration,
    cleanup_interval: Duration,
}

impl SessionManager {
    pub fn new(
        engine: Arc<DialogEngine>,
        store: Arc<dyn KeyValueStore>,
        key_prefix: impl Into<String>,
        typing_delay: Duration,
        max_sessions: usize,
    ) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            engine,
            store,
            key_prefix: key_prefix.into(),
            typing_delay,
            max_sessions,
            session_timeout: Duration::from_secs(limits::SESSION_IDLE_SECONDS),
            cleanup_interval: Duration::from_secs(limits::SESSION_CLEANUP_SECONDS),
        }
    }

    /// Idle timeout and sweep interval
    pub fn with_expiry(mut self, session_timeout: Duration, cleanup_interval: Duration) -> Self {
        self.session_timeout = session_timeout;
        self.cleanup_interval = cleanup_interval;
        self
    }

    fn repository(&self, id: &str) -> Arc<dyn ChatStateStore> {
        Arc::new(ChatStateRepository::new(
            self.store.clone(),
            &self.key_prefix,
            id,
        ))
    }

    fn ensure_capacity(&self) -> Result<(), ServerError> {
        if self.count() >= self.max_sessions {
            self.cleanup_expired();
        }
        if self.count() >= self.max_sessions {
            tracing::warn!(max = self.max_sessions, "Session limit reached");
            return Err(ServerError::Capacity(self.max_sessions));
        }
        Ok(())
    }

    /// Start a new conversation
    pub async fn create(&self) -> Result<SharedSession, ServerError> {
        self.ensure_capacity()?;

        let id = uuid::Uuid::new_v4().to_string();
        let session = ChatSession::open(
            id.clone(),
            self.engine.clone(),
            Some(self.repository(&id)),
            self.typing_delay,
        )
        .await;

        let live = Arc::new(LiveSession::new(session));
        let session = live.session.clone();
        self.sessions.write().insert(id.clone(), live);
        record_session_created();
        tracing::info!(session_id = %id, total = self.count(), "Session created");
        Ok(session)
    }

    fn live(&self, id: &str) -> Option<Arc<LiveSession>> {
        let live = self.sessions.read().get(id).cloned()?;
        live.touch();
        Some(live)
    }

    pub fn get(&self, id: &str) -> Option<SharedSession> {
        self.live(id).map(|live| live.session.clone())
    }

    async fn live_or_restore(&self, id: &str) -> Result<Arc<LiveSession>, ServerError> {
        if let Some(live) = self.live(id) {
            return Ok(live);
        }

        let repository = self.repository(id);
        if repository.load().await.is_none() {
            return Err(ServerError::SessionNotFound(id.to_string()));
        }
        self.ensure_capacity()?;

        let session =
            ChatSession::restore(id, self.engine.clone(), Some(repository), self.typing_delay)
                .await;

        // A concurrent restore of the same id may have won the race
        let live = self
            .sessions
            .write()
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(LiveSession::new(session)))
            .clone();
        tracing::debug!(session_id = %id, "Session restored from store");
        Ok(live)
    }

    /// Live session, or one restored from the store
    pub async fn get_or_restore(&self, id: &str) -> Result<SharedSession, ServerError> {
        Ok(self.live_or_restore(id).await?.session.clone())
    }

    /// Current view of a session, readable while a turn is in flight
    ///
    /// During a turn the last completed snapshot is returned with the live
    /// composing flag.
    pub async fn snapshot(&self, id: &str) -> Result<SessionSnapshot, ServerError> {
        let live = self.live_or_restore(id).await?;
        let snapshot = match live.session.try_lock() {
            Ok(session) => {
                let snapshot = SessionSnapshot::of(&session);
                *live.snapshot.write() = snapshot.clone();
                snapshot
            },
            Err(_) => {
                let mut snapshot = live.snapshot.read().clone();
                snapshot.composing = *live.composing.borrow();
                snapshot
            },
        };
        Ok(snapshot)
    }

    /// Record the state a handler just produced
    pub fn publish(&self, session: &ChatSession) -> SessionSnapshot {
        let snapshot = SessionSnapshot::of(session);
        if let Some(live) = self.live(session.session_id()) {
            *live.snapshot.write() = snapshot.clone();
        }
        snapshot
    }

    /// Drop the live session and its stored state
    pub async fn remove(&self, id: &str) -> bool {
        let removed = self.sessions.write().remove(id).is_some();
        self.repository(id).clear().await;
        if removed {
            tracing::info!(session_id = %id, "Session removed");
        }
        removed
    }

    /// Evict idle sessions from memory; their stored state is kept
    pub fn cleanup_expired(&self) -> usize {
        let timeout = self.session_timeout;
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, live| !live.is_expired(timeout));
        before - sessions.len()
    }

    /// Periodically evict idle sessions
    ///
    /// Sending `true` on the returned channel, or dropping it, stops the task.
    pub fn start_cleanup_task(self: &Arc<Self>) -> watch::Sender<bool> {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let manager = Arc::clone(self);
        let interval = manager.cleanup_interval;

        tokio::spawn(async move {
            let mut timer = tokio::time::interval(interval);
            timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = timer.tick() => {
                        let removed = manager.cleanup_expired();
                        if removed > 0 {
                            tracing::info!(
                                removed,
                                remaining = manager.count(),
                                "Expired sessions evicted"
                            );
                        }
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            tracing::info!("Session cleanup task shutting down");
                            break;
                        }
                    }
                }
            }
        });

        shutdown_tx
    }

    pub fn count(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn list(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sessions.read().keys().cloned().collect();
        ids.sort();
        ids
    }
}

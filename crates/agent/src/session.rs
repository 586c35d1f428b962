//! Paced chat session
//!
//! Owns one `ChatState` and drives the dialog engine with a simulated typing
//! delay between accepting input and answering. State is saved to the
//! optional store after every turn; store failures never reach the caller.

use std::sync::Arc;
use std::time::Duration;

use lead_agent_core::{
    ButtonOption, ChatMessage, ChatState, ChatStateStore, FlowState, Intent, LeadData,
    QuotationStep,
};
use tokio::sync::{broadcast, watch};

use crate::engine::{DialogEngine, TurnInput, TurnOutcome};
use crate::Result;

/// Session events
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Fresh conversation, welcome pair emitted
    Started { session_id: String },
    /// Conversation picked up from the store
    Restored { session_id: String },
    /// Visitor input accepted, typing delay running
    TurnStarted { text: String },
    IntentResolved { intent: Intent, confidence: f32 },
    FlowChanged { from: FlowState, to: FlowState },
    HandoffRequested,
    OutboundLinkReady { url: String },
    TurnCompleted {
        flow: FlowState,
        step: Option<QuotationStep>,
    },
    Reset,
}

/// Turn accepted but not yet answered
///
/// Dropping it (e.g. the caller's future is cancelled during the typing
/// delay) still completes the turn so the input gate never stays closed.
struct PendingTurn<'a> {
    engine: &'a DialogEngine,
    state: &'a mut ChatState,
    composing: &'a watch::Sender<bool>,
    input: TurnInput,
    completed: bool,
}

impl PendingTurn<'_> {
    fn finish(&mut self) -> TurnOutcome {
        self.completed = true;
        self.composing.send_replace(false);
        self.engine.complete_turn(self.state, &self.input)
    }

    fn complete(mut self) -> TurnOutcome {
        self.finish()
    }
}

impl Drop for PendingTurn<'_> {
    fn drop(&mut self) {
        if !self.completed {
            tracing::warn!("Turn cancelled during typing delay, completing it");
            self.finish();
        }
    }
}

/// One visitor conversation
pub struct ChatSession {
    session_id: String,
    engine: Arc<DialogEngine>,
    state: ChatState,
    store: Option<Arc<dyn ChatStateStore>>,
    typing_delay: Duration,
    composing_tx: watch::Sender<bool>,
    event_tx: broadcast::Sender<SessionEvent>,
    last_outcome: Option<TurnOutcome>,
}

impl ChatSession {
    fn with_state(
        session_id: String,
        engine: Arc<DialogEngine>,
        store: Option<Arc<dyn ChatStateStore>>,
        typing_delay: Duration,
        state: ChatState,
    ) -> Self {
        let (composing_tx, _) = watch::channel(false);
        let (event_tx, _) = broadcast::channel(100);
        Self {
            session_id,
            engine,
            state,
            store,
            typing_delay,
            composing_tx,
            event_tx,
            last_outcome: None,
        }
    }

    /// New conversation starting with the welcome pair
    pub async fn open(
        session_id: impl Into<String>,
        engine: Arc<DialogEngine>,
        store: Option<Arc<dyn ChatStateStore>>,
        typing_delay: Duration,
    ) -> Self {
        let mut session =
            Self::with_state(session_id.into(), engine, store, typing_delay, ChatState::new());
        session.engine.start(&mut session.state);
        tracing::info!(session_id = %session.session_id, "Chat session started");
        let _ = session.event_tx.send(SessionEvent::Started {
            session_id: session.session_id.clone(),
        });
        session.persist().await;
        session
    }

    /// Conversation from the store, or a new one when nothing usable is stored
    pub async fn restore(
        session_id: impl Into<String>,
        engine: Arc<DialogEngine>,
        store: Option<Arc<dyn ChatStateStore>>,
        typing_delay: Duration,
    ) -> Self {
        let session_id = session_id.into();
        let stored = match &store {
            Some(store) => store.load().await,
            None => None,
        };

        match stored {
            Some(mut state) => {
                // A turn interrupted by a restart must not lock the visitor out
                state.awaiting_input = true;
                tracing::info!(
                    session_id = %session_id,
                    messages = state.conversation_history.len(),
                    flow = %state.current_flow,
                    "Chat session restored"
                );
                let session = Self::with_state(session_id, engine, store, typing_delay, state);
                let _ = session.event_tx.send(SessionEvent::Restored {
                    session_id: session.session_id.clone(),
                });
                session
            },
            None => Self::open(session_id, engine, store, typing_delay).await,
        }
    }

    /// Typed message
    pub async fn submit(&mut self, text: impl Into<String>) -> Result<TurnOutcome> {
        self.run_turn(TurnInput::text(text)).await
    }

    /// Quick-reply selection; its intent and action skip classification
    pub async fn select_option(&mut self, option: &ButtonOption) -> Result<TurnOutcome> {
        self.run_turn(TurnInput::selection(option)).await
    }

    /// Forget everything and greet again
    pub async fn reset(&mut self) -> Vec<ChatMessage> {
        if let Some(store) = &self.store {
            store.clear().await;
        }
        self.state = ChatState::new();
        self.last_outcome = None;
        self.composing_tx.send_replace(false);

        let messages = self.engine.start(&mut self.state);
        tracing::info!(session_id = %self.session_id, "Chat session reset");
        let _ = self.event_tx.send(SessionEvent::Reset);
        self.persist().await;
        messages
    }

    async fn run_turn(&mut self, input: TurnInput) -> Result<TurnOutcome> {
        self.engine.begin_turn(&mut self.state, &input)?;
        let _ = self.event_tx.send(SessionEvent::TurnStarted {
            text: input.text.clone(),
        });
        let from = self.state.current_flow;

        self.composing_tx.send_replace(true);
        let engine = Arc::clone(&self.engine);
        let pending = PendingTurn {
            engine: &engine,
            state: &mut self.state,
            composing: &self.composing_tx,
            input,
            completed: false,
        };

        if !self.typing_delay.is_zero() {
            tokio::time::sleep(self.typing_delay).await;
        }

        let outcome = pending.complete();

        self.emit_outcome(from, &outcome);
        self.persist().await;
        self.last_outcome = Some(outcome.clone());
        Ok(outcome)
    }

    fn emit_outcome(&self, from: FlowState, outcome: &TurnOutcome) {
        let _ = self.event_tx.send(SessionEvent::IntentResolved {
            intent: outcome.intent,
            confidence: outcome.confidence,
        });
        if from != outcome.flow {
            let _ = self.event_tx.send(SessionEvent::FlowChanged {
                from,
                to: outcome.flow,
            });
        }
        if outcome.handoff {
            let _ = self.event_tx.send(SessionEvent::HandoffRequested);
        }
        if let Some(link) = &outcome.outbound_link {
            let _ = self.event_tx.send(SessionEvent::OutboundLinkReady {
                url: link.url.clone(),
            });
        }
        let _ = self.event_tx.send(SessionEvent::TurnCompleted {
            flow: outcome.flow,
            step: outcome.step,
        });
    }

    async fn persist(&self) {
        if let Some(store) = &self.store {
            store.save(&self.state).await;
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn state(&self) -> &ChatState {
        &self.state
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.state.conversation_history
    }

    pub fn quick_options(&self) -> Vec<ButtonOption> {
        self.state.quick_options()
    }

    pub fn flow(&self) -> FlowState {
        self.state.current_flow
    }

    pub fn step(&self) -> Option<QuotationStep> {
        self.state.current_step
    }

    pub fn lead(&self) -> &LeadData {
        &self.state.lead_data
    }

    pub fn show_summary_card(&self) -> bool {
        self.state.show_summary_card()
    }

    pub fn is_composing(&self) -> bool {
        *self.composing_tx.borrow()
    }

    /// Watch the "is composing" flag
    pub fn composing(&self) -> watch::Receiver<bool> {
        self.composing_tx.subscribe()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    pub fn last_outcome(&self) -> Option<&TurnOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn typing_delay(&self) -> Duration {
        self.typing_delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::FixedSelector;
    use async_trait::async_trait;
    use lead_agent_config::{AgentConfig, ChatbotConfig};
    use parking_lot::Mutex;

    #[derive(Default)]
    struct MemoryStore {
        state: Mutex<Option<ChatState>>,
        saves: Mutex<usize>,
    }

    #[async_trait]
    impl ChatStateStore for MemoryStore {
        async fn save(&self, state: &ChatState) {
            *self.state.lock() = Some(state.clone());
            *self.saves.lock() += 1;
        }

        async fn load(&self) -> Option<ChatState> {
            self.state.lock().clone()
        }

        async fn clear(&self) {
            *self.state.lock() = None;
        }
    }

    fn engine() -> Arc<DialogEngine> {
        Arc::new(
            DialogEngine::new(ChatbotConfig::default(), &AgentConfig::default())
                .unwrap()
                .with_selector(Arc::new(FixedSelector(0))),
        )
    }

    const DELAY: Duration = Duration::from_millis(800);

    #[tokio::test(start_paused = true)]
    async fn test_open_greets_and_saves() {
        let store = Arc::new(MemoryStore::default());
        let session = ChatSession::open("s1", engine(), Some(store.clone()), DELAY).await;
        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.flow(), FlowState::Quotation);
        assert_eq!(session.step(), Some(QuotationStep::TipoEvento));
        assert_eq!(session.quick_options().len(), 5);
        assert_eq!(*store.saves.lock(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_composing_flag_during_delay() {
        let mut session = ChatSession::open("s1", engine(), None, DELAY).await;
        let mut composing = session.composing();
        assert!(!*composing.borrow());

        let handle = tokio::spawn(async move {
            let outcome = session.submit("Casamiento").await;
            (session, outcome)
        });

        composing.changed().await.unwrap();
        assert!(*composing.borrow());

        let (session, outcome) = handle.await.unwrap();
        assert_eq!(outcome.unwrap().step, Some(QuotationStep::Fecha));
        assert!(!session.is_composing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_turn_still_completes() {
        let mut session = ChatSession::open("s1", engine(), None, DELAY).await;
        let result =
            tokio::time::timeout(Duration::from_millis(10), session.submit("Casamiento")).await;
        assert!(result.is_err());

        assert!(session.state().awaiting_input);
        assert!(!session.is_composing());
        assert_eq!(session.lead().event_type.as_deref(), Some("Casamiento"));
        assert_eq!(session.step(), Some(QuotationStep::Fecha));
    }

    #[tokio::test(start_paused = true)]
    async fn test_events() {
        let mut session = ChatSession::open("s1", engine(), None, Duration::ZERO).await;
        let mut events = session.subscribe();
        session.submit("hablar con un asesor").await.unwrap();

        let mut received = Vec::new();
        while let Ok(event) = events.try_recv() {
            received.push(event);
        }
        assert_eq!(
            received.first(),
            Some(&SessionEvent::TurnStarted {
                text: "hablar con un asesor".into()
            })
        );
        assert!(received.contains(&SessionEvent::HandoffRequested));
        assert!(received.contains(&SessionEvent::FlowChanged {
            from: FlowState::Quotation,
            to: FlowState::Handoff,
        }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restore_reopens_gate() {
        let store = Arc::new(MemoryStore::default());
        let mut session = ChatSession::open("s1", engine(), Some(store.clone()), DELAY).await;
        session.submit("Casamiento").await.unwrap();

        let mut stored = store.load().await.unwrap();
        stored.awaiting_input = false;
        store.save(&stored).await;

        let restored = ChatSession::restore("s1", engine(), Some(store.clone()), DELAY).await;
        assert!(restored.state().awaiting_input);
        assert_eq!(restored.lead().event_type.as_deref(), Some("Casamiento"));
        assert_eq!(restored.messages().len(), session.messages().len());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restore_without_state_starts_fresh() {
        let store = Arc::new(MemoryStore::default());
        let session = ChatSession::restore("s2", engine(), Some(store.clone()), DELAY).await;
        assert_eq!(session.messages().len(), 2);
        assert!(store.load().await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset() {
        let store = Arc::new(MemoryStore::default());
        let mut session = ChatSession::open("s1", engine(), Some(store.clone()), DELAY).await;
        session.submit("Casamiento").await.unwrap();
        assert!(session.last_outcome().is_some());

        let messages = session.reset().await;
        assert_eq!(messages.len(), 2);
        assert_eq!(session.messages().len(), 2);
        assert!(session.lead().is_empty());
        assert!(session.last_outcome().is_none());
        assert_eq!(store.load().await.unwrap().conversation_history.len(), 2);
    }
}

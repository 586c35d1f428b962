//! Sessions surviving a restart through the file store

use std::sync::Arc;
use std::time::Duration;

use lead_agent_agent::{ChatSession, DialogEngine};
use lead_agent_config::constants::storage;
use lead_agent_config::{AgentConfig, ChatbotConfig};
use lead_agent_core::{ChatStateStore, QuotationStep};
use lead_agent_persistence::{all_leads, ChatStateRepository, FileStore, KeyValueStore};

fn engine() -> Arc<DialogEngine> {
    Arc::new(DialogEngine::new(ChatbotConfig::default(), &AgentConfig::default()).unwrap())
}

fn repository(store: Arc<dyn KeyValueStore>, session_id: &str) -> Arc<dyn ChatStateStore> {
    Arc::new(ChatStateRepository::new(
        store,
        storage::DEFAULT_KEY_PREFIX,
        session_id,
    ))
}

#[tokio::test]
async fn test_conversation_resumes_after_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path()).await.unwrap());
        let mut session = ChatSession::open(
            "visitor-1",
            engine(),
            Some(repository(store, "visitor-1")),
            Duration::ZERO,
        )
        .await;
        session.submit("Casamiento").await.unwrap();
        session.submit("marzo 2026").await.unwrap();
    }

    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path()).await.unwrap());
    let mut session = ChatSession::restore(
        "visitor-1",
        engine(),
        Some(repository(store.clone(), "visitor-1")),
        Duration::ZERO,
    )
    .await;

    assert_eq!(session.messages().len(), 6);
    assert_eq!(session.step(), Some(QuotationStep::Ciudad));
    assert_eq!(session.lead().event_date.as_deref(), Some("marzo 2026"));

    session.submit("Rosario").await.unwrap();
    assert_eq!(session.step(), Some(QuotationStep::Invitados));

    let leads = all_leads(store.as_ref(), storage::DEFAULT_KEY_PREFIX)
        .await
        .unwrap();
    assert_eq!(leads.len(), 1);
    assert_eq!(leads[0].session_id, "visitor-1");
    assert_eq!(leads[0].lead.city_zone.as_deref(), Some("Rosario"));
}

#[tokio::test]
async fn test_corrupt_snapshot_starts_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path()).await.unwrap());
    store
        .set("furnarius_chatbot_visitor-2_chat_state", "not json at all")
        .await
        .unwrap();

    let session = ChatSession::restore(
        "visitor-2",
        engine(),
        Some(repository(store.clone(), "visitor-2")),
        Duration::ZERO,
    )
    .await;

    assert_eq!(session.messages().len(), 2);
    assert_eq!(session.step(), Some(QuotationStep::TipoEvento));

    // The fresh welcome state replaced the unreadable one
    let stored = store
        .get("furnarius_chatbot_visitor-2_chat_state")
        .await
        .unwrap()
        .unwrap();
    assert!(stored.starts_with('{'));
}

//! Seams between the dialog core and its collaborators

use async_trait::async_trait;

use crate::state::ChatState;

/// Snapshot store for a session's `ChatState`
///
/// Implementations absorb their own failures: a failed save is logged and
/// forgotten, and undecodable data loads as `None`. A turn never fails
/// because of storage.
#[async_trait]
pub trait ChatStateStore: Send + Sync {
    async fn save(&self, state: &ChatState);

    async fn load(&self) -> Option<ChatState>;

    async fn clear(&self);
}

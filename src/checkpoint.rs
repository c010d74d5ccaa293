//! Thread checkpoints and the stores that persist them.
//!
//! The engine writes a checkpoint after every completed node, so a failure
//! mid-node leaves the last committed checkpoint untouched and a retry
//! continues from there.

use crate::conversation::ConversationState;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

/// Where a thread's workflow currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    /// The model is about to take (or retake) a decision.
    Deciding,
    /// The latest decision requested tools that have not run yet.
    AwaitingToolResults,
    /// A plan exists; the thread is parked until an explicit approval.
    AwaitingApproval,
    /// Delivery is in flight. Transient only, never written to a store.
    Sending,
    /// Terminal. No further transitions for this thread.
    Done,
}

/// One thread's committed position: the conversation so far and the phase
/// to pick up from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub phase: RunPhase,
    pub state: ConversationState,
    pub updated_at: DateTime<Utc>,
}

impl Checkpoint {
    pub fn new(phase: RunPhase, state: ConversationState) -> Self {
        Self {
            phase,
            state,
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("checkpoint storage failed: {0}")]
    Storage(String),
}

/// Persistence boundary for thread checkpoints.
///
/// `save` replaces the whole value for a key, so readers observe either the
/// previous committed checkpoint or the new one, never a partial write.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    async fn load(&self, thread_id: &str) -> Result<Option<Checkpoint>, CheckpointError>;

    async fn save(&self, thread_id: &str, checkpoint: Checkpoint) -> Result<(), CheckpointError>;

    /// Remove a thread's checkpoint. Returns whether one existed.
    async fn delete(&self, thread_id: &str) -> Result<bool, CheckpointError>;
}

/// Non-persistent store; state is lost on restart.
#[derive(Clone)]
pub struct InMemoryCheckpointStore {
    checkpoints: Arc<RwLock<HashMap<String, Checkpoint>>>,
}

impl InMemoryCheckpointStore {
    pub fn new() -> Self {
        Self {
            checkpoints: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryCheckpointStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CheckpointStore for InMemoryCheckpointStore {
    async fn load(&self, thread_id: &str) -> Result<Option<Checkpoint>, CheckpointError> {
        Ok(self.checkpoints.read().await.get(thread_id).cloned())
    }

    async fn save(&self, thread_id: &str, checkpoint: Checkpoint) -> Result<(), CheckpointError> {
        self.checkpoints
            .write()
            .await
            .insert(thread_id.to_string(), checkpoint);
        Ok(())
    }

    async fn delete(&self, thread_id: &str) -> Result<bool, CheckpointError> {
        Ok(self.checkpoints.write().await.remove(thread_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Message;
    use tokio_test::assert_ok;

    fn state_with(content: &str) -> ConversationState {
        let mut state = ConversationState::new();
        state.append(Message::human(content));
        state
    }

    #[tokio::test]
    async fn load_returns_none_for_unknown_thread() {
        let store = InMemoryCheckpointStore::new();
        let loaded = store.load("missing").await.expect("load");
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let store = InMemoryCheckpointStore::new();
        let checkpoint = Checkpoint::new(RunPhase::Deciding, state_with("plan a trip"));
        store.save("t1", checkpoint.clone()).await.expect("save");

        let loaded = store.load("t1").await.expect("load").expect("exists");
        assert_eq!(loaded.phase, RunPhase::Deciding);
        assert_eq!(loaded.state, checkpoint.state);
    }

    #[tokio::test]
    async fn save_replaces_previous_checkpoint() {
        let store = InMemoryCheckpointStore::new();
        store
            .save("t1", Checkpoint::new(RunPhase::Deciding, state_with("first")))
            .await
            .expect("save first");
        store
            .save(
                "t1",
                Checkpoint::new(RunPhase::AwaitingApproval, state_with("second")),
            )
            .await
            .expect("save second");

        let loaded = store.load("t1").await.expect("load").expect("exists");
        assert_eq!(loaded.phase, RunPhase::AwaitingApproval);
        assert_eq!(loaded.state.messages[0].content(), "second");
    }

    #[tokio::test]
    async fn threads_are_isolated_under_concurrent_writes() {
        let store = InMemoryCheckpointStore::new();
        let (a, b) = tokio::join!(
            store.save("t1", Checkpoint::new(RunPhase::Deciding, state_with("kochi"))),
            store.save("t2", Checkpoint::new(RunPhase::Done, state_with("delhi"))),
        );
        assert_ok!(a);
        assert_ok!(b);

        let t1 = store.load("t1").await.expect("load").expect("t1 exists");
        let t2 = store.load("t2").await.expect("load").expect("t2 exists");
        assert_eq!(t1.state.messages[0].content(), "kochi");
        assert_eq!(t1.phase, RunPhase::Deciding);
        assert_eq!(t2.state.messages[0].content(), "delhi");
        assert_eq!(t2.phase, RunPhase::Done);
    }

    #[tokio::test]
    async fn delete_removes_only_the_target_thread() {
        let store = InMemoryCheckpointStore::new();
        store
            .save("t1", Checkpoint::new(RunPhase::Done, state_with("one")))
            .await
            .expect("save t1");
        store
            .save("t2", Checkpoint::new(RunPhase::Done, state_with("two")))
            .await
            .expect("save t2");

        assert!(store.delete("t1").await.expect("delete t1"));
        assert!(!store.delete("t1").await.expect("delete t1 again"));
        assert!(store.load("t1").await.expect("load").is_none());
        assert!(store.load("t2").await.expect("load").is_some());
    }

    #[test]
    fn phases_serialize_snake_case() {
        let phase = serde_json::to_value(RunPhase::AwaitingApproval).expect("serialize");
        assert_eq!(phase, "awaiting_approval");
        let phase = serde_json::to_value(RunPhase::AwaitingToolResults).expect("serialize");
        assert_eq!(phase, "awaiting_tool_results");
    }
}

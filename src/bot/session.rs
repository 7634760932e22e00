use crate::domain::deposit::DepositMethod;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Where a chat currently is in a multi-step flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No flow in progress
    #[default]
    Idle,
    /// Waiting for the user to type a deposit amount
    AwaitingDepositAmount { method: DepositMethod },
    /// Waiting for a proof upload, finished with `/done`
    AwaitingProof { deposit_id: Uuid },
}

/// Per-chat conversation state, in memory only
///
/// State is lost on restart; users just start their flow over.
#[derive(Default)]
pub struct SessionMap {
    states: RwLock<HashMap<i64, SessionState>>,
}

impl SessionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, chat_id: i64) -> SessionState {
        self.states
            .read()
            .await
            .get(&chat_id)
            .copied()
            .unwrap_or_default()
    }

    pub async fn set(&self, chat_id: i64, state: SessionState) {
        self.states.write().await.insert(chat_id, state);
    }

    pub async fn clear(&self, chat_id: i64) {
        self.states.write().await.remove(&chat_id);
    }
}

//! In-memory storage adapters.
//!
//! Default backend for development and tests. State writes replace the
//! whole record under one lock, so per-user atomicity holds trivially.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::UserId;
use crate::domain::state::UserState;
use crate::ports::{ChatLog, ChatLogError, ChatTurn, StateStore, StateStoreError};

/// In-memory user state store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStateStore {
    states: Arc<RwLock<HashMap<UserId, UserState>>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users (useful in tests).
    pub async fn len(&self) -> usize {
        self.states.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.states.read().await.is_empty()
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn find(&self, user_id: &UserId) -> Result<Option<UserState>, StateStoreError> {
        let states = self.states.read().await;
        Ok(states.get(user_id).cloned())
    }

    async fn save(&self, state: &UserState) -> Result<(), StateStoreError> {
        let mut states = self.states.write().await;
        states.insert(state.user_id.clone(), state.clone());
        Ok(())
    }
}

/// In-memory chat log, capped per user.
#[derive(Debug, Clone)]
pub struct InMemoryChatLog {
    turns: Arc<RwLock<HashMap<UserId, Vec<ChatTurn>>>>,
    cap: usize,
}

impl InMemoryChatLog {
    /// Creates a log retaining at most `max_turns` question/answer rounds
    /// (twice that in stored turns).
    pub fn new(max_turns: usize) -> Self {
        Self {
            turns: Arc::new(RwLock::new(HashMap::new())),
            cap: max_turns * 2,
        }
    }
}

#[async_trait]
impl ChatLog for InMemoryChatLog {
    async fn recent(&self, user_id: &UserId) -> Result<Vec<ChatTurn>, ChatLogError> {
        let turns = self.turns.read().await;
        Ok(turns.get(user_id).cloned().unwrap_or_default())
    }

    async fn append(&self, user_id: &UserId, turn: ChatTurn) -> Result<(), ChatLogError> {
        let mut turns = self.turns.write().await;
        let log = turns.entry(user_id.clone()).or_default();
        log.push(turn);
        if log.len() > self.cap {
            let excess = log.len() - self.cap;
            log.drain(..excess);
        }
        Ok(())
    }
}

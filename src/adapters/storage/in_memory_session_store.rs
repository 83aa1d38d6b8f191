//! In-Memory Session Store Adapter
//!
//! Keeps chat sessions in process memory, one async mutex per session.
//! Sessions do not survive a restart.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::domain::drafting::{ChatSession, SessionSummary};
use crate::domain::foundation::ChatSessionId;
use crate::ports::{SessionHandle, SessionStore, StoreError};

#[derive(Debug)]
struct StoredSession {
    handle: SessionHandle,
    /// Last published summary; stands in while a turn holds the lock.
    summary: SessionSummary,
}

impl StoredSession {
    fn current_summary(&self) -> SessionSummary {
        match self.handle.try_lock() {
            Ok(session) => session.summary(),
            Err(_) => self.summary.clone(),
        }
    }
}

/// In-memory storage for chat sessions
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<ChatSessionId, StoredSession>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Remove every session (useful for tests)
    pub async fn clear(&self) {
        self.sessions.write().await.clear();
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, session: ChatSession) -> Result<SessionHandle, StoreError> {
        let id = *session.id();
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&id) {
            return Err(StoreError::AlreadyExists(id));
        }
        let summary = session.summary();
        let handle = Arc::new(Mutex::new(session));
        sessions.insert(
            id,
            StoredSession {
                handle: Arc::clone(&handle),
                summary,
            },
        );
        Ok(handle)
    }

    async fn get(&self, id: &ChatSessionId) -> Result<SessionHandle, StoreError> {
        self.sessions
            .read()
            .await
            .get(id)
            .map(|stored| Arc::clone(&stored.handle))
            .ok_or(StoreError::NotFound(*id))
    }

    async fn list(&self) -> Result<Vec<SessionSummary>, StoreError> {
        let mut summaries: Vec<SessionSummary> = self
            .sessions
            .read()
            .await
            .values()
            .map(StoredSession::current_summary)
            .collect();
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }

    async fn refresh_summary(&self, summary: SessionSummary) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().await;
        let stored = sessions
            .get_mut(&summary.id)
            .ok_or(StoreError::NotFound(summary.id))?;
        stored.summary = summary;
        Ok(())
    }

    async fn delete(&self, id: &ChatSessionId) -> Result<(), StoreError> {
        self.sessions
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(*id))
    }
}

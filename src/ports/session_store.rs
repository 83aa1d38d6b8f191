//! Session Store Port - Interface for keeping chat sessions.
//!
//! Each stored session is handed out behind its own async mutex. Holding the
//! lock for the whole turn serializes turns on one session while distinct
//! sessions proceed independently.
//!
//! Listings never wait on a session lock. The store keeps a summary of each
//! session, which callers refresh after changing the session.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::drafting::{ChatSession, SessionSummary};
use crate::domain::foundation::ChatSessionId;

/// Shared, lockable handle to a stored session.
pub type SessionHandle = Arc<Mutex<ChatSession>>;

/// Errors that can occur during session store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Session not found: {0}")]
    NotFound(ChatSessionId),

    #[error("Session already exists: {0}")]
    AlreadyExists(ChatSessionId),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Port for creating, finding and removing chat sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Stores a new session and returns its handle.
    ///
    /// # Errors
    /// Returns `StoreError::AlreadyExists` if the id is taken
    async fn create(&self, session: ChatSession) -> Result<SessionHandle, StoreError>;

    /// Returns the handle for a session.
    ///
    /// # Errors
    /// Returns `StoreError::NotFound` if no session has this id
    async fn get(&self, id: &ChatSessionId) -> Result<SessionHandle, StoreError>;

    /// Lists summaries of all sessions, most recently updated first.
    ///
    /// A session locked by an in-flight turn is listed as it was before that
    /// turn.
    async fn list(&self) -> Result<Vec<SessionSummary>, StoreError>;

    /// Records the latest summary of a session after it changed.
    ///
    /// # Errors
    /// Returns `StoreError::NotFound` if no session has this id
    async fn refresh_summary(&self, summary: SessionSummary) -> Result<(), StoreError>;

    /// Removes a session.
    ///
    /// # Errors
    /// Returns `StoreError::NotFound` if no session has this id
    async fn delete(&self, id: &ChatSessionId) -> Result<(), StoreError>;
}

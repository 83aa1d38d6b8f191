//! SubmitMessageHandler - Command handler for one user turn.
//!
//! The session lock is held across the whole agent round-trip, so turns on
//! one session run strictly one after another. Turns on different sessions
//! never wait on each other.

use std::sync::Arc;

use crate::application::engine::{ConversationEngine, SessionUpdate};
use crate::application::errors::DraftingError;
use crate::domain::drafting::ChatSession;
use crate::domain::foundation::ChatSessionId;
use crate::ports::SessionStore;

/// Command to submit a user message to a session.
#[derive(Debug, Clone)]
pub struct SubmitMessageCommand {
    pub session_id: ChatSessionId,
    pub content: String,
}

impl SubmitMessageCommand {
    pub fn new(session_id: ChatSessionId, content: impl Into<String>) -> Self {
        Self {
            session_id,
            content: content.into(),
        }
    }
}

/// Result of a submitted turn.
#[derive(Debug, Clone)]
pub struct SubmitMessageResult {
    pub update: SessionUpdate,
    /// Session snapshot after the turn.
    pub session: ChatSession,
}

pub struct SubmitMessageHandler {
    store: Arc<dyn SessionStore>,
    engine: ConversationEngine,
}

impl SubmitMessageHandler {
    pub fn new(store: Arc<dyn SessionStore>, engine: ConversationEngine) -> Self {
        Self { store, engine }
    }

    pub async fn handle(
        &self,
        cmd: SubmitMessageCommand,
    ) -> Result<SubmitMessageResult, DraftingError> {
        let handle = self.store.get(&cmd.session_id).await?;
        let mut session = handle.lock().await;

        let update = self.engine.submit(&mut session, &cmd.content).await?;
        self.store.refresh_summary(session.summary()).await?;

        Ok(SubmitMessageResult {
            update,
            session: session.clone(),
        })
    }
}

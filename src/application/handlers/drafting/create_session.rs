//! CreateSessionHandler - Command handler for starting a new chat.

use std::sync::Arc;

use tracing::info;

use crate::application::errors::DraftingError;
use crate::domain::drafting::ChatSession;
use crate::domain::foundation::ChatSessionId;
use crate::ports::SessionStore;

/// Handler for creating sessions.
pub struct CreateSessionHandler {
    store: Arc<dyn SessionStore>,
}

impl CreateSessionHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Creates an empty drafting session and returns a snapshot of it.
    pub async fn handle(&self) -> Result<ChatSession, DraftingError> {
        let session = ChatSession::new(ChatSessionId::new());
        let snapshot = session.clone();

        self.store.create(session).await?;
        info!(session_id = %snapshot.id(), "Chat session created");

        Ok(snapshot)
    }
}

//! GetSessionHandler - Query handler for one chat session.

use std::sync::Arc;

use crate::application::errors::DraftingError;
use crate::domain::drafting::ChatSession;
use crate::domain::foundation::ChatSessionId;
use crate::ports::SessionStore;

/// Handler returning a snapshot of a session.
///
/// Waits for any in-flight turn on the session to finish.
pub struct GetSessionHandler {
    store: Arc<dyn SessionStore>,
}

impl GetSessionHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, session_id: ChatSessionId) -> Result<ChatSession, DraftingError> {
        let handle = self.store.get(&session_id).await?;
        let session = handle.lock().await;
        Ok(session.clone())
    }
}

//! DeleteSessionHandler - Command handler for removing a chat.

use std::sync::Arc;

use tracing::info;

use crate::application::errors::DraftingError;
use crate::domain::foundation::ChatSessionId;
use crate::ports::SessionStore;

pub struct DeleteSessionHandler {
    store: Arc<dyn SessionStore>,
}

impl DeleteSessionHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, session_id: ChatSessionId) -> Result<(), DraftingError> {
        self.store.delete(&session_id).await?;
        info!(session_id = %session_id, "Chat session deleted");
        Ok(())
    }
}

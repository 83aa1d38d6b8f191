//! EditDraftHandler - Command handler for manual draft edits.
//!
//! Stores the text exactly as the user edited it; no normalization.

use std::sync::Arc;

use tracing::info;

use crate::application::errors::{DraftingError, Operation};
use crate::domain::drafting::ChatSession;
use crate::domain::foundation::ChatSessionId;
use crate::ports::SessionStore;

#[derive(Debug, Clone)]
pub struct EditDraftCommand {
    pub session_id: ChatSessionId,
    pub text: String,
}

pub struct EditDraftHandler {
    store: Arc<dyn SessionStore>,
}

impl EditDraftHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Replaces the draft and returns the updated session.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` for an unknown id
    /// - `InvalidState` while the session is still drafting
    /// - `Validation` for blank text
    pub async fn handle(&self, cmd: EditDraftCommand) -> Result<ChatSession, DraftingError> {
        let handle = self.store.get(&cmd.session_id).await?;
        let mut session = handle.lock().await;

        session
            .edit_draft(cmd.text)
            .map_err(|e| DraftingError::from_domain(Operation::Editing, e))?;
        self.store.refresh_summary(session.summary()).await?;
        info!(session_id = %cmd.session_id, "Draft edited manually");

        Ok(session.clone())
    }
}

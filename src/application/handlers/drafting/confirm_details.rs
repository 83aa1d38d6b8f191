//! ConfirmDetailsHandler - Command handler for user-corrected document details.
//!
//! The user reviews the extracted details, fixes what the patterns got wrong
//! and ticks them as verified. Export is refused until that happens.

use std::sync::Arc;

use tracing::info;

use crate::application::errors::{DraftingError, Operation};
use crate::domain::document::ExtractedDetails;
use crate::domain::drafting::DocumentDetails;
use crate::domain::foundation::ChatSessionId;
use crate::ports::SessionStore;

#[derive(Debug, Clone)]
pub struct ConfirmDetailsCommand {
    pub session_id: ChatSessionId,
    pub details: ExtractedDetails,
    pub verified: bool,
}

pub struct ConfirmDetailsHandler {
    store: Arc<dyn SessionStore>,
}

impl ConfirmDetailsHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Stores the details and returns them as confirmed.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` for an unknown id
    /// - `InvalidState` while the session has no draft
    /// - `Validation` if verified details contain a blank field
    pub async fn handle(&self, cmd: ConfirmDetailsCommand) -> Result<DocumentDetails, DraftingError> {
        let handle = self.store.get(&cmd.session_id).await?;
        let mut session = handle.lock().await;

        session
            .confirm_details(cmd.details, cmd.verified)
            .map_err(|e| DraftingError::from_domain(Operation::Verifying, e))?;
        self.store.refresh_summary(session.summary()).await?;
        info!(session_id = %cmd.session_id, verified = cmd.verified, "Document details confirmed");

        session
            .document_details()
            .cloned()
            .ok_or_else(|| DraftingError::Store("confirmed details were not kept".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemorySessionStore;
    use crate::domain::document::extract;
    use crate::domain::drafting::{ChatSession, Message};
    use crate::domain::foundation::ErrorCode;

    async fn store_with(session: ChatSession) -> (Arc<InMemorySessionStore>, ChatSessionId) {
        let store = Arc::new(InMemorySessionStore::new());
        let id = *session.id();
        store.create(session).await.unwrap();
        (store, id)
    }

    fn reviewing() -> ChatSession {
        let mut session = ChatSession::new(ChatSessionId::new());
        session
            .complete_draft(Message::user("Draft").unwrap(), "NDA.".to_string())
            .unwrap();
        session
    }

    fn command(session_id: ChatSessionId, verified: bool) -> ConfirmDetailsCommand {
        let mut details = extract("This agreement is made between Alice and Bob on May 1.");
        details.jurisdiction = "Ontario".to_string();
        ConfirmDetailsCommand {
            session_id,
            details,
            verified,
        }
    }

    #[tokio::test]
    async fn stores_verified_details_on_session() {
        let (store, id) = store_with(reviewing()).await;
        let handler = ConfirmDetailsHandler::new(store.clone());

        let confirmed = handler.handle(command(id, true)).await.unwrap();

        assert!(confirmed.verified);
        assert_eq!(confirmed.details.jurisdiction, "Ontario");
        let handle = store.get(&id).await.unwrap();
        assert!(handle.lock().await.details_verified());
    }

    #[tokio::test]
    async fn rejects_details_before_draft() {
        let (store, id) = store_with(ChatSession::new(ChatSessionId::new())).await;
        let handler = ConfirmDetailsHandler::new(store);

        let err = handler.handle(command(id, true)).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::InvalidStateTransition);
        assert!(err.to_string().starts_with("Error verifying document details:"));
    }

    #[tokio::test]
    async fn rejects_blank_field_when_verifying() {
        let (store, id) = store_with(reviewing()).await;
        let handler = ConfirmDetailsHandler::new(store);
        let mut cmd = command(id, true);
        cmd.details.party_b = "  ".to_string();

        let err = handler.handle(cmd).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let store = Arc::new(InMemorySessionStore::new());
        let handler = ConfirmDetailsHandler::new(store);

        let err = handler
            .handle(command(ChatSessionId::new(), false))
            .await
            .unwrap_err();

        assert!(matches!(err, DraftingError::SessionNotFound(_)));
    }
}

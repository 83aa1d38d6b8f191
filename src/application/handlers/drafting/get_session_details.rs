//! GetSessionDetailsHandler - Query handler for a session's document details.

use std::sync::Arc;

use crate::application::errors::DraftingError;
use crate::domain::document::extract_from_turns;
use crate::domain::drafting::DocumentDetails;
use crate::domain::foundation::ChatSessionId;
use crate::ports::SessionStore;

/// Returns the details the user confirmed, or else an unverified proposal
/// from the detail extractor run over the session's conversation.
///
/// A session without messages yields all-`"Not Found"` details.
pub struct GetSessionDetailsHandler {
    store: Arc<dyn SessionStore>,
}

impl GetSessionDetailsHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, session_id: ChatSessionId) -> Result<DocumentDetails, DraftingError> {
        let handle = self.store.get(&session_id).await?;
        let session = handle.lock().await;

        Ok(match session.document_details() {
            Some(confirmed) => confirmed.clone(),
            None => DocumentDetails::proposed(extract_from_turns(session.transcript())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemorySessionStore;
    use crate::domain::document::NOT_FOUND;
    use crate::domain::drafting::{ChatSession, Message};

    #[tokio::test]
    async fn extracts_from_conversation_in_order() {
        let store = Arc::new(InMemorySessionStore::new());
        let mut session = ChatSession::new(ChatSessionId::new());
        session
            .record_reply(
                Message::user("This agreement is made between Acme and Beta on June 1.").unwrap(),
                Message::assistant("It is governed by the laws of Ontario.").unwrap(),
            )
            .unwrap();
        let id = *session.id();
        store.create(session).await.unwrap();

        let proposed = GetSessionDetailsHandler::new(store).handle(id).await.unwrap();

        assert!(!proposed.verified);
        let details = proposed.details;
        assert_eq!(details.party_a, "Acme");
        assert_eq!(details.party_b, "Beta");
        assert_eq!(details.jurisdiction, "Ontario");
        assert_eq!(details.term, NOT_FOUND);
    }

    #[tokio::test]
    async fn confirmed_details_take_precedence() {
        let store = Arc::new(InMemorySessionStore::new());
        let mut session = ChatSession::new(ChatSessionId::new());
        session
            .complete_draft(
                Message::user("This agreement is made between Acme and Beta on June 1.").unwrap(),
                "NDA.".to_string(),
            )
            .unwrap();
        let mut corrected = extract_from_turns(session.transcript());
        corrected.party_a = "Acme Holdings Inc.".to_string();
        session.confirm_details(corrected, true).unwrap();
        let id = *session.id();
        store.create(session).await.unwrap();

        let details = GetSessionDetailsHandler::new(store).handle(id).await.unwrap();

        assert!(details.verified);
        assert_eq!(details.details.party_a, "Acme Holdings Inc.");
    }

    #[tokio::test]
    async fn empty_session_yields_sentinels() {
        let store = Arc::new(InMemorySessionStore::new());
        let session = ChatSession::new(ChatSessionId::new());
        let id = *session.id();
        store.create(session).await.unwrap();

        let details = GetSessionDetailsHandler::new(store).handle(id).await.unwrap();
        assert_eq!(details.details.found_count(), 0);
    }
}

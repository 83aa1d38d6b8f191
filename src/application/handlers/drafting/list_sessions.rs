//! ListSessionsHandler - Query handler for the chat list.

use std::sync::Arc;

use crate::application::errors::DraftingError;
use crate::domain::drafting::SessionSummary;
use crate::ports::SessionStore;

/// Handler for listing sessions, most recently updated first.
pub struct ListSessionsHandler {
    store: Arc<dyn SessionStore>,
}

impl ListSessionsHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self) -> Result<Vec<SessionSummary>, DraftingError> {
        Ok(self.store.list().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemorySessionStore;
    use crate::domain::drafting::ChatSession;
    use crate::domain::foundation::ChatSessionId;

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let handler = ListSessionsHandler::new(Arc::new(InMemorySessionStore::new()));
        assert!(handler.handle().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn lists_every_session() {
        let store = Arc::new(InMemorySessionStore::new());
        store.create(ChatSession::new(ChatSessionId::new())).await.unwrap();
        store.create(ChatSession::new(ChatSessionId::new())).await.unwrap();

        let handler = ListSessionsHandler::new(store);
        assert_eq!(handler.handle().await.unwrap().len(), 2);
    }
}

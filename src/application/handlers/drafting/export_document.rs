//! ExportDocumentHandler - Query handler preparing a draft for download.
//!
//! Produces the formatted text, the verified details and a proposed file
//! stem. Rendering to a binary format happens outside this crate.

use std::sync::Arc;

use serde::Serialize;

use crate::application::errors::{DraftingError, Operation};
use crate::domain::document::{format, ExtractedDetails};
use crate::domain::foundation::ChatSessionId;
use crate::ports::SessionStore;

/// Prefix of proposed export file names.
pub const EXPORT_FILE_PREFIX: &str = "Legal_Document_";

/// Number of session id characters in the proposed file name.
pub const EXPORT_ID_CHARS: usize = 4;

/// A formatted draft ready for export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedDocument {
    /// Proposed file name without extension.
    pub file_stem: String,
    /// Draft laid out by the document formatter.
    pub content: String,
    /// Details the user verified for this draft.
    pub details: ExtractedDetails,
}

/// Proposed export file stem for a session.
pub fn export_file_stem(session_id: &ChatSessionId) -> String {
    format!("{}{}", EXPORT_FILE_PREFIX, session_id.short(EXPORT_ID_CHARS))
}

pub struct ExportDocumentHandler {
    store: Arc<dyn SessionStore>,
}

impl ExportDocumentHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// # Errors
    ///
    /// - `Validation` if the session has no draft yet
    /// - `InvalidState` until the user has verified the document details
    pub async fn handle(&self, session_id: ChatSessionId) -> Result<ExportedDocument, DraftingError> {
        let handle = self.store.get(&session_id).await?;
        let session = handle.lock().await;

        if !session.has_draft() {
            return Err(DraftingError::validation(
                Operation::Exporting,
                "No draft available to export",
            ));
        }

        let details = match session.document_details() {
            Some(confirmed) if confirmed.verified => confirmed.details.clone(),
            _ => {
                return Err(DraftingError::InvalidState {
                    operation: Operation::Exporting,
                    message: "Document details must be verified before export".to_string(),
                })
            }
        };

        Ok(ExportedDocument {
            file_stem: export_file_stem(&session_id),
            content: format(session.draft()),
            details,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemorySessionStore;
    use crate::domain::document::extract;
    use crate::domain::drafting::{ChatSession, Message};
    use crate::domain::foundation::ErrorCode;

    fn reviewing(draft: &str) -> ChatSession {
        let mut session = ChatSession::new(ChatSessionId::new());
        session
            .complete_draft(Message::user("Draft").unwrap(), draft.to_string())
            .unwrap();
        session
    }

    async fn store_with(session: ChatSession) -> (Arc<InMemorySessionStore>, ChatSessionId) {
        let store = Arc::new(InMemorySessionStore::new());
        let id = *session.id();
        store.create(session).await.unwrap();
        (store, id)
    }

    #[test]
    fn file_stem_uses_first_four_id_chars() {
        let id: ChatSessionId = "550e8400-e29b-41d4-a716-446655440000".parse().unwrap();
        assert_eq!(export_file_stem(&id), "Legal_Document_550e");
    }

    #[tokio::test]
    async fn exports_formatted_draft_once_verified() {
        let mut session = reviewing("Governing Law\nSome text.");
        let mut details = extract("");
        details.jurisdiction = "Ontario".to_string();
        session.confirm_details(details, true).unwrap();
        let (store, id) = store_with(session).await;

        let exported = ExportDocumentHandler::new(store).handle(id).await.unwrap();

        assert_eq!(exported.content, "1. GOVERNING LAW\n\n    Some text.\n");
        assert_eq!(exported.file_stem, export_file_stem(&id));
        assert_eq!(exported.details.jurisdiction, "Ontario");
    }

    #[tokio::test]
    async fn rejects_export_until_details_verified() {
        let (store, id) = store_with(reviewing("NDA.")).await;
        let handler = ExportDocumentHandler::new(store.clone());

        let err = handler.handle(id).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidStateTransition);

        // Details saved without the verification tick do not unlock export.
        let handle = store.get(&id).await.unwrap();
        handle.lock().await.confirm_details(extract(""), false).unwrap();
        assert!(handler.handle(id).await.is_err());
    }

    #[tokio::test]
    async fn edited_draft_needs_verification_again() {
        let mut session = reviewing("NDA.");
        session.confirm_details(extract(""), true).unwrap();
        session.edit_draft("NDA, amended.".to_string()).unwrap();
        let (store, id) = store_with(session).await;

        let err = ExportDocumentHandler::new(store).handle(id).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidStateTransition);
    }

    #[tokio::test]
    async fn rejects_export_without_draft() {
        let store = Arc::new(InMemorySessionStore::new());
        let session = ChatSession::new(ChatSessionId::new());
        let id = *session.id();
        store.create(session).await.unwrap();

        let err = ExportDocumentHandler::new(store).handle(id).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
    }
}

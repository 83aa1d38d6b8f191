//! Drafting session handlers.

mod confirm_details;
mod create_session;
mod delete_session;
mod edit_draft;
mod export_document;
mod get_session;
mod get_session_details;
mod list_sessions;
mod submit_message;

pub use confirm_details::{ConfirmDetailsCommand, ConfirmDetailsHandler};
pub use create_session::CreateSessionHandler;
pub use delete_session::DeleteSessionHandler;
pub use edit_draft::{EditDraftCommand, EditDraftHandler};
pub use export_document::{
    export_file_stem, ExportDocumentHandler, ExportedDocument, EXPORT_FILE_PREFIX,
};
pub use get_session::GetSessionHandler;
pub use get_session_details::GetSessionDetailsHandler;
pub use list_sessions::ListSessionsHandler;
pub use submit_message::{SubmitMessageCommand, SubmitMessageHandler, SubmitMessageResult};

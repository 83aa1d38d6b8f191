//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod drafting;

pub use drafting::{
    ConfirmDetailsCommand, ConfirmDetailsHandler, CreateSessionHandler, DeleteSessionHandler,
    EditDraftCommand, EditDraftHandler, ExportDocumentHandler, ExportedDocument,
    GetSessionDetailsHandler, GetSessionHandler, ListSessionsHandler, SubmitMessageCommand,
    SubmitMessageHandler, SubmitMessageResult,
};

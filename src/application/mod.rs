//! Application layer - Engine, commands, queries and handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! `ConversationEngine` runs drafting turns against the agent; the handlers
//! resolve sessions from the store and hold their locks.

pub mod engine;
pub mod errors;
pub mod handlers;

pub use engine::{
    ConversationEngine, EngineConfig, GenerationOutcome, HealthStatus, SessionUpdate,
    DEFAULT_AGENT_TIMEOUT,
};
pub use errors::{DraftingError, Operation};
pub use handlers::{
    ConfirmDetailsCommand, ConfirmDetailsHandler, CreateSessionHandler, DeleteSessionHandler,
    EditDraftCommand, EditDraftHandler, ExportDocumentHandler, ExportedDocument,
    GetSessionDetailsHandler, GetSessionHandler, ListSessionsHandler, SubmitMessageCommand,
    SubmitMessageHandler, SubmitMessageResult,
};

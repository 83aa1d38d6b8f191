//! Drafting module - Chat sessions that produce legal documents.
//!
//! # Module Organization
//!
//! - `phase` - `Drafting`/`Reviewing` state machine
//! - `message` - immutable conversation messages
//! - `session` - the `ChatSession` aggregate
//! - `document_details` - user-confirmed details and their verification
//! - `protocol` - completion marker and fixed acknowledgments
//! - `prompts` - system prompt and refinement instruction templates

mod document_details;
mod message;
mod phase;
pub mod prompts;
pub mod protocol;
mod session;

pub use document_details::DocumentDetails;
pub use message::{Message, MessageMetadata, MessageRole};
pub use phase::DraftingPhase;
pub use prompts::{refinement_instruction, DRAFTING_SYSTEM_PROMPT, LEGAL_SEARCH_TOOL};
pub use protocol::{
    completion_wire_form, detect_completion, COMPLETION_MARKER, DRAFT_READY_ACK,
    DRAFT_UPDATED_ACK,
};
pub use session::{title_from, ChatSession, SessionSummary, NEW_CHAT_TITLE, TITLE_PREVIEW_CHARS};

//! HTTP DTOs for drafting endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use serde::{Deserialize, Serialize};

use crate::application::{ExportedDocument, GenerationOutcome, SubmitMessageResult};
use crate::domain::document::ExtractedDetails;
use crate::domain::drafting::{
    ChatSession, DocumentDetails, DraftingPhase, Message, MessageRole, SessionSummary,
};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// A user turn on a session.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitMessageRequest {
    pub content: String,
}

/// Replacement text for a session's draft.
#[derive(Debug, Clone, Deserialize)]
pub struct EditDraftRequest {
    pub text: String,
}

/// Details corrected by the user, with the verification tick.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmDetailsRequest {
    pub details: ExtractedDetails,
    #[serde(default)]
    pub verified: bool,
}

/// One prior turn supplied by a stateless caller.
///
/// Roles other than `user` and `assistant` are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryEntry {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: String,
}

impl HistoryEntry {
    pub fn message_role(&self) -> Option<MessageRole> {
        match self.role.as_str() {
            "user" => Some(MessageRole::User),
            "assistant" => Some(MessageRole::Assistant),
            _ => None,
        }
    }

    /// The turn as a domain message; `None` for unknown roles or blank content.
    pub fn into_message(self) -> Option<Message> {
        let role = self.message_role()?;
        Message::new(role, self.content).ok()
    }
}

/// Converts supplied history for an agent call, skipping unusable turns.
pub fn history_to_messages(entries: Vec<HistoryEntry>) -> Vec<Message> {
    entries
        .into_iter()
        .filter_map(HistoryEntry::into_message)
        .collect()
}

/// Contents of the user and assistant turns, as given, for detail extraction.
pub fn history_contents(entries: &[HistoryEntry]) -> Vec<&str> {
    entries
        .iter()
        .filter(|entry| entry.message_role().is_some())
        .map(|entry| entry.content.as_str())
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub conversation_history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefineRequest {
    #[serde(default)]
    pub current_draft: String,
    #[serde(default)]
    pub user_request: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractDetailsRequest {
    #[serde(default)]
    pub conversation_history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FormatRequest {
    pub text: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    pub created_at: String,
}

impl From<&Message> for MessageResponse {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id().to_string(),
            role: message.role(),
            content: message.content().to_string(),
            created_at: message.created_at().to_rfc3339(),
        }
    }
}

/// Full session view.
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub id: String,
    pub title: String,
    pub phase: DraftingPhase,
    pub draft: String,
    pub details_verified: bool,
    pub messages: Vec<MessageResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&ChatSession> for SessionResponse {
    fn from(session: &ChatSession) -> Self {
        Self {
            id: session.id().to_string(),
            title: session.title().to_string(),
            phase: session.phase(),
            draft: session.draft().to_string(),
            details_verified: session.details_verified(),
            messages: session.messages().iter().map(Into::into).collect(),
            created_at: session.created_at().to_rfc3339(),
            updated_at: session.updated_at().to_rfc3339(),
        }
    }
}

/// Session summary for list responses.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummaryResponse {
    pub id: String,
    pub title: String,
    pub phase: DraftingPhase,
    pub message_count: usize,
    pub created_at: String,
    pub updated_at: String,
}

impl From<SessionSummary> for SessionSummaryResponse {
    fn from(summary: SessionSummary) -> Self {
        Self {
            id: summary.id.to_string(),
            title: summary.title,
            phase: summary.phase,
            message_count: summary.message_count,
            created_at: summary.created_at.to_rfc3339(),
            updated_at: summary.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionListResponse {
    pub items: Vec<SessionSummaryResponse>,
    pub total: usize,
}

impl From<Vec<SessionSummary>> for SessionListResponse {
    fn from(summaries: Vec<SessionSummary>) -> Self {
        Self {
            total: summaries.len(),
            items: summaries.into_iter().map(Into::into).collect(),
        }
    }
}

/// Outcome of a submitted turn.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitMessageResponse {
    pub session_id: String,
    pub message: MessageResponse,
    pub phase: DraftingPhase,
    pub draft: String,
    pub draft_completed: bool,
    pub title: String,
}

impl From<SubmitMessageResult> for SubmitMessageResponse {
    fn from(result: SubmitMessageResult) -> Self {
        let update = result.update;
        Self {
            session_id: update.session_id.to_string(),
            message: (&update.assistant_message).into(),
            phase: update.phase,
            draft: update.draft,
            draft_completed: update.draft_completed,
            title: result.session.title().to_string(),
        }
    }
}

/// Text result of a stateless operation.
#[derive(Debug, Clone, Serialize)]
pub struct ResultResponse {
    pub result: String,
}

impl From<GenerationOutcome> for ResultResponse {
    fn from(outcome: GenerationOutcome) -> Self {
        Self {
            result: outcome.wire_form(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DetailsResponse {
    pub details: ExtractedDetails,
}

/// A session's document details and whether the user verified them.
#[derive(Debug, Clone, Serialize)]
pub struct SessionDetailsResponse {
    pub details: ExtractedDetails,
    pub verified: bool,
}

impl From<DocumentDetails> for SessionDetailsResponse {
    fn from(document: DocumentDetails) -> Self {
        Self {
            details: document.details,
            verified: document.verified,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentResponse {
    pub file_stem: String,
    pub content: String,
    pub details: ExtractedDetails,
}

impl From<ExportedDocument> for DocumentResponse {
    fn from(doc: ExportedDocument) -> Self {
        Self {
            file_stem: doc.file_stem,
            content: doc.content,
            details: doc.details,
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

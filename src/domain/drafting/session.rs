//! ChatSession aggregate.
//!
//! A chat session owns the conversation with the drafting agent and the
//! current draft. It moves from `Drafting` to `Reviewing` exactly once, when
//! the agent first delivers a complete document.
//!
//! # Aggregate Boundary
//!
//! - Messages and the draft are only modified through session methods
//! - Each mutating method validates everything before changing any field,
//!   so a rejected call leaves the session untouched

use crate::domain::foundation::{
    ChatSessionId, DomainError, ErrorCode, StateMachine, Timestamp,
};
use serde::{Deserialize, Serialize};

use crate::domain::document::ExtractedDetails;

use super::document_details::DocumentDetails;
use super::message::Message;
use super::phase::DraftingPhase;
use super::protocol::{DRAFT_READY_ACK, DRAFT_UPDATED_ACK};

/// Title of a session that has not received a user message yet.
pub const NEW_CHAT_TITLE: &str = "New Chat";

/// Number of characters of the first user message kept in the title.
pub const TITLE_PREVIEW_CHARS: usize = 30;

/// Derives a session title from the first user message.
///
/// Text longer than [`TITLE_PREVIEW_CHARS`] characters is cut and suffixed
/// with `"..."`.
pub fn title_from(text: &str) -> String {
    if text.chars().count() > TITLE_PREVIEW_CHARS {
        let preview: String = text.chars().take(TITLE_PREVIEW_CHARS).collect();
        format!("{}...", preview)
    } else {
        text.to_string()
    }
}

/// ChatSession aggregate - one drafting conversation and its draft.
///
/// # Invariants
///
/// - `phase` is `Reviewing` iff a complete draft has been delivered
/// - `draft` is non-empty whenever `phase` is `Reviewing`
/// - `messages` only grows
/// - confirmed details exist only once a draft exists, and any change to the
///   draft withdraws their verification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    id: ChatSessionId,
    title: String,
    messages: Vec<Message>,
    draft: String,
    phase: DraftingPhase,
    #[serde(default)]
    details: Option<DocumentDetails>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl ChatSession {
    /// Creates an empty session in the `Drafting` phase.
    pub fn new(id: ChatSessionId) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            title: NEW_CHAT_TITLE.to_string(),
            messages: Vec::new(),
            draft: String::new(),
            phase: DraftingPhase::Drafting,
            details: None,
            created_at: now,
            updated_at: now,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &ChatSessionId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Current draft; empty while drafting.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn phase(&self) -> DraftingPhase {
        self.phase
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Returns true once a complete draft has been delivered.
    pub fn has_draft(&self) -> bool {
        self.phase.has_draft() && !self.draft.is_empty()
    }

    /// Details confirmed by the user, if any.
    pub fn document_details(&self) -> Option<&DocumentDetails> {
        self.details.as_ref()
    }

    /// Returns true if the user has verified the details of the current draft.
    pub fn details_verified(&self) -> bool {
        self.details.as_ref().map_or(false, |d| d.verified)
    }

    /// Message contents in conversation order.
    pub fn transcript(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(|m| m.content())
    }

    /// The history the agent sees for a drafting turn: every prior message
    /// followed by `next`.
    pub fn history_with(&self, next: &Message) -> Vec<Message> {
        let mut history = Vec::with_capacity(self.messages.len() + 1);
        history.extend(self.messages.iter().cloned());
        history.push(next.clone());
        history
    }

    /// Returns a lightweight summary for listings.
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id,
            title: self.title.clone(),
            phase: self.phase,
            message_count: self.messages.len(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Turns
    // ─────────────────────────────────────────────────────────────────────────

    /// Records a drafting turn in which the agent replied without a draft.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the session is not drafting
    /// - `ValidationFailed` if either message has the wrong role
    pub fn record_reply(&mut self, user: Message, reply: Message) -> Result<(), DomainError> {
        self.ensure_phase(DraftingPhase::Drafting)?;
        Self::ensure_turn_roles(&user, &reply)?;

        self.adopt_title(&user);
        self.messages.push(user);
        self.messages.push(reply);
        self.touch();
        Ok(())
    }

    /// Records the drafting turn that delivered the first complete draft.
    ///
    /// Appends the user message and the fixed draft-ready acknowledgment,
    /// stores `draft`, and moves the session to `Reviewing`.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the session is already reviewing
    /// - `ValidationFailed` if `draft` is blank
    pub fn complete_draft(&mut self, user: Message, draft: String) -> Result<(), DomainError> {
        self.ensure_phase(DraftingPhase::Drafting)?;
        let next_phase = self.next_phase(DraftingPhase::Reviewing)?;
        Self::ensure_draft(&draft)?;
        let ack = Message::assistant(DRAFT_READY_ACK)?;
        Self::ensure_turn_roles(&user, &ack)?;

        self.adopt_title(&user);
        self.messages.push(user);
        self.messages.push(ack);
        self.draft = draft;
        self.phase = next_phase;
        self.touch();
        Ok(())
    }

    /// Records a review turn that replaced the draft with a refined version.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the session is still drafting
    /// - `ValidationFailed` if `draft` is blank
    pub fn apply_refinement(&mut self, user: Message, draft: String) -> Result<(), DomainError> {
        self.ensure_phase(DraftingPhase::Reviewing)?;
        Self::ensure_draft(&draft)?;
        let ack = Message::assistant(DRAFT_UPDATED_ACK)?;
        Self::ensure_turn_roles(&user, &ack)?;

        self.adopt_title(&user);
        self.messages.push(user);
        self.messages.push(ack);
        self.draft = draft;
        self.revoke_verification();
        self.touch();
        Ok(())
    }

    /// Replaces the draft with text edited directly by the user.
    ///
    /// No message is recorded.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the session is still drafting
    /// - `ValidationFailed` if `text` is blank
    pub fn edit_draft(&mut self, text: String) -> Result<(), DomainError> {
        self.ensure_phase(DraftingPhase::Reviewing)?;
        Self::ensure_draft(&text)?;

        self.draft = text;
        self.revoke_verification();
        self.touch();
        Ok(())
    }

    /// Stores the user's corrected details and their verification state.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if there is no draft yet
    /// - `ValidationFailed` if verified details contain a blank field
    pub fn confirm_details(
        &mut self,
        details: ExtractedDetails,
        verified: bool,
    ) -> Result<(), DomainError> {
        self.ensure_phase(DraftingPhase::Reviewing)?;
        let confirmed = DocumentDetails::confirmed(details, verified)?;

        self.details = Some(confirmed);
        self.touch();
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn adopt_title(&mut self, user: &Message) {
        if self.title == NEW_CHAT_TITLE {
            self.title = title_from(user.content());
        }
    }

    fn ensure_phase(&self, expected: DraftingPhase) -> Result<(), DomainError> {
        if self.phase != expected {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Session is {}, expected {}", self.phase, expected),
            )
            .with_detail("session_id", self.id.to_string()));
        }
        Ok(())
    }

    fn next_phase(&self, target: DraftingPhase) -> Result<DraftingPhase, DomainError> {
        self.phase.transition_to(target).map_err(|e| {
            DomainError::new(ErrorCode::InvalidStateTransition, e.to_string())
        })
    }

    fn ensure_draft(draft: &str) -> Result<(), DomainError> {
        if draft.trim().is_empty() {
            return Err(DomainError::validation("draft", "Draft cannot be empty"));
        }
        Ok(())
    }

    fn ensure_turn_roles(user: &Message, reply: &Message) -> Result<(), DomainError> {
        if !user.is_user() {
            return Err(DomainError::validation("user", "Turn must start with a user message"));
        }
        if reply.is_user() {
            return Err(DomainError::validation("reply", "Reply must be an assistant message"));
        }
        Ok(())
    }

    fn revoke_verification(&mut self) {
        if let Some(details) = self.details.as_mut() {
            details.revoke();
        }
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}

/// Listing view of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: ChatSessionId,
    pub title: String,
    pub phase: DraftingPhase,
    pub message_count: usize,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::drafting::MessageRole;

    fn user(text: &str) -> Message {
        Message::user(text).unwrap()
    }

    fn reviewing_session() -> ChatSession {
        let mut session = ChatSession::new(ChatSessionId::new());
        session
            .complete_draft(user("Draft an NDA"), "NDA text here.".to_string())
            .unwrap();
        session
    }

    mod construction {
        use super::*;

        #[test]
        fn new_session_starts_drafting_and_empty() {
            let session = ChatSession::new(ChatSessionId::new());
            assert_eq!(session.title(), NEW_CHAT_TITLE);
            assert_eq!(session.phase(), DraftingPhase::Drafting);
            assert!(session.messages().is_empty());
            assert_eq!(session.draft(), "");
            assert!(!session.has_draft());
        }
    }

    mod titles {
        use super::*;

        #[test]
        fn short_text_is_kept_whole() {
            assert_eq!(title_from("I need an NDA"), "I need an NDA");
        }

        #[test]
        fn exactly_thirty_chars_is_not_truncated() {
            let text = "a".repeat(30);
            assert_eq!(title_from(&text), text);
        }

        #[test]
        fn long_text_is_cut_at_thirty_chars_with_ellipsis() {
            let text = "Please draft a residential lease for Ontario";
            assert_eq!(title_from(text), "Please draft a residential lea...");
        }

        #[test]
        fn truncation_counts_characters_not_bytes() {
            let text = "é".repeat(31);
            assert_eq!(title_from(&text), format!("{}...", "é".repeat(30)));
        }

        #[test]
        fn first_user_message_sets_title_once() {
            let mut session = ChatSession::new(ChatSessionId::new());
            session
                .record_reply(user("First"), Message::assistant("Q?").unwrap())
                .unwrap();
            session
                .record_reply(user("Second"), Message::assistant("Q2?").unwrap())
                .unwrap();
            assert_eq!(session.title(), "First");
        }
    }

    mod drafting_turns {
        use super::*;

        #[test]
        fn reply_appends_user_then_assistant() {
            let mut session = ChatSession::new(ChatSessionId::new());
            session
                .record_reply(user("I need an NDA"), Message::assistant("Who are the parties?").unwrap())
                .unwrap();

            let roles: Vec<MessageRole> = session.messages().iter().map(|m| m.role()).collect();
            assert_eq!(roles, vec![MessageRole::User, MessageRole::Assistant]);
            assert_eq!(session.phase(), DraftingPhase::Drafting);
        }

        #[test]
        fn complete_draft_moves_to_reviewing_with_ack() {
            let session = reviewing_session();
            assert_eq!(session.phase(), DraftingPhase::Reviewing);
            assert_eq!(session.draft(), "NDA text here.");
            assert_eq!(session.last_message().unwrap().content(), DRAFT_READY_ACK);
            assert!(session.has_draft());
        }

        #[test]
        fn blank_draft_is_rejected_without_mutation() {
            let mut session = ChatSession::new(ChatSessionId::new());
            let before = session.clone();
            let err = session
                .complete_draft(user("Draft it"), "   ".to_string())
                .unwrap_err();
            assert_eq!(err.code(), ErrorCode::ValidationFailed);
            assert_eq!(session, before);
        }

        #[test]
        fn reply_after_review_started_is_rejected() {
            let mut session = reviewing_session();
            let before = session.clone();
            let err = session
                .record_reply(user("x"), Message::assistant("y").unwrap())
                .unwrap_err();
            assert_eq!(err.code(), ErrorCode::InvalidStateTransition);
            assert_eq!(session, before);
        }

        #[test]
        fn history_with_appends_next_message_without_mutating() {
            let mut session = ChatSession::new(ChatSessionId::new());
            session
                .record_reply(user("one"), Message::assistant("two").unwrap())
                .unwrap();
            let next = user("three");
            let history = session.history_with(&next);
            assert_eq!(history.len(), 3);
            assert_eq!(history[2].content(), "three");
            assert_eq!(session.message_count(), 2);
        }

        #[test]
        fn swapped_roles_are_rejected() {
            let mut session = ChatSession::new(ChatSessionId::new());
            let err = session
                .record_reply(Message::assistant("a").unwrap(), user("b"))
                .unwrap_err();
            assert_eq!(err.code(), ErrorCode::ValidationFailed);
            assert!(session.messages().is_empty());
        }
    }

    mod review_turns {
        use super::*;

        #[test]
        fn refinement_overwrites_draft_and_acknowledges() {
            let mut session = reviewing_session();
            session
                .apply_refinement(user("Add a term"), "Refined NDA.".to_string())
                .unwrap();
            assert_eq!(session.draft(), "Refined NDA.");
            assert_eq!(session.phase(), DraftingPhase::Reviewing);
            assert_eq!(session.last_message().unwrap().content(), DRAFT_UPDATED_ACK);
            assert_eq!(session.message_count(), 4);
        }

        #[test]
        fn refinement_while_drafting_is_rejected() {
            let mut session = ChatSession::new(ChatSessionId::new());
            let err = session
                .apply_refinement(user("Add"), "x".to_string())
                .unwrap_err();
            assert_eq!(err.code(), ErrorCode::InvalidStateTransition);
        }

        #[test]
        fn edit_draft_replaces_text_without_messages() {
            let mut session = reviewing_session();
            session.edit_draft("Hand edited.".to_string()).unwrap();
            assert_eq!(session.draft(), "Hand edited.");
            assert_eq!(session.message_count(), 2);
        }

        #[test]
        fn edit_draft_rejects_blank_text() {
            let mut session = reviewing_session();
            let err = session.edit_draft("\n ".to_string()).unwrap_err();
            assert_eq!(err.code(), ErrorCode::ValidationFailed);
            assert_eq!(session.draft(), "NDA text here.");
        }

        #[test]
        fn edit_draft_while_drafting_is_rejected() {
            let mut session = ChatSession::new(ChatSessionId::new());
            assert!(session.edit_draft("text".to_string()).is_err());
        }
    }

    mod details {
        use super::*;
        use crate::domain::document::extract;

        fn details() -> ExtractedDetails {
            extract("This agreement is made between Alice and Bob on May 1.")
        }

        #[test]
        fn confirm_requires_a_draft() {
            let mut session = ChatSession::new(ChatSessionId::new());
            let err = session.confirm_details(details(), true).unwrap_err();
            assert_eq!(err.code(), ErrorCode::InvalidStateTransition);
            assert!(session.document_details().is_none());
        }

        #[test]
        fn confirm_stores_corrected_values() {
            let mut session = reviewing_session();
            let mut corrected = details();
            corrected.jurisdiction = "Ontario".to_string();

            session.confirm_details(corrected, true).unwrap();

            let stored = session.document_details().unwrap();
            assert_eq!(stored.details.jurisdiction, "Ontario");
            assert!(session.details_verified());
        }

        #[test]
        fn rejected_confirmation_keeps_previous_details() {
            let mut session = reviewing_session();
            session.confirm_details(details(), false).unwrap();
            let before = session.clone();

            let mut blank = details();
            blank.party_a = String::new();
            assert!(session.confirm_details(blank, true).is_err());
            assert_eq!(session, before);
        }

        #[test]
        fn draft_changes_withdraw_verification() {
            let mut session = reviewing_session();
            session.confirm_details(details(), true).unwrap();
            session.edit_draft("Hand edited.".to_string()).unwrap();
            assert!(!session.details_verified());
            assert_eq!(session.document_details().unwrap().details.party_a, "Alice");

            session.confirm_details(details(), true).unwrap();
            session
                .apply_refinement(user("Add a term"), "Refined NDA.".to_string())
                .unwrap();
            assert!(!session.details_verified());
        }
    }

    #[test]
    fn summary_reflects_session() {
        let session = reviewing_session();
        let summary = session.summary();
        assert_eq!(summary.id, *session.id());
        assert_eq!(summary.title, "Draft an NDA");
        assert_eq!(summary.phase, DraftingPhase::Reviewing);
        assert_eq!(summary.message_count, 2);
    }

    #[test]
    fn transcript_yields_contents_in_order() {
        let session = reviewing_session();
        let contents: Vec<&str> = session.transcript().collect();
        assert_eq!(contents, vec!["Draft an NDA", DRAFT_READY_ACK]);
    }
}

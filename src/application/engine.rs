//! ConversationEngine - drives chat sessions through drafting and review.
//!
//! # Turn Flow
//!
//! 1. Validate the user text
//! 2. Drafting: send the text with the full history to the agent and look
//!    for the completion marker
//! 3. Reviewing: send a refinement instruction embedding the current draft,
//!    with no history, and take the whole output as the new draft
//! 4. Apply the result to the session only after the agent call succeeded
//!
//! The engine never locks sessions itself; callers hold the per-session lock
//! across `submit`.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::time::timeout;
use tracing::{info, warn};

use crate::domain::document::{extract_from_turns, normalize, ExtractedDetails};
use crate::domain::drafting::{
    completion_wire_form, detect_completion, refinement_instruction, ChatSession, DraftingPhase,
    Message,
};
use crate::domain::foundation::ChatSessionId;
use crate::ports::{AgentError, AgentInfo, AgentRequest, DraftingAgent};

use super::errors::{DraftingError, Operation};

/// Default bound on a single agent turn, including tool rounds and retries.
pub const DEFAULT_AGENT_TIMEOUT: Duration = Duration::from_secs(180);

/// Engine tuning.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Upper bound on one agent invocation.
    pub agent_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            agent_timeout: DEFAULT_AGENT_TIMEOUT,
        }
    }
}

impl EngineConfig {
    pub fn with_agent_timeout(mut self, agent_timeout: Duration) -> Self {
        self.agent_timeout = agent_timeout;
        self
    }
}

/// Interpretation of one drafting-phase agent output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// The agent is still gathering information; raw output.
    Reply(String),
    /// The agent delivered a document; normalized draft.
    DraftComplete(String),
}

impl GenerationOutcome {
    /// Interprets raw agent output.
    ///
    /// # Errors
    ///
    /// Returns `AgentError::EmptyResponse` for blank output or a marker with
    /// nothing after it.
    pub fn from_output(output: &str) -> Result<Self, AgentError> {
        if output.trim().is_empty() {
            return Err(AgentError::empty_response("agent returned no output"));
        }
        match detect_completion(output) {
            Some(rest) => {
                let draft = normalize(rest);
                if draft.is_empty() {
                    return Err(AgentError::empty_response(
                        "no document after completion marker",
                    ));
                }
                Ok(Self::DraftComplete(draft))
            }
            None => Ok(Self::Reply(output.to_string())),
        }
    }

    /// Text form returned to stateless callers.
    pub fn wire_form(&self) -> String {
        match self {
            Self::Reply(raw) => raw.clone(),
            Self::DraftComplete(draft) => completion_wire_form(draft),
        }
    }

    pub fn is_draft_complete(&self) -> bool {
        matches!(self, Self::DraftComplete(_))
    }
}

/// What a submitted turn changed.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionUpdate {
    pub session_id: ChatSessionId,
    /// The assistant message appended by this turn.
    pub assistant_message: Message,
    /// Phase after the turn.
    pub phase: DraftingPhase,
    /// Draft after the turn; empty while drafting.
    pub draft: String,
    /// True if this turn moved the session from drafting to reviewing.
    pub draft_completed: bool,
}

/// Service health as seen by callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub ai_configured: bool,
    pub agent: AgentInfo,
}

/// Orchestrates drafting turns against an injected agent.
#[derive(Clone)]
pub struct ConversationEngine {
    agent: Arc<dyn DraftingAgent>,
    config: EngineConfig,
}

impl ConversationEngine {
    pub fn new(agent: Arc<dyn DraftingAgent>, config: EngineConfig) -> Self {
        Self { agent, config }
    }

    /// Processes one user turn on a session.
    ///
    /// # Errors
    ///
    /// - `Validation` if `user_text` is blank
    /// - `MissingCredential` if the agent has no credential
    /// - `AgentInvocation` if the call fails, times out or returns nothing usable
    ///
    /// On error the session is left unmodified.
    pub async fn submit(
        &self,
        session: &mut ChatSession,
        user_text: &str,
    ) -> Result<SessionUpdate, DraftingError> {
        let phase = session.phase();
        let operation = operation_for(phase);

        let user_message = Message::user(user_text)
            .map_err(|e| DraftingError::validation(operation, e.to_string()))?;

        info!(
            session_id = %session.id(),
            phase = %phase,
            message_count = session.message_count(),
            "Processing drafting turn"
        );

        let applied = match phase {
            DraftingPhase::Drafting => {
                let request = AgentRequest::new(user_text)
                    .with_history(session.history_with(&user_message));
                let output = self.call_agent(operation, request).await?;
                let outcome = GenerationOutcome::from_output(&output)
                    .map_err(|e| DraftingError::from_agent(operation, e))?;

                match outcome {
                    GenerationOutcome::DraftComplete(draft) => {
                        session.complete_draft(user_message, draft)
                    }
                    GenerationOutcome::Reply(raw) => {
                        let reply = Message::assistant(raw)
                            .map_err(|e| DraftingError::validation(operation, e.to_string()))?;
                        session.record_reply(user_message, reply)
                    }
                }
            }
            DraftingPhase::Reviewing => {
                let draft = self.refine_draft(session.draft(), user_text).await?;
                session.apply_refinement(user_message, draft)
            }
        };
        applied.map_err(|e| DraftingError::from_domain(operation, e))?;

        let draft_completed = phase == DraftingPhase::Drafting && session.has_draft();
        if draft_completed {
            info!(session_id = %session.id(), "Draft completed, session moved to review");
        }

        let assistant_message = session
            .last_message()
            .cloned()
            .ok_or_else(|| DraftingError::Store("turn recorded no messages".to_string()))?;

        Ok(SessionUpdate {
            session_id: *session.id(),
            assistant_message,
            phase: session.phase(),
            draft: session.draft().to_string(),
            draft_completed,
        })
    }

    /// Runs one stateless drafting call.
    ///
    /// The prompt is appended to `history` as a user message before the call,
    /// matching what a session turn sends.
    pub async fn generate(
        &self,
        prompt: &str,
        mut history: Vec<Message>,
    ) -> Result<GenerationOutcome, DraftingError> {
        let operation = Operation::Generating;
        let user_message = Message::user(prompt)
            .map_err(|_| DraftingError::validation(operation, "Prompt is required"))?;
        history.push(user_message);

        let request = AgentRequest::new(prompt).with_history(history);
        let output = self.call_agent(operation, request).await?;
        GenerationOutcome::from_output(&output).map_err(|e| DraftingError::from_agent(operation, e))
    }

    /// Refines a document per a user request, returning the normalized result.
    pub async fn refine(
        &self,
        current_draft: &str,
        user_request: &str,
    ) -> Result<String, DraftingError> {
        let operation = Operation::Refining;
        if current_draft.trim().is_empty() || user_request.trim().is_empty() {
            return Err(DraftingError::validation(
                operation,
                "Both current_draft and user_request are required",
            ));
        }
        self.refine_draft(current_draft, user_request).await
    }

    /// Extracts details from supplied conversation turns.
    ///
    /// Never fails; an empty conversation yields every field as not found.
    pub fn extract_details<'a, I>(&self, turns: I) -> ExtractedDetails
    where
        I: IntoIterator<Item = &'a str>,
    {
        extract_from_turns(turns)
    }

    /// Reports whether the agent is usable.
    pub fn health(&self) -> HealthStatus {
        let agent = self.agent.agent_info();
        HealthStatus {
            status: "healthy",
            ai_configured: self.agent.ensure_ready().is_ok(),
            agent,
        }
    }

    async fn refine_draft(&self, draft: &str, user_request: &str) -> Result<String, DraftingError> {
        let operation = Operation::Refining;
        let request = AgentRequest::new(refinement_instruction(draft, user_request));
        let output = self.call_agent(operation, request).await?;

        let refined = normalize(&output);
        if refined.is_empty() {
            return Err(DraftingError::from_agent(
                operation,
                AgentError::empty_response("refinement returned no document"),
            ));
        }
        Ok(refined)
    }

    async fn call_agent(
        &self,
        operation: Operation,
        request: AgentRequest,
    ) -> Result<String, DraftingError> {
        self.agent
            .ensure_ready()
            .map_err(|e| DraftingError::from_agent(operation, e))?;

        let limit = self.config.agent_timeout;
        match timeout(limit, self.agent.invoke(request)).await {
            Ok(Ok(response)) => Ok(response.output),
            Ok(Err(e)) => {
                warn!(operation = %operation, error = %e, "Agent call failed");
                Err(DraftingError::from_agent(operation, e))
            }
            Err(_) => {
                warn!(operation = %operation, timeout_secs = limit.as_secs(), "Agent call timed out");
                Err(DraftingError::from_agent(
                    operation,
                    AgentError::Timeout {
                        timeout_secs: limit.as_secs(),
                    },
                ))
            }
        }
    }
}

fn operation_for(phase: DraftingPhase) -> Operation {
    match phase {
        DraftingPhase::Drafting => Operation::Generating,
        DraftingPhase::Reviewing => Operation::Refining,
    }
}

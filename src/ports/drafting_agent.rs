//! Drafting Agent Port - Interface for the external LLM agent.
//!
//! The agent is a black box that takes the user's input plus prior
//! conversation and returns a single output string. The output may contain
//! the completion marker; the port makes no other promise about it.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct EchoAgent;
//!
//! #[async_trait]
//! impl DraftingAgent for EchoAgent {
//!     async fn invoke(&self, request: AgentRequest) -> Result<AgentResponse, AgentError> {
//!         Ok(AgentResponse::new(request.input))
//!     }
//!
//!     fn agent_info(&self) -> AgentInfo {
//!         AgentInfo::new("echo", "none")
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::drafting::Message;

/// Port for invoking the drafting agent.
#[async_trait]
pub trait DraftingAgent: Send + Sync {
    /// Runs one agent turn.
    async fn invoke(&self, request: AgentRequest) -> Result<AgentResponse, AgentError>;

    /// Checks that the agent can be invoked at all.
    ///
    /// Called before every invocation so that a missing credential is
    /// reported without attempting a call.
    fn ensure_ready(&self) -> Result<(), AgentError> {
        Ok(())
    }

    /// Describes the backing provider and model.
    fn agent_info(&self) -> AgentInfo;
}

/// Input for one agent turn.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentRequest {
    /// The text the agent should respond to.
    pub input: String,
    /// Conversation replayed to the agent, oldest first.
    pub history: Vec<Message>,
}

impl AgentRequest {
    /// Creates a request with no history.
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            history: Vec::new(),
        }
    }

    /// Sets the conversation history.
    pub fn with_history(mut self, history: Vec<Message>) -> Self {
        self.history = history;
        self
    }
}

/// Output of one agent turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentResponse {
    pub output: String,
}

impl AgentResponse {
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
        }
    }
}

/// Provider and model behind an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentInfo {
    /// Provider name (e.g., "openrouter", "mock").
    pub provider: String,
    /// Model identifier.
    pub model: String,
    /// Whether a credential is configured.
    pub credential_configured: bool,
}

impl AgentInfo {
    /// Creates agent info with a configured credential.
    pub fn new(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            credential_configured: true,
        }
    }

    /// Sets whether a credential is configured.
    pub fn with_credential(mut self, configured: bool) -> Self {
        self.credential_configured = configured;
        self
    }
}

/// Drafting agent errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgentError {
    /// No API key is configured for the agent.
    #[error("missing credential: {0}")]
    MissingCredential(String),

    /// The call did not finish in time.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u64,
    },

    /// Rate limited by the provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// The provider rejected the credential.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during the request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse the provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// The request was rejected as malformed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The provider answered with no usable content.
    #[error("empty response: {0}")]
    EmptyResponse(String),
}

impl AgentError {
    pub fn missing_credential(name: impl Into<String>) -> Self {
        Self::MissingCredential(name.into())
    }

    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    pub fn empty_response(message: impl Into<String>) -> Self {
        Self::EmptyResponse(message.into())
    }

    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AgentError::RateLimited { .. }
                | AgentError::Unavailable { .. }
                | AgentError::Network(_)
                | AgentError::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builder_sets_history() {
        let history = vec![Message::user("Hi").unwrap()];
        let request = AgentRequest::new("Draft an NDA").with_history(history.clone());
        assert_eq!(request.input, "Draft an NDA");
        assert_eq!(request.history, history);
    }

    #[test]
    fn new_request_has_empty_history() {
        assert!(AgentRequest::new("x").history.is_empty());
    }

    #[test]
    fn agent_info_defaults_to_configured_credential() {
        let info = AgentInfo::new("openrouter", "deepseek");
        assert!(info.credential_configured);
        assert!(!info.with_credential(false).credential_configured);
    }

    #[test]
    fn error_retryable_classification() {
        assert!(AgentError::rate_limited(30).is_retryable());
        assert!(AgentError::unavailable("down").is_retryable());
        assert!(AgentError::network("reset").is_retryable());
        assert!(AgentError::Timeout { timeout_secs: 30 }.is_retryable());

        assert!(!AgentError::AuthenticationFailed.is_retryable());
        assert!(!AgentError::missing_credential("OPENROUTER_API_KEY").is_retryable());
        assert!(!AgentError::parse("bad json").is_retryable());
        assert!(!AgentError::empty_response("no choices").is_retryable());
        assert!(!AgentError::InvalidRequest("bad".into()).is_retryable());
    }

    #[test]
    fn error_messages_include_cause() {
        assert_eq!(
            AgentError::missing_credential("openrouter_api_key").to_string(),
            "missing credential: openrouter_api_key"
        );
        assert_eq!(
            AgentError::Timeout { timeout_secs: 5 }.to_string(),
            "request timed out after 5s"
        );
    }
}

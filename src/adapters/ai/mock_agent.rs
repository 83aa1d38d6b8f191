//! Mock drafting agent for testing.
//!
//! Replays scripted outputs in order and records every request, so tests can
//! drive a session through drafting and review without a real model.
//!
//! # Example
//!
//! ```ignore
//! let agent = MockDraftingAgent::new()
//!     .with_output("Who are the parties?")
//!     .with_output("DRAFT_COMPLETE: NDA text here.");
//!
//! let response = agent.invoke(AgentRequest::new("I need an NDA")).await?;
//! assert_eq!(response.output, "Who are the parties?");
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{AgentError, AgentInfo, AgentRequest, AgentResponse, DraftingAgent};

/// Output returned when the script is exhausted.
pub const DEFAULT_MOCK_OUTPUT: &str = "Mock response";

/// A scripted agent turn.
#[derive(Debug, Clone)]
pub enum MockTurn {
    /// Return this output.
    Output(String),
    /// Fail with this error.
    Error(AgentError),
}

/// Scripted drafting agent.
#[derive(Debug, Clone)]
pub struct MockDraftingAgent {
    script: Arc<Mutex<VecDeque<MockTurn>>>,
    calls: Arc<Mutex<Vec<AgentRequest>>>,
    delay: Duration,
    credential_configured: bool,
}

impl Default for MockDraftingAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDraftingAgent {
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            delay: Duration::ZERO,
            credential_configured: true,
        }
    }

    /// Queues a successful output.
    pub fn with_output(self, output: impl Into<String>) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(MockTurn::Output(output.into()));
        self
    }

    /// Queues a failure.
    pub fn with_error(self, error: AgentError) -> Self {
        self.script.lock().unwrap().push_back(MockTurn::Error(error));
        self
    }

    /// Sets simulated latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Simulates an agent with no API key configured.
    pub fn without_credential(mut self) -> Self {
        self.credential_configured = false;
        self
    }

    /// Returns the number of calls made.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns all recorded requests.
    pub fn get_calls(&self) -> Vec<AgentRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Returns the most recent request.
    pub fn last_call(&self) -> Option<AgentRequest> {
        self.calls.lock().unwrap().last().cloned()
    }

    fn next_turn(&self) -> MockTurn {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| MockTurn::Output(DEFAULT_MOCK_OUTPUT.to_string()))
    }
}

#[async_trait]
impl DraftingAgent for MockDraftingAgent {
    async fn invoke(&self, request: AgentRequest) -> Result<AgentResponse, AgentError> {
        self.calls.lock().unwrap().push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_turn() {
            MockTurn::Output(output) => Ok(AgentResponse::new(output)),
            MockTurn::Error(err) => Err(err),
        }
    }

    fn ensure_ready(&self) -> Result<(), AgentError> {
        if self.credential_configured {
            Ok(())
        } else {
            Err(AgentError::missing_credential("mock_api_key"))
        }
    }

    fn agent_info(&self) -> AgentInfo {
        AgentInfo::new("mock", "mock-drafter").with_credential(self.credential_configured)
    }
}

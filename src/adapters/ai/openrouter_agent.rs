//! OpenRouter Agent - Implementation of DraftingAgent over OpenRouter's
//! OpenAI-compatible chat completions API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenRouterConfig::new(Some(api_key))
//!     .with_model("deepseek/deepseek-chat-v3-0324:free")
//!     .with_temperature(0.3);
//!
//! let agent = OpenRouterAgent::new(config, Some(research_tool))?;
//! ```
//!
//! # Tool Loop
//!
//! Each turn sends the system prompt, the replayed conversation and the
//! `Legal_Web_Search` function definition. When the model answers with tool
//! calls, the tool runs and its output is fed back; this repeats until the
//! model answers in text or `max_tool_rounds` is spent, after which one last
//! call is made without tools.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::legal_research::LegalResearchTool;
use crate::domain::drafting::{Message, MessageRole, DRAFTING_SYSTEM_PROMPT};
use crate::ports::{AgentError, AgentInfo, AgentRequest, AgentResponse, DraftingAgent};

/// Name reported for a missing key.
pub const CREDENTIAL_NAME: &str = "openrouter_api_key";

pub const DEFAULT_MODEL: &str = "deepseek/deepseek-chat-v3-0324:free";
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Configuration for the OpenRouter agent.
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    /// API key; `None` leaves the agent unusable until configured.
    api_key: Option<Secret<String>>,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
    /// First retry delay; doubles on each further retry.
    pub retry_backoff: Duration,
    /// Tool rounds allowed before the model must answer in text.
    pub max_tool_rounds: u32,
    /// Sent as `HTTP-Referer` for OpenRouter attribution.
    pub http_referer: String,
    /// Sent as `X-Title` for OpenRouter attribution.
    pub app_title: String,
}

impl OpenRouterConfig {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.map(Secret::new),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: 0.3,
            timeout: Duration::from_secs(60),
            max_retries: 3,
            retry_backoff: Duration::from_secs(1),
            max_tool_rounds: 5,
            http_referer: "http://localhost:8501".to_string(),
            app_title: "Agentic Legal AI".to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    pub fn with_max_tool_rounds(mut self, rounds: u32) -> Self {
        self.max_tool_rounds = rounds;
        self
    }

    pub fn with_attribution(
        mut self,
        http_referer: impl Into<String>,
        app_title: impl Into<String>,
    ) -> Self {
        self.http_referer = http_referer.into();
        self.app_title = app_title.into();
        self
    }

    /// True if a non-blank key is present.
    pub fn has_api_key(&self) -> bool {
        self.api_key().is_some()
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_ref()
            .map(|k| k.expose_secret().as_str())
            .filter(|k| !k.trim().is_empty())
    }
}

/// Drafting agent backed by OpenRouter.
pub struct OpenRouterAgent {
    config: OpenRouterConfig,
    client: Client,
    research: Option<LegalResearchTool>,
}

impl OpenRouterAgent {
    /// Creates the agent. The research tool is offered to the model when given.
    pub fn new(
        config: OpenRouterConfig,
        research: Option<LegalResearchTool>,
    ) -> Result<Self, AgentError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AgentError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            client,
            research,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    /// Builds the opening message list for a turn.
    ///
    /// The input is appended as a user message unless the history already
    /// ends with it.
    fn initial_messages(request: &AgentRequest) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(request.history.len() + 2);
        messages.push(ChatMessage::text("system", DRAFTING_SYSTEM_PROMPT.as_str()));
        messages.extend(request.history.iter().map(ChatMessage::from_domain));

        let ends_with_input = request
            .history
            .last()
            .map(|m| m.is_user() && m.content() == request.input)
            .unwrap_or(false);
        if !ends_with_input {
            messages.push(ChatMessage::text("user", request.input.as_str()));
        }
        messages
    }

    fn to_chat_request(&self, messages: &[ChatMessage], offer_tools: bool) -> ChatRequest {
        let tools = match (&self.research, offer_tools) {
            (Some(tool), true) => Some(vec![tool.definition()]),
            _ => None,
        };
        ChatRequest {
            model: self.config.model.clone(),
            messages: messages.to_vec(),
            temperature: self.config.temperature,
            tools,
        }
    }

    async fn send_request(&self, body: &ChatRequest) -> Result<Response, AgentError> {
        let api_key = self
            .config
            .api_key()
            .ok_or_else(|| AgentError::missing_credential(CREDENTIAL_NAME))?;

        self.client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .header("HTTP-Referer", &self.config.http_referer)
            .header("X-Title", &self.config.app_title)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AgentError::Timeout {
                        timeout_secs: self.config.timeout.as_secs(),
                    }
                } else if e.is_connect() {
                    AgentError::network(format!("Connection failed: {}", e))
                } else {
                    AgentError::network(e.to_string())
                }
            })
    }

    async fn parse_response(&self, response: Response) -> Result<ChatMessage, AgentError> {
        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let body = response.text().await.unwrap_or_default();
            return Err(error_for_status(status, &body));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AgentError::parse(format!("Failed to parse response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| AgentError::empty_response("No choices in response"))
    }

    /// One chat completion with retries on transient failures.
    async fn complete(&self, body: &ChatRequest) -> Result<ChatMessage, AgentError> {
        let mut last_error = AgentError::network("No attempts made");
        let mut retry_count = 0;

        while retry_count <= self.config.max_retries {
            let attempt = match self.send_request(body).await {
                Ok(response) => self.parse_response(response).await,
                Err(err) => Err(err),
            };

            match attempt {
                Ok(message) => return Ok(message),
                Err(err) => {
                    if !err.is_retryable() || retry_count >= self.config.max_retries {
                        return Err(err);
                    }
                    warn!(attempt = retry_count + 1, error = %err, "OpenRouter call failed, retrying");
                    last_error = err;
                }
            }

            sleep(backoff_delay(self.config.retry_backoff, retry_count)).await;
            retry_count += 1;
        }

        Err(last_error)
    }

    async fn run_tool(&self, call: &WireToolCall) -> String {
        match &self.research {
            Some(tool) if call.function.name == tool.name() => {
                tool.call(&call.function.arguments).await
            }
            _ => format!("Unknown tool: {}", call.function.name),
        }
    }
}

#[async_trait]
impl DraftingAgent for OpenRouterAgent {
    async fn invoke(&self, request: AgentRequest) -> Result<AgentResponse, AgentError> {
        self.ensure_ready()?;

        let mut messages = Self::initial_messages(&request);
        let mut round = 0;

        loop {
            let offer_tools = self.research.is_some() && round < self.config.max_tool_rounds;
            let reply = self
                .complete(&self.to_chat_request(&messages, offer_tools))
                .await?;

            let calls = reply.tool_calls.clone().unwrap_or_default();
            if calls.is_empty() || !offer_tools {
                let output = reply.content.unwrap_or_default();
                info!(
                    model = %self.config.model,
                    tool_rounds = round,
                    output_len = output.len(),
                    "Agent turn complete"
                );
                return Ok(AgentResponse::new(output));
            }

            messages.push(reply);
            for call in &calls {
                debug!(tool = %call.function.name, "Running tool call");
                let result = self.run_tool(call).await;
                messages.push(ChatMessage::tool_result(&call.id, result));
            }
            round += 1;
        }
    }

    fn ensure_ready(&self) -> Result<(), AgentError> {
        if self.config.has_api_key() {
            Ok(())
        } else {
            Err(AgentError::missing_credential(CREDENTIAL_NAME))
        }
    }

    fn agent_info(&self) -> AgentInfo {
        AgentInfo::new("openrouter", &self.config.model).with_credential(self.config.has_api_key())
    }
}

/// Maps a non-success HTTP status to an agent error.
fn error_for_status(status: u16, body: &str) -> AgentError {
    match status {
        401 | 403 => AgentError::AuthenticationFailed,
        429 => AgentError::rate_limited(parse_retry_after(body)),
        400 => AgentError::InvalidRequest(body.to_string()),
        500..=599 => AgentError::unavailable(format!("Server error {}: {}", status, body)),
        _ => AgentError::network(format!("Unexpected status {}: {}", status, body)),
    }
}

/// Reads "try again in Ns" from an error body, defaulting to 30 seconds.
fn parse_retry_after(body: &str) -> u32 {
    const DEFAULT_RETRY_AFTER: u32 = 30;

    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        });

    message
        .as_deref()
        .and_then(|s| s.find("try again in ").map(|idx| &s[idx + 13..]))
        .and_then(|rest| {
            let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse::<u32>().ok()
        })
        .unwrap_or(DEFAULT_RETRY_AFTER)
}

// ----- OpenRouter API Types -----

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<WireToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

impl ChatMessage {
    fn text(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    fn tool_result(call_id: &str, content: String) -> Self {
        Self {
            role: "tool".to_string(),
            content: Some(content),
            tool_calls: None,
            tool_call_id: Some(call_id.to_string()),
        }
    }

    fn from_domain(message: &Message) -> Self {
        let role = match message.role() {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        };
        Self::text(role, message.content())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type", default = "function_kind")]
    kind: String,
    function: WireFunction,
}

fn function_kind() -> String {
    "function".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireFunction {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Exponential backoff from `base`, saturating instead of overflowing.
fn backoff_delay(base: Duration, retry: u32) -> Duration {
    base.saturating_mul(1u32.checked_shl(retry).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{SearchError, WebSearch};
    use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
    use std::sync::{Arc, Mutex};

    fn agent_config(base_url: &str) -> OpenRouterConfig {
        OpenRouterConfig::new(Some("test-key".to_string()))
            .with_base_url(base_url)
            .with_retry_backoff(Duration::ZERO)
            .with_timeout(Duration::from_secs(5))
    }

    #[derive(Clone, Default)]
    struct Scripted {
        replies: Arc<Mutex<Vec<(StatusCode, serde_json::Value)>>>,
        requests: Arc<Mutex<Vec<serde_json::Value>>>,
    }

    async fn scripted_reply(
        State(state): State<Scripted>,
        Json(body): Json<serde_json::Value>,
    ) -> (StatusCode, Json<serde_json::Value>) {
        state.requests.lock().unwrap().push(body);
        let mut replies = state.replies.lock().unwrap();
        let (status, body) = if replies.is_empty() {
            (StatusCode::INTERNAL_SERVER_ERROR, serde_json::json!({}))
        } else {
            replies.remove(0)
        };
        (status, Json(body))
    }

    /// Serves canned chat completion replies on a local port.
    async fn serve(replies: Vec<(StatusCode, serde_json::Value)>) -> (String, Scripted) {
        let state = Scripted {
            replies: Arc::new(Mutex::new(replies)),
            requests: Arc::default(),
        };
        let app = Router::new()
            .route("/chat/completions", post(scripted_reply))
            .with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}", addr), state)
    }

    fn text_reply(content: &str) -> (StatusCode, serde_json::Value) {
        (
            StatusCode::OK,
            serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": content}}]
            }),
        )
    }

    fn tool_reply(query: &str) -> (StatusCode, serde_json::Value) {
        (
            StatusCode::OK,
            serde_json::json!({
                "choices": [{"message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {
                            "name": "Legal_Web_Search",
                            "arguments": serde_json::json!({"query": query}).to_string()
                        }
                    }]
                }}]
            }),
        )
    }

    struct FixedSearch;

    #[async_trait]
    impl WebSearch for FixedSearch {
        async fn search(&self, _query: &str) -> Result<String, SearchError> {
            Ok("Residential Tenancies Act, 2006".to_string())
        }
    }

    mod config {
        use super::*;

        #[test]
        fn defaults_target_openrouter() {
            let config = OpenRouterConfig::new(None);
            assert_eq!(config.model, DEFAULT_MODEL);
            assert_eq!(config.base_url, "https://openrouter.ai/api/v1");
            assert_eq!(config.temperature, 0.3);
            assert_eq!(config.app_title, "Agentic Legal AI");
            assert!(!config.has_api_key());
        }

        #[test]
        fn blank_key_counts_as_missing() {
            assert!(!OpenRouterConfig::new(Some("  ".to_string())).has_api_key());
            assert!(OpenRouterConfig::new(Some("sk-or".to_string())).has_api_key());
        }

        #[test]
        fn builder_sets_fields() {
            let config = OpenRouterConfig::new(None)
                .with_model("other/model")
                .with_temperature(0.7)
                .with_max_retries(1)
                .with_max_tool_rounds(2)
                .with_attribution("https://example.test", "Drafter");
            assert_eq!(config.model, "other/model");
            assert_eq!(config.temperature, 0.7);
            assert_eq!(config.max_retries, 1);
            assert_eq!(config.max_tool_rounds, 2);
            assert_eq!(config.http_referer, "https://example.test");
            assert_eq!(config.app_title, "Drafter");
        }

        #[test]
        fn backoff_doubles_per_retry() {
            let base = Duration::from_millis(100);
            assert_eq!(backoff_delay(base, 0), base);
            assert_eq!(backoff_delay(base, 3), Duration::from_millis(800));
        }

        #[test]
        fn backoff_saturates_for_large_retry_counts() {
            let base = Duration::from_millis(100);
            assert_eq!(backoff_delay(base, 32), base.saturating_mul(u32::MAX));
            assert_eq!(backoff_delay(Duration::MAX, 5), Duration::MAX);
        }
    }

    mod wire {
        use super::*;

        #[test]
        fn status_mapping() {
            assert_eq!(error_for_status(401, ""), AgentError::AuthenticationFailed);
            assert_eq!(
                error_for_status(400, "bad"),
                AgentError::InvalidRequest("bad".to_string())
            );
            assert!(matches!(
                error_for_status(503, "down"),
                AgentError::Unavailable { .. }
            ));
            assert_eq!(error_for_status(429, "{}"), AgentError::rate_limited(30));
        }

        #[test]
        fn parse_retry_after_from_message() {
            let body = r#"{"error":{"message":"Rate limit exceeded. Please try again in 12 seconds."}}"#;
            assert_eq!(parse_retry_after(body), 12);
            assert_eq!(parse_retry_after("not json"), 30);
        }

        #[test]
        fn initial_messages_start_with_system_prompt_and_end_with_input() {
            let request = AgentRequest::new("Draft it");
            let messages = OpenRouterAgent::initial_messages(&request);
            assert_eq!(messages.len(), 2);
            assert_eq!(messages[0].role, "system");
            assert_eq!(messages[1].role, "user");
            assert_eq!(messages[1].content.as_deref(), Some("Draft it"));
        }

        #[test]
        fn input_already_in_history_is_not_repeated() {
            let history = vec![
                Message::user("I need an NDA").unwrap(),
                Message::assistant("Who are the parties?").unwrap(),
                Message::user("Acme and Bolt").unwrap(),
            ];
            let request = AgentRequest::new("Acme and Bolt").with_history(history);
            let messages = OpenRouterAgent::initial_messages(&request);
            let roles: Vec<&str> = messages.iter().map(|m| m.role.as_str()).collect();
            assert_eq!(roles, vec!["system", "user", "assistant", "user"]);
        }
    }

    mod invoke {
        use super::*;

        #[tokio::test]
        async fn missing_key_fails_without_calling() {
            let agent = OpenRouterAgent::new(OpenRouterConfig::new(None), None).unwrap();
            assert_eq!(
                agent.invoke(AgentRequest::new("hi")).await,
                Err(AgentError::missing_credential(CREDENTIAL_NAME))
            );
            assert!(!agent.agent_info().credential_configured);
        }

        #[tokio::test]
        async fn returns_text_answer() {
            let (url, server) = serve(vec![text_reply("Who are the parties?")]).await;
            let agent = OpenRouterAgent::new(agent_config(&url), None).unwrap();

            let response = agent.invoke(AgentRequest::new("I need an NDA")).await.unwrap();

            assert_eq!(response.output, "Who are the parties?");
            let requests = server.requests.lock().unwrap();
            assert_eq!(requests.len(), 1);
            assert_eq!(requests[0]["model"], DEFAULT_MODEL);
            assert!(requests[0].get("tools").is_none());
        }

        #[tokio::test]
        async fn runs_research_tool_then_answers() {
            let (url, server) = serve(vec![
                tool_reply("Ontario lease notice"),
                text_reply("DRAFT_COMPLETE: LEASE AGREEMENT"),
            ])
            .await;
            let tool = LegalResearchTool::new(Arc::new(FixedSearch));
            let agent = OpenRouterAgent::new(agent_config(&url), Some(tool)).unwrap();

            let response = agent.invoke(AgentRequest::new("Draft a lease")).await.unwrap();

            assert_eq!(response.output, "DRAFT_COMPLETE: LEASE AGREEMENT");
            let requests = server.requests.lock().unwrap();
            assert_eq!(requests.len(), 2);
            assert_eq!(requests[0]["tools"][0]["function"]["name"], "Legal_Web_Search");

            let followup = requests[1]["messages"].as_array().unwrap();
            let tool_message = followup.last().unwrap();
            assert_eq!(tool_message["role"], "tool");
            assert_eq!(tool_message["tool_call_id"], "call_1");
            assert_eq!(tool_message["content"], "Residential Tenancies Act, 2006");
        }

        #[tokio::test]
        async fn tool_rounds_are_bounded() {
            let (url, server) = serve(vec![
                tool_reply("first"),
                text_reply("final answer"),
            ])
            .await;
            let tool = LegalResearchTool::new(Arc::new(FixedSearch));
            let agent =
                OpenRouterAgent::new(agent_config(&url).with_max_tool_rounds(1), Some(tool))
                    .unwrap();

            let response = agent.invoke(AgentRequest::new("Draft")).await.unwrap();

            assert_eq!(response.output, "final answer");
            let requests = server.requests.lock().unwrap();
            assert!(requests[1].get("tools").is_none());
        }

        #[tokio::test]
        async fn authentication_failure_is_not_retried() {
            let (url, server) = serve(vec![(
                StatusCode::UNAUTHORIZED,
                serde_json::json!({"error": {"message": "bad key"}}),
            )])
            .await;
            let agent = OpenRouterAgent::new(agent_config(&url), None).unwrap();

            let err = agent.invoke(AgentRequest::new("hi")).await.unwrap_err();

            assert_eq!(err, AgentError::AuthenticationFailed);
            assert_eq!(server.requests.lock().unwrap().len(), 1);
        }

        #[tokio::test]
        async fn server_error_is_retried() {
            let (url, server) = serve(vec![
                (StatusCode::SERVICE_UNAVAILABLE, serde_json::json!({})),
                text_reply("recovered"),
            ])
            .await;
            let agent = OpenRouterAgent::new(agent_config(&url), None).unwrap();

            let response = agent.invoke(AgentRequest::new("hi")).await.unwrap();

            assert_eq!(response.output, "recovered");
            assert_eq!(server.requests.lock().unwrap().len(), 2);
        }

        #[tokio::test]
        async fn retries_stop_at_limit() {
            let (url, server) = serve(Vec::new()).await;
            let agent =
                OpenRouterAgent::new(agent_config(&url).with_max_retries(2), None).unwrap();

            let err = agent.invoke(AgentRequest::new("hi")).await.unwrap_err();

            assert!(matches!(err, AgentError::Unavailable { .. }));
            assert_eq!(server.requests.lock().unwrap().len(), 3);
        }
    }
}

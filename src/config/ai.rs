//! Drafting agent configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Drafting agent configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// OpenRouter API key. Without it the service starts but every agent call
    /// fails with a missing-credential error.
    pub openrouter_api_key: Option<String>,

    /// Model identifier on OpenRouter
    #[serde(default = "default_model")]
    pub model: String,

    /// Chat completions API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Per-request HTTP timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Upper bound on a whole agent turn in seconds, tool rounds and retries included
    #[serde(default = "default_turn_timeout")]
    pub turn_timeout_secs: u64,

    /// Maximum retries on failure
    #[serde(default = "default_retries")]
    pub max_retries: u32,

    /// Research tool rounds allowed per turn
    #[serde(default = "default_tool_rounds")]
    pub max_tool_rounds: u32,

    /// Attribution sent as `HTTP-Referer`
    #[serde(default = "default_http_referer")]
    pub http_referer: String,

    /// Attribution sent as `X-Title`
    #[serde(default = "default_app_title")]
    pub app_title: String,

    /// Web search API base URL
    #[serde(default = "default_search_base_url")]
    pub search_base_url: String,

    /// Web search timeout in seconds
    #[serde(default = "default_search_timeout")]
    pub search_timeout_secs: u64,
}

impl AiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn turn_timeout(&self) -> Duration {
        Duration::from_secs(self.turn_timeout_secs)
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }

    /// Check if an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.openrouter_api_key
            .as_ref()
            .is_some_and(|k| !k.trim().is_empty())
    }

    /// Validate agent configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.model.trim().is_empty() {
            return Err(ValidationError::MissingRequired("AI__MODEL"));
        }
        if !is_http_url(&self.base_url) {
            return Err(ValidationError::InvalidUrl("AI__BASE_URL"));
        }
        if !is_http_url(&self.search_base_url) {
            return Err(ValidationError::InvalidUrl("AI__SEARCH_BASE_URL"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidTemperature);
        }
        if self.timeout_secs == 0 || self.search_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.turn_timeout_secs == 0 {
            return Err(ValidationError::InvalidTurnTimeout);
        }
        if self.max_tool_rounds > 20 {
            return Err(ValidationError::TooManyToolRounds);
        }
        if self.max_retries > 10 {
            return Err(ValidationError::TooManyRetries);
        }
        Ok(())
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            openrouter_api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            temperature: default_temperature(),
            timeout_secs: default_timeout(),
            turn_timeout_secs: default_turn_timeout(),
            max_retries: default_retries(),
            max_tool_rounds: default_tool_rounds(),
            http_referer: default_http_referer(),
            app_title: default_app_title(),
            search_base_url: default_search_base_url(),
            search_timeout_secs: default_search_timeout(),
        }
    }
}

fn default_model() -> String {
    "deepseek/deepseek-chat-v3-0324:free".to_string()
}

fn default_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_timeout() -> u64 {
    60
}

fn default_turn_timeout() -> u64 {
    180
}

fn default_retries() -> u32 {
    3
}

fn default_tool_rounds() -> u32 {
    5
}

fn default_http_referer() -> String {
    "http://localhost:8501".to_string()
}

fn default_app_title() -> String {
    "Agentic Legal AI".to_string()
}

fn default_search_base_url() -> String {
    "https://api.duckduckgo.com".to_string()
}

fn default_search_timeout() -> u64 {
    15
}

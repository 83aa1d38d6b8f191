//! Drafting Agent Adapters.
//!
//! Implementations of the DraftingAgent port.
//!
//! ## Available Adapters
//!
//! - `MockDraftingAgent` - Scripted agent for tests
//! - `OpenRouterAgent` - OpenRouter chat completions with the legal research tool
//! - `LegalResearchTool` - The `Legal_Web_Search` tool offered to the model

mod legal_research;
mod mock_agent;
mod openrouter_agent;

pub use legal_research::{scoped_query, LegalResearchTool, SEARCH_ERROR_PREFIX, SITE_SCOPE};
pub use mock_agent::{MockDraftingAgent, MockTurn, DEFAULT_MOCK_OUTPUT};
pub use openrouter_agent::{
    OpenRouterAgent, OpenRouterConfig, CREDENTIAL_NAME, DEFAULT_BASE_URL, DEFAULT_MODEL,
};

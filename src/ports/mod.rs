//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `DraftingAgent` - the external LLM agent that drafts and refines documents
//! - `SessionStore` - keeps chat sessions, one lock per session
//! - `WebSearch` - the search engine behind the legal research tool

mod drafting_agent;
mod session_store;
mod web_search;

pub use drafting_agent::{AgentError, AgentInfo, AgentRequest, AgentResponse, DraftingAgent};
pub use session_store::{SessionHandle, SessionStore, StoreError};
pub use web_search::{SearchError, WebSearch};

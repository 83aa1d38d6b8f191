//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Drafting agents (OpenRouter, mock) and the legal research tool
//! - `http` - REST API
//! - `search` - Web search backends
//! - `storage` - Session stores

pub mod ai;
pub mod http;
pub mod search;
pub mod storage;

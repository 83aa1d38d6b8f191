//! Drafting HTTP adapter - REST API for chat sessions and stateless drafting.
//!
//! Provides endpoints for:
//! - Creating, listing, reading and deleting sessions
//! - Submitting turns, editing drafts and exporting documents
//! - Stateless generate, refine, extract and format calls

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{status_for, DraftingHandlers};
pub use routes::{ai_routes, api_router, session_routes};

//! Legal Drafter - Conversational legal document drafting
//!
//! A chat session gathers the facts of a document from the user, hands them
//! to an LLM agent with a legal research tool, and switches to review once the
//! agent delivers a complete draft. Later turns refine the draft in place.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine)
//! - `drafting` - Chat sessions, messages and the drafting/review lifecycle
//! - `document` - Pure text utilities: normalization, formatting, detail extraction

pub mod document;
pub mod drafting;
pub mod foundation;

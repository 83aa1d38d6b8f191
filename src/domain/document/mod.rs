//! Document module - Pure text utilities for drafted documents.
//!
//! - `normalizer` - whitespace and punctuation cleanup of raw agent output
//! - `formatter` - numbered, indented export layout
//! - `details` - pattern-based extraction of parties, dates, term and jurisdiction
//!
//! None of these functions fail; they are safe to call on any input.

pub mod details;
pub mod formatter;
pub mod normalizer;

pub use details::{extract, extract_from_turns, DetailField, ExtractedDetails, NOT_FOUND};
pub use formatter::format;
pub use normalizer::normalize;

//! Text normalization for drafted documents.
//!
//! Flattens raw agent output into a single line of cleanly spaced prose.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static SPACE_BEFORE_PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s([.,;:])").unwrap());

static BLANK_LINE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n+").unwrap());

/// Normalizes raw drafted text.
///
/// # Steps
/// 1. Strip leading/trailing whitespace
/// 2. Collapse every whitespace run (newlines included) to a single space
/// 3. Drop the whitespace character in front of `.`, `,`, `;` and `:`
/// 4. Collapse blank-line runs to a single blank line
/// 5. Strip again
///
/// Step 4 never matches once step 2 has run; the result is always a single
/// line. The function is total and idempotent.
pub fn normalize(raw: &str) -> String {
    let text = raw.trim();
    let text = WHITESPACE_RUN.replace_all(text, " ");
    let text = SPACE_BEFORE_PUNCTUATION.replace_all(&text, "$1");
    let text = BLANK_LINE_RUN.replace_all(&text, "\n\n");
    text.trim().to_string()
}

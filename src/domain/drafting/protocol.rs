//! Completion protocol between the session and the drafting agent.
//!
//! The agent signals a finished document by emitting [`COMPLETION_MARKER`]
//! anywhere in its output. Everything after the first occurrence is the draft.

/// Marker the agent emits in front of a finished document.
pub const COMPLETION_MARKER: &str = "DRAFT_COMPLETE:";

/// Assistant message recorded when the first draft is delivered.
pub const DRAFT_READY_ACK: &str =
    "I have prepared the initial draft. Please review it in the editor and suggest any changes.";

/// Assistant message recorded after each refinement.
pub const DRAFT_UPDATED_ACK: &str =
    "I have updated the document based on your feedback. Please review the changes.";

/// Returns the text following the first completion marker, if present.
///
/// The marker may appear anywhere in the output. The returned slice is not
/// trimmed or normalized.
pub fn detect_completion(output: &str) -> Option<&str> {
    output
        .find(COMPLETION_MARKER)
        .map(|at| &output[at + COMPLETION_MARKER.len()..])
}

/// Renders a completed draft in the wire form used by stateless generation.
pub fn completion_wire_form(draft: &str) -> String {
    format!("{} {}", COMPLETION_MARKER, draft)
}

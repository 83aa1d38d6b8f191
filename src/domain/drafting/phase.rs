//! Drafting session phases.
//!
//! A session gathers information until the agent delivers a complete draft,
//! then stays in review for as many refinement rounds as the user wants.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of a drafting session.
///
/// - `Drafting` → `Reviewing` when the completion marker is first observed
/// - `Reviewing` → `Reviewing` on every refinement or manual edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DraftingPhase {
    /// Gathering requirements; no draft exists yet.
    #[default]
    Drafting,

    /// A draft exists and user feedback is applied to it.
    Reviewing,
}

impl DraftingPhase {
    /// Returns true if the session holds a draft in this phase.
    pub fn has_draft(&self) -> bool {
        matches!(self, Self::Reviewing)
    }

    /// Name of the operation a user turn performs in this phase.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Drafting => "generating",
            Self::Reviewing => "refining",
        }
    }
}

impl fmt::Display for DraftingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Drafting => "drafting",
            Self::Reviewing => "reviewing",
        };
        write!(f, "{}", s)
    }
}

impl StateMachine for DraftingPhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        matches!(
            (self, target),
            (Self::Drafting, Self::Reviewing) | (Self::Reviewing, Self::Reviewing)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            Self::Drafting => vec![Self::Reviewing],
            Self::Reviewing => vec![Self::Reviewing],
        }
    }
}

//! Application-level errors for drafting operations.

use std::fmt;
use thiserror::Error;

use crate::domain::foundation::{ChatSessionId, DomainError, ErrorCode};
use crate::ports::{AgentError, StoreError};

/// The user-facing operation an error occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Generating,
    Refining,
    Extracting,
    Editing,
    Verifying,
    Exporting,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operation::Generating => "generating legal document",
            Operation::Refining => "refining legal document",
            Operation::Extracting => "extracting legal details",
            Operation::Editing => "editing draft",
            Operation::Verifying => "verifying document details",
            Operation::Exporting => "exporting document",
        };
        write!(f, "{}", s)
    }
}

/// Errors returned by drafting operations.
///
/// Every variant that belongs to an operation renders as
/// `"Error {operation}: {cause}"`.
#[derive(Debug, Clone, Error)]
pub enum DraftingError {
    /// The agent has no credential configured. Raised before any call.
    #[error("Error {operation}: missing credential {credential}")]
    MissingCredential {
        operation: Operation,
        credential: String,
    },

    /// The agent call failed, timed out or returned an unusable response.
    #[error("Error {operation}: {source}")]
    AgentInvocation {
        operation: Operation,
        #[source]
        source: AgentError,
    },

    /// Required input was missing or empty.
    #[error("Error {operation}: {message}")]
    Validation {
        operation: Operation,
        message: String,
    },

    /// The session is in the wrong phase for the operation.
    #[error("Error {operation}: {message}")]
    InvalidState {
        operation: Operation,
        message: String,
    },

    #[error("Session not found: {0}")]
    SessionNotFound(ChatSessionId),

    #[error("Storage error: {0}")]
    Store(String),
}

impl DraftingError {
    pub fn validation(operation: Operation, message: impl Into<String>) -> Self {
        Self::Validation {
            operation,
            message: message.into(),
        }
    }

    /// Wraps an agent failure, lifting missing credentials into their own variant.
    pub fn from_agent(operation: Operation, source: AgentError) -> Self {
        match source {
            AgentError::MissingCredential(credential) => Self::MissingCredential {
                operation,
                credential,
            },
            source => Self::AgentInvocation { operation, source },
        }
    }

    /// Wraps a rejected domain mutation.
    pub fn from_domain(operation: Operation, err: DomainError) -> Self {
        match err.code() {
            ErrorCode::InvalidStateTransition => Self::InvalidState {
                operation,
                message: err.message,
            },
            ErrorCode::ValidationFailed => Self::Validation {
                operation,
                message: err.message,
            },
            _ => Self::Store(err.to_string()),
        }
    }

    /// Returns the domain error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MissingCredential { .. } => ErrorCode::MissingCredential,
            Self::AgentInvocation { .. } => ErrorCode::AgentInvocationFailed,
            Self::Validation { .. } => ErrorCode::ValidationFailed,
            Self::InvalidState { .. } => ErrorCode::InvalidStateTransition,
            Self::SessionNotFound(_) => ErrorCode::SessionNotFound,
            Self::Store(_) => ErrorCode::StorageError,
        }
    }

    /// Returns the operation this error belongs to, if any.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Self::MissingCredential { operation, .. }
            | Self::AgentInvocation { operation, .. }
            | Self::Validation { operation, .. }
            | Self::InvalidState { operation, .. } => Some(*operation),
            Self::SessionNotFound(_) | Self::Store(_) => None,
        }
    }
}

impl From<StoreError> for DraftingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => DraftingError::SessionNotFound(id),
            other => DraftingError::Store(other.to_string()),
        }
    }
}

impl From<DraftingError> for DomainError {
    fn from(err: DraftingError) -> Self {
        let code = err.code();
        let operation = err.operation();
        let domain = DomainError::new(code, err.to_string());
        match operation {
            Some(op) => domain.with_detail("operation", op.to_string()),
            None => domain,
        }
    }
}

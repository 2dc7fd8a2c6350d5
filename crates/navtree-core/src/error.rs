//! Error types for navigation model operations.

use thiserror::Error;

use crate::key::NodeKey;

/// Boxed error returned by collaborator capabilities.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used throughout the navigation model.
pub type NavResult<T> = Result<T, NavError>;

/// Errors that can occur while building, walking or mutating a tree.
#[derive(Debug, Error)]
pub enum NavError {
    /// A required argument was missing or blank.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The model was not in a state that allows the operation.
    #[error("Illegal state: {message}")]
    IllegalState { message: String },

    /// The key is not registered in the tree.
    #[error("Node is not attached to the tree: {key}")]
    UnknownNode { key: NodeKey },

    /// A container operation was applied to a leaf.
    #[error("Node is not a container: {key}")]
    NotAContainer { key: NodeKey },

    /// The child is not in the container's child list.
    #[error("Node {child} is not a child of {container}")]
    ChildNotFound { container: NodeKey, child: NodeKey },

    /// The wildcard filter does not compile.
    #[error("Invalid filter '{pattern}': {source}")]
    InvalidFilter {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The node is frozen by the edit lock.
    #[error("Node {key} is disabled while {editing} is being edited")]
    NodeDisabled { key: NodeKey, editing: NodeKey },

    /// Another node already holds the edit lock.
    #[error("Cannot edit {requested}: {editing} is already being edited")]
    EditInProgress { requested: NodeKey, editing: NodeKey },

    /// The bounded randomized naming phase ran out of attempts.
    #[error("No free name for '{base}' after {attempts} attempts")]
    NamesExhausted { base: String, attempts: u64 },

    /// A children loader or name-exists predicate failed.
    #[error(transparent)]
    Collaborator(BoxError),
}

impl NavError {
    /// Create an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an illegal-state error.
    pub fn illegal_state(message: impl Into<String>) -> Self {
        Self::IllegalState {
            message: message.into(),
        }
    }

    /// Wrap a collaborator failure without altering it.
    pub fn collaborator(source: impl Into<BoxError>) -> Self {
        Self::Collaborator(source.into())
    }

    /// Whether this error signals a caller bug rather than an external failure.
    ///
    /// Hosts translate contract violations into a generic internal-error surface.
    pub fn is_contract_violation(&self) -> bool {
        !matches!(self, Self::Collaborator(_) | Self::NamesExhausted { .. })
    }
}

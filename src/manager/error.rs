//! Errors raised while dispatching ticks and running transitions.

use crate::core::{RequestError, StateError};
use thiserror::Error;

/// A target state's entry work did not complete.
#[derive(Debug, Error)]
pub enum EntryFailure {
    #[error("on_init for state '{state}' failed: {source}")]
    Init {
        state: String,
        #[source]
        source: StateError,
    },

    #[error("on_enter for state '{state}' failed: {source}")]
    Enter {
        state: String,
        #[source]
        source: StateError,
    },

    #[error("Entry of state '{state}' panicked: {message}")]
    Panicked { state: String, message: String },
}

impl EntryFailure {
    /// Name of the state whose entry failed.
    pub fn state(&self) -> &str {
        match self {
            Self::Init { state, .. } | Self::Enter { state, .. } | Self::Panicked { state, .. } => {
                state
            }
        }
    }
}

/// Errors surfaced to the host loop by [`StateManager`](crate::StateManager).
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("No state named '{name}' is registered")]
    UnknownState { name: String },

    #[error(transparent)]
    InvalidRequest(#[from] RequestError),

    #[error("Transition to '{requested}' rejected: transition to '{pending}' is still entering")]
    TransitionInFlight { pending: String, requested: String },

    #[error(transparent)]
    EntryFailed(#[from] EntryFailure),

    #[error("Failed to spawn entry worker for state '{target}': {source}")]
    Spawn {
        target: String,
        #[source]
        source: std::io::Error,
    },

    #[error("State '{name}' is not available on the render thread")]
    StateUnavailable { name: String },
}

//! Errors raised while building a state manager.

use crate::manager::EntryFailure;
use thiserror::Error;

/// A single problem with the registered states.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RegistryIssue {
    #[error("No states registered. Add at least one state")]
    NoStates,

    #[error("The empty string is not a valid state name")]
    EmptyName,

    #[error("State '{0}' is registered more than once")]
    DuplicateName(String),

    #[error("Start state '{0}' is not registered")]
    UnknownStart(String),

    #[error("Start state not specified. Call .start(name) when registering several states")]
    MissingStart,
}

/// Errors that can occur when building a state manager.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(
        "Invalid state registry: {}",
        .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
    )]
    InvalidRegistry(Vec<RegistryIssue>),

    #[error("Loading state not specified. Call .loading_state(state) or .spinner()")]
    MissingLoadingState,

    #[error("Start state failed to enter: {0}")]
    StartFailed(#[source] EntryFailure),

    #[error("Preloading failed: {0}")]
    PreloadFailed(#[source] EntryFailure),
}

impl BuildError {
    /// Registry problems, if this is an `InvalidRegistry` error.
    pub fn issues(&self) -> &[RegistryIssue] {
        match self {
            Self::InvalidRegistry(issues) => issues,
            _ => &[],
        }
    }
}

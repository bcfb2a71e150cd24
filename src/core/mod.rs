//! Core state types.
//!
//! This module contains the values the manager moves around:
//! - The `State` trait every application state implements
//! - `TransitionRequest`, the value a state returns to leave
//! - Transition history records

mod history;
mod request;
mod state;

pub use history::{TransitionHistory, TransitionOutcome, TransitionRecord};
pub use request::{RequestError, TransitionRequest};
pub use state::{Payload, State, StateError};

//! Builder API for state manager construction.
//!
//! This module provides a fluent builder and a macro for registering states,
//! validating the registry up front, and entering the start state.

pub mod error;
pub mod machine;
pub mod macros;

pub use error::{BuildError, RegistryIssue};
pub use machine::StateManagerBuilder;

//! Per-tick dispatch and the background loading protocol.
//!
//! # Key Concepts
//!
//! - **Visible state**: the one state whose `update`/`draw` run this tick
//! - **Pending transition**: at most one, created when a request is accepted
//! - **Entry worker**: a thread running the target's `on_enter`, polled once
//!   per tick and never waited on

mod machine;
mod error;
mod worker;

pub(crate) use machine::Slot;
pub use error::{EntryFailure, ManagerError};
pub use machine::{RequestOutcome, StateManager};

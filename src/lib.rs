//! Tickstate: a state manager for fixed-tick update/draw loops
//!
//! Tickstate dispatches each frame's events and elapsed time to exactly one
//! active state, and hides slow state entry (asset loading, handshakes,
//! world generation) behind a loading indicator so the render loop never
//! stalls.
//!
//! # Core Concepts
//!
//! - **State**: a mode of the application with `on_enter`, `update`, `draw`
//!   and `on_exit` hooks
//! - **TransitionRequest**: returned from `update` to leave the current state
//! - **LoadingState**: drawn while the next state's `on_enter` runs on a
//!   worker thread
//! - **StateManager**: owns the states and drives them from the host loop
//!
//! # Example
//!
//! ```rust
//! use tickstate::{IndicatorCanvas, Payload, State, StateError, StateManager, TransitionRequest};
//!
//! #[derive(Default)]
//! struct Frame(Vec<String>);
//!
//! impl IndicatorCanvas for Frame {
//!     fn center(&self) -> (f32, f32) {
//!         (320.0, 240.0)
//!     }
//!
//!     fn draw_label(&mut self, text: &str, _at: (f32, f32)) {
//!         self.0.push(text.to_string());
//!     }
//!
//!     fn draw_arc(&mut self, _center: (f32, f32), _radius: f32, _start: f32, _end: f32) {}
//! }
//!
//! struct Play;
//!
//! impl State<char, Frame> for Play {
//!     fn on_enter(&mut self, _from: Option<&str>, _payload: Option<Payload>) -> Result<(), StateError> {
//!         Ok(())
//!     }
//!
//!     fn update(&mut self, events: &[char], _dt: f32) -> Option<TransitionRequest> {
//!         events.contains(&'p').then(|| TransitionRequest::new("pause"))
//!     }
//!
//!     fn draw(&self, frame: &mut Frame) {
//!         frame.0.push("play".to_string());
//!     }
//! }
//!
//! struct Pause;
//!
//! impl State<char, Frame> for Pause {
//!     fn on_enter(&mut self, from: Option<&str>, _payload: Option<Payload>) -> Result<(), StateError> {
//!         assert_eq!(from, Some("play"));
//!         Ok(())
//!     }
//!
//!     fn update(&mut self, _events: &[char], _dt: f32) -> Option<TransitionRequest> {
//!         None
//!     }
//!
//!     fn draw(&self, frame: &mut Frame) {
//!         frame.0.push("pause".to_string());
//!     }
//! }
//!
//! let states: Vec<(&str, Box<dyn State<char, Frame>>)> =
//!     vec![("play", Box::new(Play)), ("pause", Box::new(Pause))];
//! let mut manager = StateManager::new(states, "play").unwrap();
//!
//! let mut frame = Frame::default();
//! manager.tick(&['p'], 0.016, &mut frame).unwrap();
//! assert_eq!(frame.0, vec!["play".to_string()]);
//! assert_eq!(manager.pending_target(), Some("pause"));
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod loading;
pub mod manager;

// Re-export commonly used types
pub use builder::{BuildError, RegistryIssue, StateManagerBuilder};
pub use config::{ConcurrentRequestPolicy, ConfigError, EntryFailurePolicy, ManagerConfig};
pub use crate::core::{
    Payload, RequestError, State, StateError, TransitionHistory, TransitionOutcome,
    TransitionRecord, TransitionRequest,
};
pub use loading::{IndicatorCanvas, LoadingState, Spinner};
pub use manager::{EntryFailure, ManagerError, RequestOutcome, StateManager};

//! The State trait implemented by every application state.
//!
//! A state is one mode of application behavior (a menu, a level, a pause
//! screen). The manager drives it through a fixed set of lifecycle hooks.

use super::request::TransitionRequest;
use std::any::Any;
use std::fmt;

/// Error type returned by `on_init` and `on_enter`.
pub type StateError = Box<dyn std::error::Error + Send + Sync>;

/// Opaque value handed from a [`TransitionRequest`] to the target's `on_enter`.
///
/// The manager passes it through untouched.
pub struct Payload(Box<dyn Any + Send>);

impl Payload {
    pub fn new<T: Any + Send>(value: T) -> Self {
        Payload(Box::new(value))
    }

    /// Recover the concrete value, handing the payload back on a type mismatch.
    pub fn downcast<T: Any + Send>(self) -> Result<T, Payload> {
        match self.0.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(original) => Err(Payload(original)),
        }
    }

    pub fn downcast_ref<T: Any + Send>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    pub fn is<T: Any + Send>(&self) -> bool {
        self.0.is::<T>()
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Payload(..)")
    }
}

/// Trait for application states driven by a [`StateManager`](crate::StateManager).
///
/// `E` is the host's event record type and `C` the drawing target. Both are
/// opaque to the manager.
///
/// # Threading
///
/// `on_init` and `on_enter` run on a worker thread while the previously
/// active state keeps receiving `update`/`draw` on the render thread. The
/// state value itself is moved to the worker for the duration, so a state
/// never sees two threads at once. Anything shared *between* states still
/// needs its own synchronization.
///
/// `update`, `draw` and `on_exit` always run on the render thread and must
/// not block.
///
/// # Example
///
/// ```rust
/// use tickstate::{State, StateError, Payload, TransitionRequest};
///
/// struct Title {
///     elapsed: f32,
/// }
///
/// impl State<char, String> for Title {
///     fn on_enter(&mut self, _from: Option<&str>, _payload: Option<Payload>) -> Result<(), StateError> {
///         self.elapsed = 0.0;
///         Ok(())
///     }
///
///     fn update(&mut self, events: &[char], dt: f32) -> Option<TransitionRequest> {
///         self.elapsed += dt;
///         events
///             .contains(&'\n')
///             .then(|| TransitionRequest::new("play"))
///     }
///
///     fn draw(&self, canvas: &mut String) {
///         canvas.push_str("PRESS ENTER");
///     }
/// }
/// ```
pub trait State<E, C>: Send {
    /// One-time setup, run before the first `on_enter` on the same thread.
    ///
    /// Default implementation does nothing.
    fn on_init(&mut self) -> Result<(), StateError> {
        Ok(())
    }

    /// Called off the render thread each time this state is about to become
    /// active.
    ///
    /// `from` is the name of the state being left, or `None` for the start
    /// state. `payload` is whatever the requesting state attached.
    fn on_enter(&mut self, from: Option<&str>, payload: Option<Payload>)
        -> Result<(), StateError>;

    /// Per-tick logic. Returning a request asks the manager to leave this
    /// state.
    fn update(&mut self, events: &[E], dt: f32) -> Option<TransitionRequest>;

    /// Render this state. Always called after `update` within a tick.
    fn draw(&self, canvas: &mut C);

    /// Called on the render thread when this state stops being active,
    /// before `to` is swapped in.
    ///
    /// Default implementation does nothing.
    fn on_exit(&mut self, _to: &str) {}
}

//! Loading states shown while a target state enters in the background.
//!
//! A loading state is not an application state: it has no `on_enter` and
//! its `update` returns nothing, so it can never request a transition. The
//! manager alone decides when it retires.

mod spinner;

pub use spinner::Spinner;

/// Placeholder drawn while a transition's entry work runs.
///
/// The manager keeps one instance for its whole lifetime, so animation
/// state carries over between transitions.
pub trait LoadingState<E, C>: Send {
    /// Called on the render thread on the first tick this transition is shown.
    fn on_begin(&mut self, _target: &str) {}

    /// Per-tick logic while `target` is entering.
    fn update(&mut self, events: &[E], dt: f32, target: &str);

    fn draw(&self, canvas: &mut C);

    /// Called on the render thread once the transition to `target` has
    /// finished, whether or not it succeeded.
    fn on_finish(&mut self, _target: &str) {}
}

/// Drawing primitives the default [`Spinner`] needs.
///
/// Hosts using a custom loading state never need to implement this.
pub trait IndicatorCanvas {
    /// Center of the drawable area.
    fn center(&self) -> (f32, f32);

    /// Draw `text` centered on `at`.
    fn draw_label(&mut self, text: &str, at: (f32, f32));

    /// Draw a circular arc. Angles are in degrees, counterclockwise from
    /// the positive x axis.
    fn draw_arc(&mut self, center: (f32, f32), radius: f32, start_deg: f32, end_deg: f32);
}

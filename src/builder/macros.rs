//! Macros for ergonomic registry construction.

/// Create a [`StateManagerBuilder`](crate::builder::StateManagerBuilder)
/// with the listed states registered.
///
/// # Example
///
/// ```
/// use tickstate::{state_registry, LoadingState, Payload, State, StateError, StateManager, TransitionRequest};
///
/// struct Screen;
///
/// impl State<(), ()> for Screen {
///     fn on_enter(&mut self, _from: Option<&str>, _payload: Option<Payload>) -> Result<(), StateError> {
///         Ok(())
///     }
///
///     fn update(&mut self, _events: &[()], _dt: f32) -> Option<TransitionRequest> {
///         None
///     }
///
///     fn draw(&self, _canvas: &mut ()) {}
/// }
///
/// struct Blank;
///
/// impl LoadingState<(), ()> for Blank {
///     fn update(&mut self, _events: &[()], _dt: f32, _target: &str) {}
///
///     fn draw(&self, _canvas: &mut ()) {}
/// }
///
/// let manager: StateManager<(), ()> = state_registry! {
///     "menu" => Screen,
///     "game" => Screen,
/// }
/// .start("menu")
/// .loading_state(Blank)
/// .build()
/// .unwrap();
///
/// assert_eq!(manager.current_state_name(), "menu");
/// ```
#[macro_export]
macro_rules! state_registry {
    ($($name:expr => $state:expr),* $(,)?) => {
        $crate::builder::StateManagerBuilder::new()
            $(.state($name, $state))*
    };
}

//! The default loading indicator.

use super::{IndicatorCanvas, LoadingState};

const MAX_SWEEP: f32 = 320.0;
const MIN_SWEEP: f32 = 10.0;
const SWEEP_SPEED: f32 = 100.0;
const RADIUS: f32 = 50.0;
const VERTICAL_OFFSET: f32 = 100.0;

/// A "Loading..." label with a shrinking arc.
///
/// The arc sweep shrinks by 100 degrees per second and wraps back to its
/// maximum once it falls to 10 degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct Spinner {
    label: String,
    sweep: f32,
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new("Loading...")
    }
}

impl Spinner {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            sweep: MAX_SWEEP,
        }
    }

    /// Current arc sweep in degrees.
    pub fn sweep(&self) -> f32 {
        self.sweep
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    fn advance(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        self.sweep -= dt * SWEEP_SPEED;
        if self.sweep <= MIN_SWEEP {
            self.sweep = MAX_SWEEP;
        }
    }
}

impl<E, C: IndicatorCanvas> LoadingState<E, C> for Spinner {
    fn update(&mut self, _events: &[E], dt: f32, _target: &str) {
        self.advance(dt);
    }

    fn draw(&self, canvas: &mut C) {
        let (cx, cy) = canvas.center();
        let anchor = (cx, cy - VERTICAL_OFFSET);
        canvas.draw_label(&self.label, anchor);
        canvas.draw_arc(anchor, RADIUS, 0.0, self.sweep);
    }
}

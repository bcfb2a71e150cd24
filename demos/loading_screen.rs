//! Loading Screen
//!
//! This demo drives a menu and a level from a headless 60 Hz loop. The
//! level takes a while to "load", so the spinner is drawn until it is ready.
//!
//! Key concepts:
//! - States return a `TransitionRequest` from `update`
//! - Slow `on_enter` runs off the loop thread
//! - The host owns the canvas and hands it to `tick`
//!
//! Run with: cargo run --example loading_screen

use std::thread;
use std::time::{Duration, Instant};
use tickstate::{
    state_registry, IndicatorCanvas, ManagerConfig, Payload, State, StateError, TransitionRequest,
};

const FRAME: Duration = Duration::from_micros(16_667);

/// Collects one line per draw call.
struct TextCanvas {
    lines: Vec<String>,
}

impl IndicatorCanvas for TextCanvas {
    fn center(&self) -> (f32, f32) {
        (320.0, 240.0)
    }

    fn draw_label(&mut self, text: &str, at: (f32, f32)) {
        self.lines.push(format!("label {text:?} at {at:?}"));
    }

    fn draw_arc(&mut self, center: (f32, f32), radius: f32, start_deg: f32, end_deg: f32) {
        self.lines.push(format!(
            "arc r={radius} {start_deg:.0}..{end_deg:.0} around {center:?}"
        ));
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Key {
    Enter,
    Escape,
}

struct Menu {
    waited: f32,
}

impl State<Key, TextCanvas> for Menu {
    fn on_enter(&mut self, from: Option<&str>, _payload: Option<Payload>) -> Result<(), StateError> {
        println!("menu entered from {from:?}");
        self.waited = 0.0;
        Ok(())
    }

    fn update(&mut self, events: &[Key], dt: f32) -> Option<TransitionRequest> {
        self.waited += dt;
        events
            .contains(&Key::Enter)
            .then(|| TransitionRequest::new("level").with_payload(3u32))
    }

    fn draw(&self, canvas: &mut TextCanvas) {
        canvas.lines.push(format!("menu ({:.1}s)", self.waited));
    }

    fn on_exit(&mut self, to: &str) {
        println!("menu left for {to}");
    }
}

struct Level {
    number: u32,
    tiles: Vec<u8>,
}

impl State<Key, TextCanvas> for Level {
    fn on_init(&mut self) -> Result<(), StateError> {
        println!("level initialised");
        Ok(())
    }

    fn on_enter(&mut self, _from: Option<&str>, payload: Option<Payload>) -> Result<(), StateError> {
        self.number = payload
            .and_then(|p| p.downcast::<u32>().ok())
            .ok_or("level number missing")?;
        // Pretend to stream assets from disk.
        thread::sleep(Duration::from_millis(400));
        self.tiles = vec![0; 64 * 64];
        Ok(())
    }

    fn update(&mut self, events: &[Key], _dt: f32) -> Option<TransitionRequest> {
        events
            .contains(&Key::Escape)
            .then(|| TransitionRequest::new("menu"))
    }

    fn draw(&self, canvas: &mut TextCanvas) {
        canvas
            .lines
            .push(format!("level {} ({} tiles)", self.number, self.tiles.len()));
    }
}

/// Scripted input: Enter on frame 30, Escape on frame 90.
fn input(frame: u32) -> Vec<Key> {
    match frame {
        30 => vec![Key::Enter],
        90 => vec![Key::Escape],
        _ => Vec::new(),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("=== Loading Screen Demo ===\n");

    let mut manager = state_registry! {
        "menu" => Menu { waited: 0.0 },
        "level" => Level { number: 0, tiles: Vec::new() },
    }
    .start("menu")
    .spinner()
    .config(ManagerConfig {
        slow_entry_warning_ms: Some(250),
        ..ManagerConfig::default()
    })
    .build()?;

    let mut last = Instant::now();
    for frame in 0..120 {
        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f32();
        last = now;

        let mut canvas = TextCanvas { lines: Vec::new() };
        manager.tick(&input(frame), dt, &mut canvas)?;

        if frame % 10 == 0 || (manager.is_loading() && frame % 5 == 0) {
            println!(
                "[{frame:3}] {:<6} {}",
                manager.current_state_name(),
                canvas.lines.join(" | ")
            );
        }

        thread::sleep(FRAME.saturating_sub(now.elapsed()));
    }

    println!("\nVisited: {}", manager.history().path().join(" -> "));
    println!("\n=== Demo Complete ===");
    Ok(())
}

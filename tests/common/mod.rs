//! Shared states and helpers for integration tests.

#![allow(dead_code)]

use parking_lot::Mutex;
use std::io;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tickstate::{
    LoadingState, ManagerError, Payload, State, StateError, StateManager, TransitionRequest,
};

pub type Log = Arc<Mutex<Vec<String>>>;
pub type Frame = Vec<String>;

/// A test drops a request in here; the owning state returns it from its
/// next update.
pub type Mailbox = Arc<Mutex<Option<TransitionRequest>>>;

pub enum Entry {
    Succeed,
    Fail,
    /// Succeed the first time, fail every later entry
    FailReentry,
    Panic,
}

/// A state that records every hook call in a shared log.
pub struct Scripted {
    name: &'static str,
    log: Log,
    mailbox: Mailbox,
    entry: Entry,
    entered: u32,
    gate: Option<mpsc::Receiver<()>>,
}

impl Scripted {
    pub fn new(name: &'static str, log: &Log) -> Self {
        Self {
            name,
            log: Arc::clone(log),
            mailbox: Mailbox::default(),
            entry: Entry::Succeed,
            entered: 0,
            gate: None,
        }
    }

    pub fn mailbox(&self) -> Mailbox {
        Arc::clone(&self.mailbox)
    }

    pub fn entry(mut self, entry: Entry) -> Self {
        self.entry = entry;
        self
    }

    /// Block every `on_enter` until the returned sender sends once.
    pub fn gated(mut self) -> (Self, mpsc::Sender<()>) {
        let (release, gate) = mpsc::channel();
        self.gate = Some(gate);
        (self, release)
    }

    fn push(&self, line: String) {
        self.log.lock().push(line);
    }
}

impl State<u32, Frame> for Scripted {
    fn on_init(&mut self) -> Result<(), StateError> {
        self.push(format!("{}:init", self.name));
        Ok(())
    }

    fn on_enter(&mut self, from: Option<&str>, payload: Option<Payload>) -> Result<(), StateError> {
        if let Some(gate) = &self.gate {
            gate.recv().map_err(|e| -> StateError { Box::new(e) })?;
        }
        let payload = payload
            .and_then(|p| p.downcast::<u32>().ok())
            .map(|v| format!(":{v}"))
            .unwrap_or_default();
        self.push(format!(
            "{}:enter:{}{}",
            self.name,
            from.unwrap_or("none"),
            payload
        ));
        self.entered += 1;
        match self.entry {
            Entry::Succeed => Ok(()),
            Entry::FailReentry if self.entered == 1 => Ok(()),
            Entry::Fail | Entry::FailReentry => {
                Err(format!("{} could not load", self.name).into())
            }
            Entry::Panic => panic!("{} exploded", self.name),
        }
    }

    fn update(&mut self, events: &[u32], _dt: f32) -> Option<TransitionRequest> {
        self.push(format!("{}:update:{}", self.name, events.len()));
        self.mailbox.lock().take()
    }

    fn draw(&self, canvas: &mut Frame) {
        self.push(format!("{}:draw", self.name));
        canvas.push(self.name.to_string());
    }

    fn on_exit(&mut self, to: &str) {
        self.push(format!("{}:exit:{}", self.name, to));
    }
}

/// Loading state that records begin/finish and draws "loading".
pub struct Marker {
    log: Log,
    elapsed: f32,
}

impl Marker {
    pub fn new(log: &Log) -> Self {
        Self {
            log: Arc::clone(log),
            elapsed: 0.0,
        }
    }
}

impl LoadingState<u32, Frame> for Marker {
    fn on_begin(&mut self, target: &str) {
        self.log.lock().push(format!("loading:begin:{target}"));
    }

    fn update(&mut self, _events: &[u32], dt: f32, _target: &str) {
        self.elapsed += dt;
    }

    fn draw(&self, canvas: &mut Frame) {
        canvas.push("loading".to_string());
    }

    fn on_finish(&mut self, target: &str) {
        self.log.lock().push(format!("loading:finish:{target}"));
    }
}

/// In-memory sink for formatted `tracing` output.
#[derive(Clone, Default)]
pub struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    /// A warn-level fmt subscriber writing into this buffer.
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync {
        let sink = self.clone();
        tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .with_writer(move || sink.clone())
            .finish()
    }

    /// Number of times `needle` appears in the captured output.
    pub fn count(&self, needle: &str) -> usize {
        String::from_utf8_lossy(&self.0.lock()).matches(needle).count()
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run one tick and return what was drawn.
pub fn frame(manager: &mut StateManager<u32, Frame>) -> (Result<(), ManagerError>, Frame) {
    let mut canvas = Frame::new();
    let result = manager.tick(&[1, 2], 0.016, &mut canvas);
    (result, canvas)
}

/// Tick until no transition is pending, returning every tick's result and
/// frame. The last entry is the tick that observed completion. Panics if
/// the transition never settles.
pub fn tick_until_settled(
    manager: &mut StateManager<u32, Frame>,
) -> Vec<(Result<(), ManagerError>, Frame)> {
    let mut ticks = Vec::new();
    for _ in 0..5000 {
        ticks.push(frame(manager));
        if manager.pending_target().is_none() {
            return ticks;
        }
        thread::sleep(Duration::from_millis(1));
    }
    panic!("transition never settled");
}

pub fn count(log: &Log, line: &str) -> usize {
    log.lock().iter().filter(|l| l.as_str() == line).count()
}

pub fn position(log: &Log, line: &str) -> Option<usize> {
    log.lock().iter().position(|l| l.as_str() == line)
}

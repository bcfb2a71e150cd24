//! The state manager: per-tick dispatch and the loading protocol.

use super::error::{EntryFailure, ManagerError};
use super::worker::{EntryJob, EntryReport, EntryWorker};
use crate::builder::{BuildError, StateManagerBuilder};
use crate::config::{ConcurrentRequestPolicy, EntryFailurePolicy, ManagerConfig};
use crate::core::{
    Payload, State, TransitionHistory, TransitionOutcome, TransitionRecord, TransitionRequest,
};
use crate::loading::{IndicatorCanvas, LoadingState, Spinner};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Result of handing a request to the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The transition is now pending
    Accepted,
    /// Another transition was pending; this one was dropped
    Ignored,
}

/// Which state receives `draw` for the current tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visible {
    Active,
    Loading,
}

/// A registered state. `state` is `None` while the state is on a worker.
pub(crate) struct Slot<E, C> {
    pub state: Option<Box<dyn State<E, C>>>,
    pub initialized: bool,
}

enum Stage<E, C> {
    /// Accepted this tick; the worker starts at the next tick boundary
    Queued(Option<Payload>),
    Running(EntryWorker<E, C>),
}

struct PendingTransition<E, C> {
    from: String,
    target: String,
    accepted_at: DateTime<Utc>,
    stage: Stage<E, C>,
    warned_slow: bool,
}

/// Owns the registered states and drives them from the host's tick loop.
///
/// Exactly one state is visible per tick. While a transition's entry work
/// runs on a worker thread the loading state is visible instead, and the
/// swap to the new state happens at the start of a later tick, never in the
/// middle of one.
///
/// # Example
///
/// ```rust
/// use tickstate::{LoadingState, Payload, State, StateError, StateManager, TransitionRequest};
///
/// struct Screen(&'static str, Option<&'static str>);
///
/// impl State<(), Vec<String>> for Screen {
///     fn on_enter(&mut self, _from: Option<&str>, _payload: Option<Payload>) -> Result<(), StateError> {
///         Ok(())
///     }
///
///     fn update(&mut self, _events: &[()], _dt: f32) -> Option<TransitionRequest> {
///         self.1.take().map(TransitionRequest::new)
///     }
///
///     fn draw(&self, canvas: &mut Vec<String>) {
///         canvas.push(self.0.to_string());
///     }
/// }
///
/// struct Dots;
///
/// impl LoadingState<(), Vec<String>> for Dots {
///     fn update(&mut self, _events: &[()], _dt: f32, _target: &str) {}
///
///     fn draw(&self, canvas: &mut Vec<String>) {
///         canvas.push("...".to_string());
///     }
/// }
///
/// let mut manager: StateManager<(), Vec<String>> = StateManager::builder()
///     .state("title", Screen("title", Some("game")))
///     .state("game", Screen("game", None))
///     .start("title")
///     .loading_state(Dots)
///     .build()
///     .unwrap();
///
/// let mut frame = Vec::new();
/// manager.tick(&[], 0.016, &mut frame).unwrap();
/// assert_eq!(frame, vec!["title".to_string()]);
/// assert_eq!(manager.pending_target(), Some("game"));
/// ```
pub struct StateManager<E: 'static, C: 'static> {
    registry: HashMap<String, Slot<E, C>>,
    active: String,
    visible: Visible,
    loading: Box<dyn LoadingState<E, C>>,
    pending: Option<PendingTransition<E, C>>,
    history: TransitionHistory,
    config: ManagerConfig,
}

impl<E: 'static, C: IndicatorCanvas + 'static> StateManager<E, C> {
    /// Build a manager over `states` using the default [`Spinner`].
    pub fn new<N, I>(states: I, start: &str) -> Result<Self, BuildError>
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, Box<dyn State<E, C>>)>,
    {
        Self::with_loading(states, start, Spinner::default())
    }
}

impl<E: 'static, C: 'static> StateManager<E, C> {
    pub fn builder() -> StateManagerBuilder<E, C> {
        StateManagerBuilder::new()
    }

    /// Build a manager over `states` with a custom loading state.
    pub fn with_loading<N, I, L>(states: I, start: &str, loading: L) -> Result<Self, BuildError>
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, Box<dyn State<E, C>>)>,
        L: LoadingState<E, C> + 'static,
    {
        states
            .into_iter()
            .fold(StateManagerBuilder::new(), |builder, (name, state)| {
                builder.boxed_state(name, state)
            })
            .start(start)
            .loading_state(loading)
            .build()
    }

    /// Assemble a manager whose start state has already been entered.
    pub(crate) fn from_parts(
        registry: HashMap<String, Slot<E, C>>,
        active: String,
        loading: Box<dyn LoadingState<E, C>>,
        history: TransitionHistory,
        config: ManagerConfig,
    ) -> Self {
        Self {
            registry,
            active,
            visible: Visible::Active,
            loading,
            pending: None,
            history,
            config,
        }
    }

    /// Run one frame: [`update`](Self::update) followed by [`draw`](Self::draw).
    ///
    /// `draw` runs even when `update` fails, so the frame is never left
    /// blank; the update error is returned afterwards.
    pub fn tick(&mut self, events: &[E], dt: f32, canvas: &mut C) -> Result<(), ManagerError> {
        let updated = self.update(events, dt);
        self.draw(canvas);
        updated
    }

    /// Advance the visible state by one tick.
    ///
    /// Completed entries are resolved and queued transitions launched before
    /// anything else, so the visible state is fixed for the rest of the tick.
    pub fn update(&mut self, events: &[E], dt: f32) -> Result<(), ManagerError> {
        let failure = self.resolve_pending();
        self.launch_queued()?;

        if let Some(failure) = failure {
            self.visible = Visible::Active;
            if self.config.on_entry_failure == EntryFailurePolicy::Propagate {
                return Err(failure.into());
            }
        }

        if let Some(pending) = &self.pending {
            self.visible = Visible::Loading;
            self.loading.update(events, dt, &pending.target);
            self.warn_if_slow();
            return Ok(());
        }

        self.visible = Visible::Active;
        let request = self.active_state_mut()?.update(events, dt);
        if let Some(request) = request {
            self.request(request)?;
        }
        Ok(())
    }

    /// Draw whichever state `update` made visible for this tick.
    pub fn draw(&self, canvas: &mut C) {
        match self.visible {
            Visible::Loading => self.loading.draw(canvas),
            Visible::Active => {
                if let Some(state) = self.state(&self.active) {
                    state.draw(canvas);
                }
            }
        }
    }

    /// Ask the manager to switch to another state.
    ///
    /// The target is validated immediately. An accepted request starts
    /// entering at the next tick boundary; the current state keeps drawing
    /// until then.
    pub fn request(&mut self, request: TransitionRequest) -> Result<RequestOutcome, ManagerError> {
        request.validate()?;
        if !self.registry.contains_key(request.target()) {
            return Err(ManagerError::UnknownState {
                name: request.target().to_string(),
            });
        }

        if let Some(pending) = &self.pending {
            return match self.config.on_concurrent_request {
                ConcurrentRequestPolicy::Ignore => {
                    tracing::warn!(
                        pending = %pending.target,
                        requested = %request.target(),
                        "transition already pending, ignoring request"
                    );
                    Ok(RequestOutcome::Ignored)
                }
                ConcurrentRequestPolicy::Reject => Err(ManagerError::TransitionInFlight {
                    pending: pending.target.clone(),
                    requested: request.target().to_string(),
                }),
            };
        }

        let (target, payload) = request.into_parts();
        tracing::info!(from = %self.active, to = %target, "transition accepted");
        self.pending = Some(PendingTransition {
            from: self.active.clone(),
            target,
            accepted_at: Utc::now(),
            stage: Stage::Queued(payload),
            warned_slow: false,
        });
        Ok(RequestOutcome::Accepted)
    }

    /// Name of the logically active state.
    ///
    /// While a transition is pending this is still the state being left.
    pub fn current_state_name(&self) -> &str {
        &self.active
    }

    /// Whether the loading state is visible this tick.
    pub fn is_loading(&self) -> bool {
        self.visible == Visible::Loading
    }

    pub fn pending_target(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.target.as_str())
    }

    /// Look up a registered state.
    ///
    /// Returns `None` for unknown names and for a state currently being
    /// entered on the worker.
    pub fn state(&self, name: &str) -> Option<&dyn State<E, C>> {
        self.registry.get(name).and_then(|slot| slot.state.as_deref())
    }

    pub fn state_names(&self) -> impl Iterator<Item = &str> {
        self.registry.keys().map(String::as_str)
    }

    pub fn loading_state(&self) -> &dyn LoadingState<E, C> {
        self.loading.as_ref()
    }

    pub fn history(&self) -> &TransitionHistory {
        &self.history
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    fn active_state_mut(&mut self) -> Result<&mut (dyn State<E, C> + 'static), ManagerError> {
        self.registry
            .get_mut(&self.active)
            .and_then(|slot| slot.state.as_deref_mut())
            .ok_or_else(|| ManagerError::StateUnavailable {
                name: self.active.clone(),
            })
    }

    /// Start the worker for a transition accepted during the previous tick.
    fn launch_queued(&mut self) -> Result<(), ManagerError> {
        let Some(pending) = self.pending.as_mut() else {
            return Ok(());
        };
        let Stage::Queued(payload) = &mut pending.stage else {
            return Ok(());
        };
        let payload = payload.take();

        let slot = self
            .registry
            .get_mut(&pending.target)
            .ok_or_else(|| ManagerError::UnknownState {
                name: pending.target.clone(),
            })?;
        let Some(state) = slot.state.take() else {
            return Err(ManagerError::StateUnavailable {
                name: pending.target.clone(),
            });
        };

        let job = EntryJob {
            target: pending.target.clone(),
            from: Some(pending.from.clone()),
            payload,
            state,
            needs_init: !slot.initialized,
        };

        match EntryWorker::spawn(job) {
            Ok(worker) => {
                tracing::debug!(state = %pending.target, "entry worker spawned");
                pending.stage = Stage::Running(worker);
                self.loading.on_begin(&pending.target);
                Ok(())
            }
            Err((source, job)) => {
                if let Some(job) = job {
                    slot.state = Some(job.state);
                }
                let target = pending.target.clone();
                self.pending = None;
                tracing::error!(state = %target, error = %source, "could not spawn entry worker");
                Err(ManagerError::Spawn { target, source })
            }
        }
    }

    /// Poll the running worker and finish the transition if it reported.
    ///
    /// Returns the entry failure, if any, for the caller to surface.
    fn resolve_pending(&mut self) -> Option<EntryFailure> {
        let pending = self.pending.as_mut()?;
        let Stage::Running(worker) = &mut pending.stage else {
            return None;
        };
        let report = worker.poll()?;
        let pending = self.pending.take()?;
        self.finish(pending, report)
    }

    fn finish(
        &mut self,
        pending: PendingTransition<E, C>,
        report: EntryReport<E, C>,
    ) -> Option<EntryFailure> {
        let PendingTransition {
            from,
            target,
            accepted_at,
            ..
        } = pending;
        let EntryReport {
            state,
            initialized,
            result,
        } = report;

        if let Some(slot) = self.registry.get_mut(&target) {
            slot.state = Some(state);
            slot.initialized |= initialized;
        }
        self.loading.on_finish(&target);

        let (outcome, failure) = match result {
            Ok(()) => {
                // A re-entered state is back in its slot, so it sees its own
                // exit here too.
                if let Some(previous) = self
                    .registry
                    .get_mut(&from)
                    .and_then(|slot| slot.state.as_mut())
                {
                    previous.on_exit(&target);
                }
                tracing::info!(from = %from, to = %target, "transition complete");
                self.active = target.clone();
                (TransitionOutcome::Entered, None)
            }
            Err(failure) => {
                tracing::error!(
                    from = %from,
                    to = %target,
                    error = %failure,
                    "entry failed, staying on previous state"
                );
                let reason = failure.to_string();
                (TransitionOutcome::Failed { reason }, Some(failure))
            }
        };

        self.history.record(TransitionRecord {
            from: Some(from),
            to: target,
            started_at: accepted_at,
            finished_at: Utc::now(),
            outcome,
        });
        failure
    }

    fn warn_if_slow(&mut self) {
        let Some(threshold) = self.config.slow_entry_warning() else {
            return;
        };
        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        if pending.warned_slow {
            return;
        }
        let elapsed = Utc::now()
            .signed_duration_since(pending.accepted_at)
            .to_std()
            .unwrap_or_default();
        if elapsed > threshold {
            pending.warned_slow = true;
            tracing::warn!(
                state = %pending.target,
                elapsed_ms = elapsed.as_millis() as u64,
                "state entry is taking longer than expected"
            );
        }
    }
}

//! Builder for constructing state managers.

use crate::builder::error::{BuildError, RegistryIssue};
use crate::config::ManagerConfig;
use crate::core::{State, TransitionHistory, TransitionOutcome, TransitionRecord};
use crate::loading::{IndicatorCanvas, LoadingState, Spinner};
use crate::manager::{EntryFailure, Slot, StateManager};
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Builder for constructing state managers with a fluent API.
pub struct StateManagerBuilder<E: 'static, C: 'static> {
    states: Vec<(String, Box<dyn State<E, C>>)>,
    start: Option<String>,
    loading: Option<Box<dyn LoadingState<E, C>>>,
    config: ManagerConfig,
}

impl<E: 'static, C: 'static> StateManagerBuilder<E, C> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            start: None,
            loading: None,
            config: ManagerConfig::default(),
        }
    }

    /// Register a state under `name`.
    pub fn state<S>(self, name: impl Into<String>, state: S) -> Self
    where
        S: State<E, C> + 'static,
    {
        self.boxed_state(name, Box::new(state))
    }

    /// Register an already boxed state under `name`.
    pub fn boxed_state(mut self, name: impl Into<String>, state: Box<dyn State<E, C>>) -> Self {
        self.states.push((name.into(), state));
        self
    }

    /// Set the start state.
    ///
    /// Required unless exactly one state is registered.
    pub fn start(mut self, name: impl Into<String>) -> Self {
        self.start = Some(name.into());
        self
    }

    /// Set the state shown while transitions enter.
    pub fn loading_state<L>(mut self, loading: L) -> Self
    where
        L: LoadingState<E, C> + 'static,
    {
        self.loading = Some(Box::new(loading));
        self
    }

    pub fn config(mut self, config: ManagerConfig) -> Self {
        self.config = config;
        self
    }

    /// Run every state's `on_init` during `build`.
    pub fn preload(mut self, preload: bool) -> Self {
        self.config.preload = preload;
        self
    }

    /// Check the registry, accumulating ALL problems.
    fn validate(&self) -> Validation<(), NonEmptyVec<RegistryIssue>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<RegistryIssue>>> = Vec::new();

        checks.push(if self.states.is_empty() {
            Validation::fail(RegistryIssue::NoStates)
        } else {
            Validation::success(())
        });

        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        for (name, _) in &self.states {
            if name.is_empty() {
                if reported.insert(name.as_str()) {
                    checks.push(Validation::fail(RegistryIssue::EmptyName));
                }
            } else if !seen.insert(name.as_str()) && reported.insert(name.as_str()) {
                checks.push(Validation::fail(RegistryIssue::DuplicateName(name.clone())));
            }
        }

        match &self.start {
            Some(start) if !seen.contains(start.as_str()) => {
                checks.push(Validation::fail(RegistryIssue::UnknownStart(start.clone())));
            }
            None if self.states.len() > 1 => {
                checks.push(Validation::fail(RegistryIssue::MissingStart));
            }
            _ => checks.push(Validation::success(())),
        }

        Validation::all_vec(checks).map(|_| ())
    }

    /// Build the state manager.
    ///
    /// Validates the registry, runs preloading if enabled, then runs the
    /// start state's `on_init`/`on_enter` synchronously on the calling
    /// thread.
    pub fn build(self) -> Result<StateManager<E, C>, BuildError> {
        if let Validation::Failure(issues) = self.validate() {
            return Err(BuildError::InvalidRegistry(issues.iter().cloned().collect()));
        }
        let loading = self.loading.ok_or(BuildError::MissingLoadingState)?;

        let start = match self.start {
            Some(start) => start,
            None => {
                let only = self
                    .states
                    .first()
                    .map(|(name, _)| name.clone())
                    .ok_or_else(|| BuildError::InvalidRegistry(vec![RegistryIssue::NoStates]))?;
                tracing::info!(state = %only, "single state registered, starting it automatically");
                only
            }
        };

        let mut registry: HashMap<String, Slot<E, C>> = self
            .states
            .into_iter()
            .map(|(name, state)| {
                let slot = Slot {
                    state: Some(state),
                    initialized: false,
                };
                (name, slot)
            })
            .collect();

        if self.config.preload {
            for (name, slot) in registry.iter_mut() {
                if let Some(state) = slot.state.as_mut() {
                    state.on_init().map_err(|source| {
                        BuildError::PreloadFailed(EntryFailure::Init {
                            state: name.clone(),
                            source,
                        })
                    })?;
                    slot.initialized = true;
                }
            }
            tracing::debug!(states = registry.len(), "preloaded all states");
        }

        let started_at = Utc::now();
        enter_start(&mut registry, &start)?;

        let mut history = TransitionHistory::with_limit(self.config.history_limit);
        history.record(TransitionRecord {
            from: None,
            to: start.clone(),
            started_at,
            finished_at: Utc::now(),
            outcome: TransitionOutcome::Entered,
        });

        tracing::info!(start = %start, states = registry.len(), "state manager ready");
        Ok(StateManager::from_parts(
            registry,
            start,
            loading,
            history,
            self.config,
        ))
    }
}

impl<E: 'static, C: IndicatorCanvas + 'static> StateManagerBuilder<E, C> {
    /// Use the default [`Spinner`] as the loading state.
    pub fn spinner(self) -> Self {
        self.loading_state(Spinner::default())
    }
}

impl<E: 'static, C: 'static> Default for StateManagerBuilder<E, C> {
    fn default() -> Self {
        Self::new()
    }
}

fn enter_start<E, C>(
    registry: &mut HashMap<String, Slot<E, C>>,
    start: &str,
) -> Result<(), BuildError> {
    let Some(slot) = registry.get_mut(start) else {
        return Err(BuildError::InvalidRegistry(vec![RegistryIssue::UnknownStart(
            start.to_string(),
        )]));
    };
    let Some(state) = slot.state.as_mut() else {
        return Err(BuildError::InvalidRegistry(vec![RegistryIssue::UnknownStart(
            start.to_string(),
        )]));
    };

    if !slot.initialized {
        state.on_init().map_err(|source| {
            BuildError::StartFailed(EntryFailure::Init {
                state: start.to_string(),
                source,
            })
        })?;
        slot.initialized = true;
    }

    state.on_enter(None, None).map_err(|source| {
        BuildError::StartFailed(EntryFailure::Enter {
            state: start.to_string(),
            source,
        })
    })
}

//! Background execution of a target state's entry hooks.
//!
//! The render thread hands a state to an [`EntryWorker`], which moves it to
//! a dedicated thread, runs `on_init`/`on_enter` there, and hands it back
//! through a single-writer result cell. The render thread only ever polls
//! the cell; it never waits on the worker.

use super::error::EntryFailure;
use crate::core::{Payload, State};
use parking_lot::Mutex;
use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

const PENDING: u8 = 0;
const SUCCEEDED: u8 = 1;
const FAILED: u8 = 2;

/// Observable progress of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntryStatus {
    Pending,
    Succeeded,
    Failed,
}

/// Everything the worker needs to enter a state.
pub(crate) struct EntryJob<E, C> {
    pub target: String,
    pub from: Option<String>,
    pub payload: Option<Payload>,
    pub state: Box<dyn State<E, C>>,
    pub needs_init: bool,
}

/// What the worker hands back.
pub(crate) struct EntryReport<E, C> {
    pub state: Box<dyn State<E, C>>,
    /// `on_init` ran and succeeded during this entry
    pub initialized: bool,
    pub result: Result<(), EntryFailure>,
}

/// Result cell shared between the render thread and one worker.
///
/// The worker writes the report once, then publishes the status tag with
/// release ordering. The render thread reads the tag with acquire ordering
/// and only then touches the report.
struct EntryCell<E, C> {
    status: AtomicU8,
    job: Mutex<Option<EntryJob<E, C>>>,
    report: Mutex<Option<EntryReport<E, C>>>,
}

impl<E, C> EntryCell<E, C> {
    fn new(job: EntryJob<E, C>) -> Self {
        Self {
            status: AtomicU8::new(PENDING),
            job: Mutex::new(Some(job)),
            report: Mutex::new(None),
        }
    }

    fn status(&self) -> EntryStatus {
        match self.status.load(Ordering::Acquire) {
            PENDING => EntryStatus::Pending,
            SUCCEEDED => EntryStatus::Succeeded,
            _ => EntryStatus::Failed,
        }
    }

    fn complete(&self, report: EntryReport<E, C>) {
        let tag = if report.result.is_ok() {
            SUCCEEDED
        } else {
            FAILED
        };
        *self.report.lock() = Some(report);
        self.status.store(tag, Ordering::Release);
    }

    fn take_report(&self) -> Option<EntryReport<E, C>> {
        self.report.lock().take()
    }
}

/// Handle to one in-flight entry.
pub(crate) struct EntryWorker<E, C> {
    cell: Arc<EntryCell<E, C>>,
    handle: Option<JoinHandle<()>>,
}

impl<E: 'static, C: 'static> EntryWorker<E, C> {
    /// Move `job` onto a new worker thread.
    ///
    /// If the thread cannot be spawned the job is handed back untouched so
    /// the caller can restore its state.
    pub fn spawn(job: EntryJob<E, C>) -> Result<Self, (io::Error, Option<EntryJob<E, C>>)> {
        let name = format!("tickstate-enter-{}", job.target);
        let cell = Arc::new(EntryCell::new(job));
        let worker_cell = Arc::clone(&cell);

        let spawned = thread::Builder::new().name(name).spawn(move || {
            let job = worker_cell.job.lock().take();
            if let Some(job) = job {
                let report = run_entry(job);
                worker_cell.complete(report);
            }
        });

        match spawned {
            Ok(handle) => Ok(Self {
                cell,
                handle: Some(handle),
            }),
            Err(err) => {
                let job = cell.job.lock().take();
                Err((err, job))
            }
        }
    }
}

impl<E, C> EntryWorker<E, C> {
    pub fn status(&self) -> EntryStatus {
        self.cell.status()
    }

    /// Non-blocking completion check.
    ///
    /// Returns the report once the worker has published it. The thread is
    /// joined only if it has already exited; otherwise it is detached.
    pub fn poll(&mut self) -> Option<EntryReport<E, C>> {
        if self.status() == EntryStatus::Pending {
            return None;
        }
        let report = self.cell.take_report();
        if let Some(handle) = self.handle.take() {
            if handle.is_finished() && handle.join().is_err() {
                tracing::warn!("entry worker exited with a panic after reporting");
            }
        }
        report
    }
}

fn run_entry<E, C>(job: EntryJob<E, C>) -> EntryReport<E, C> {
    let EntryJob {
        target,
        from,
        payload,
        mut state,
        needs_init,
    } = job;
    let mut initialized = false;

    tracing::debug!(state = %target, from = ?from, needs_init, "running entry");

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        if needs_init {
            state.on_init().map_err(|source| EntryFailure::Init {
                state: target.clone(),
                source,
            })?;
            initialized = true;
        }
        state
            .on_enter(from.as_deref(), payload)
            .map_err(|source| EntryFailure::Enter {
                state: target.clone(),
                source,
            })
    }));

    let result = match outcome {
        Ok(result) => result,
        Err(panic) => Err(EntryFailure::Panicked {
            state: target.clone(),
            message: panic_message(panic.as_ref()),
        }),
    };

    EntryReport {
        state,
        initialized,
        result,
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

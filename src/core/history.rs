//! Transition history tracking.
//!
//! Every transition the manager finishes, successful or not, is recorded
//! here so the host can inspect what happened after the fact.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// How a transition ended.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TransitionOutcome {
    /// The target's `on_enter` returned and the target became active.
    Entered,
    /// The target's entry failed; the previous state stayed active.
    Failed { reason: String },
}

/// Record of a single finished transition.
///
/// # Example
///
/// ```rust
/// use tickstate::{TransitionOutcome, TransitionRecord};
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     from: Some("menu".to_string()),
///     to: "level".to_string(),
///     started_at: Utc::now(),
///     finished_at: Utc::now(),
///     outcome: TransitionOutcome::Entered,
/// };
///
/// assert!(record.succeeded());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// State being left, `None` for the start state's entry
    pub from: Option<String>,
    /// State being entered
    pub to: String,
    /// When the request was accepted
    pub started_at: DateTime<Utc>,
    /// When the manager observed completion
    pub finished_at: DateTime<Utc>,
    pub outcome: TransitionOutcome,
}

impl TransitionRecord {
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, TransitionOutcome::Entered)
    }

    /// Time spent between acceptance and completion.
    pub fn elapsed(&self) -> Duration {
        self.finished_at
            .signed_duration_since(self.started_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }
}

/// Bounded, ordered history of finished transitions.
///
/// Once `limit` records are held, recording another drops the oldest.
///
/// # Example
///
/// ```rust
/// use tickstate::{TransitionHistory, TransitionOutcome, TransitionRecord};
/// use chrono::Utc;
///
/// let mut history = TransitionHistory::with_limit(8);
///
/// history.record(TransitionRecord {
///     from: None,
///     to: "menu".to_string(),
///     started_at: Utc::now(),
///     finished_at: Utc::now(),
///     outcome: TransitionOutcome::Entered,
/// });
/// history.record(TransitionRecord {
///     from: Some("menu".to_string()),
///     to: "level".to_string(),
///     started_at: Utc::now(),
///     finished_at: Utc::now(),
///     outcome: TransitionOutcome::Entered,
/// });
///
/// assert_eq!(history.path(), vec!["menu", "level"]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransitionHistory {
    records: VecDeque<TransitionRecord>,
    limit: usize,
}

impl Default for TransitionHistory {
    fn default() -> Self {
        Self::with_limit(64)
    }
}

impl TransitionHistory {
    /// Create an empty history holding at most `limit` records.
    ///
    /// A limit of zero keeps nothing.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            records: VecDeque::new(),
            limit,
        }
    }

    pub fn record(&mut self, record: TransitionRecord) {
        if self.limit == 0 {
            return;
        }
        while self.records.len() >= self.limit {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Names of the states successfully entered, in order.
    ///
    /// When the first retained record has a predecessor, that predecessor
    /// leads the path.
    pub fn path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        let mut entered = self.records.iter().filter(|r| r.succeeded()).peekable();
        if let Some(from) = entered.peek().copied().and_then(|first| first.from.as_deref()) {
            path.push(from);
        }
        for record in entered {
            path.push(record.to.as_str());
        }
        path
    }

    /// Time from the first retained start to the last retained finish.
    ///
    /// Returns `None` if there are no records.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.front()?, self.records.back()?);
        last.finished_at
            .signed_duration_since(first.started_at)
            .to_std()
            .ok()
    }

    pub fn failures(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.records.iter().filter(|r| !r.succeeded())
    }

    pub fn last(&self) -> Option<&TransitionRecord> {
        self.records.back()
    }

    pub fn records(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

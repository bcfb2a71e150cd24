//! Manager configuration and the policies it selects.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// What to do with a transition request that arrives while another
/// transition is still entering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcurrentRequestPolicy {
    /// Log a warning and drop the request
    #[default]
    Ignore,

    /// Return `ManagerError::TransitionInFlight` to the caller
    Reject,
}

/// What to do when a target state's entry fails.
///
/// Either way the previous state stays active and the failure lands in
/// the transition history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryFailurePolicy {
    /// Return `ManagerError::EntryFailed` from the tick that observed it
    #[default]
    Propagate,

    /// Log the failure and keep ticking
    LogAndResume,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid manager configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunables for a [`StateManager`](crate::StateManager).
///
/// Every field has a default, so partial JSON documents are accepted.
///
/// # Example
///
/// ```rust
/// use tickstate::{ConcurrentRequestPolicy, ManagerConfig};
///
/// let config = ManagerConfig::from_json(r#"{ "preload": true, "on_concurrent_request": "reject" }"#)
///     .unwrap();
///
/// assert!(config.preload);
/// assert_eq!(config.on_concurrent_request, ConcurrentRequestPolicy::Reject);
/// assert_eq!(config.history_limit, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Run every state's `on_init` while building the manager
    pub preload: bool,

    pub on_concurrent_request: ConcurrentRequestPolicy,

    pub on_entry_failure: EntryFailurePolicy,

    /// Log a warning once an entry has been running this long (milliseconds)
    pub slow_entry_warning_ms: Option<u64>,

    /// Maximum number of transition records kept
    pub history_limit: usize,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            preload: false,
            on_concurrent_request: ConcurrentRequestPolicy::Ignore,
            on_entry_failure: EntryFailurePolicy::Propagate,
            slow_entry_warning_ms: None,
            history_limit: 64,
        }
    }
}

impl ManagerConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn slow_entry_warning(&self) -> Option<Duration> {
        self.slow_entry_warning_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = ManagerConfig::default();
        assert!(!config.preload);
        assert_eq!(config.on_concurrent_request, ConcurrentRequestPolicy::Ignore);
        assert_eq!(config.on_entry_failure, EntryFailurePolicy::Propagate);
        assert!(config.slow_entry_warning().is_none());
        assert_eq!(config.history_limit, 64);
    }

    #[test]
    fn empty_json_yields_defaults() {
        let config = ManagerConfig::from_json("{}").unwrap();
        assert_eq!(config, ManagerConfig::default());
    }

    #[test]
    fn policies_parse_from_snake_case() {
        let config = ManagerConfig::from_json(
            r#"{
                "on_entry_failure": "log_and_resume",
                "slow_entry_warning_ms": 250,
                "history_limit": 4
            }"#,
        )
        .unwrap();

        assert_eq!(config.on_entry_failure, EntryFailurePolicy::LogAndResume);
        assert_eq!(config.slow_entry_warning(), Some(Duration::from_millis(250)));
        assert_eq!(config.history_limit, 4);
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let result = ManagerConfig::from_json(r#"{ "on_concurrent_request": "queue" }"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = ManagerConfig {
            preload: true,
            on_concurrent_request: ConcurrentRequestPolicy::Reject,
            ..ManagerConfig::default()
        };

        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(ManagerConfig::from_json(&json).unwrap(), config);
    }
}

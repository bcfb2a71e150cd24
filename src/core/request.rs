//! Transition requests emitted by states.

use super::state::Payload;
use std::any::Any;
use thiserror::Error;

/// Errors in a transition request itself, independent of the registry.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RequestError {
    #[error("Transition target must not be empty")]
    EmptyTarget,
}

/// An immutable request to switch to another named state.
///
/// Returned from [`State::update`](crate::State::update) or handed to
/// [`StateManager::request`](crate::StateManager::request).
///
/// # Example
///
/// ```rust
/// use tickstate::TransitionRequest;
///
/// let request = TransitionRequest::new("level").with_payload(3u32);
///
/// assert_eq!(request.target(), "level");
/// assert!(request.payload().is_some());
/// assert!(request.validate().is_ok());
/// ```
#[derive(Debug)]
pub struct TransitionRequest {
    target: String,
    payload: Option<Payload>,
}

impl TransitionRequest {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            payload: None,
        }
    }

    /// Attach a value for the target's `on_enter`.
    pub fn with_payload<T: Any + Send>(mut self, value: T) -> Self {
        self.payload = Some(Payload::new(value));
        self
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    pub fn validate(&self) -> Result<(), RequestError> {
        if self.target.is_empty() {
            Err(RequestError::EmptyTarget)
        } else {
            Ok(())
        }
    }

    pub fn into_parts(self) -> (String, Option<Payload>) {
        (self.target, self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_without_payload() {
        let request = TransitionRequest::new("pause");
        assert_eq!(request.target(), "pause");
        assert!(request.payload().is_none());
    }

    #[test]
    fn payload_passes_through_verbatim() {
        let request = TransitionRequest::new("level").with_payload(vec![1u8, 2, 3]);
        let (target, payload) = request.into_parts();

        assert_eq!(target, "level");
        assert_eq!(payload.unwrap().downcast::<Vec<u8>>().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn empty_target_is_invalid() {
        let request = TransitionRequest::new("");
        assert_eq!(request.validate(), Err(RequestError::EmptyTarget));
    }

    #[test]
    fn later_payload_replaces_earlier() {
        let request = TransitionRequest::new("x").with_payload(1u8).with_payload("two");
        assert!(request.payload().unwrap().is::<&str>());
    }
}

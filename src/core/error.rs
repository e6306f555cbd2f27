//! Definition errors for states and events.

use thiserror::Error;

/// Errors raised while defining states and events.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("The state name cannot be blank")]
    InvalidState,

    #[error("Invalid event '{name}': {reason}")]
    InvalidEvent { name: String, reason: String },
}

impl DefinitionError {
    pub(crate) fn blank_event() -> Self {
        DefinitionError::InvalidEvent {
            name: String::new(),
            reason: "The event name cannot be blank".to_string(),
        }
    }
}

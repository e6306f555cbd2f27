//! Errors returned by a running machine.

use thiserror::Error;

/// Registry lookup failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("No {kind} named '{name}' is registered")]
    NotFound { kind: &'static str, name: String },
}

impl LookupError {
    pub(crate) fn state(name: &str) -> Self {
        LookupError::NotFound {
            kind: "state",
            name: name.to_string(),
        }
    }

    pub(crate) fn event(name: &str) -> Self {
        LookupError::NotFound {
            kind: "event",
            name: name.to_string(),
        }
    }
}

/// Reasons a firing was refused. The machine is unchanged after any of them.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FireError {
    #[error("The state machine has not been activated")]
    NotActivated,

    #[error(
        "An attempt was made to fire the `{event}` event while in the `{current}` state. \
         This event can only be fired from the following states: {}",
        .sources.join(", ")
    )]
    CannotFire {
        event: String,
        current: String,
        sources: Vec<String>,
    },

    #[error(
        "An attempt to fire the `{event}` event was declined because its validation gate returned `false`"
    )]
    Declined { event: String },

    #[error("No event named '{name}' is registered")]
    UnknownEvent { name: String },
}

impl FireError {
    /// Stable identifier for each refusal, suitable for matching in callers
    /// that surface the reason elsewhere.
    pub fn code(&self) -> &'static str {
        match self {
            FireError::NotActivated => "NOT_ACTIVATED",
            FireError::CannotFire { .. } => "CANNOT_FIRE",
            FireError::Declined { .. } => "DECLINED",
            FireError::UnknownEvent { .. } => "NOT_FOUND",
        }
    }
}

//! Build errors for state, event and machine builders.

use crate::core::DefinitionError;
use thiserror::Error;

/// Errors that can occur when building states, events and machines.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error("Validation failed during state machine creation: {}", .reasons.join("; "))]
    Declined { reasons: Vec<String> },
}

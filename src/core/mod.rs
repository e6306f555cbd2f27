//! Core definitions: states, events, guards and transition history.
//!
//! Everything in this module is immutable once built. The engine that moves
//! between states lives in [`crate::machine`].

pub mod error;
pub mod event;
pub mod guard;
pub mod history;
pub mod state;

pub use error::DefinitionError;
pub use event::{Event, EventHook, EventHooks};
pub use guard::Guard;
pub use history::{History, TransitionRecord, DEFAULT_HISTORY_LIMIT};
pub use state::{Payload, State, StateHook, StateHooks};

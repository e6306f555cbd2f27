//! The running state machine.
//!
//! # Key Concepts
//!
//! - **Machine**: registry of states and events plus the current position
//! - **Transition**: the record passed to hooks while an event fires
//! - **Errors**: typed refusals (`FireError`) and lookup misses (`LookupError`)
//!
//! The engine is synchronous. Every hook runs on the calling thread before
//! `fire` returns, and hooks only ever see a shared `&Machine`, so a hook
//! cannot fire another event on the machine that is running it.

mod engine;
mod error;
mod graph;
mod transition;

pub use engine::Machine;
pub use error::{FireError, LookupError};
pub use transition::Transition;

//! Builder API for assembling states, events and machines.
//!
//! The builders validate their input before anything reaches the engine:
//! blank names, missing destinations and empty machines are reported as
//! [`BuildError`]s, with every problem collected in a single pass.

pub mod error;
pub mod event;
pub mod machine;
pub mod macros;
pub mod state;

pub use error::BuildError;
pub use event::{EventBuilder, SourceCheck};
pub use machine::MachineBuilder;
pub use state::StateBuilder;

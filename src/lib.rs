//! Krypton: a synchronous finite state machine engine
//!
//! Declare named states and named events, register them with a [`Machine`],
//! activate it from an initial state, then drive it by firing events. Each
//! firing runs the event's validation gate and the lifecycle hooks of the
//! event and of the states it leaves and enters, in a fixed order.
//!
//! # Core Concepts
//!
//! - **State**: an immutable named node with optional payload and hooks
//! - **Event**: a named edge from a set of source states to one destination
//! - **Guard**: the validation gate that can decline a firing
//! - **Machine**: the registry and the current position; frozen once active
//! - **Transition**: the record handed to every hook during a firing
//!
//! # Example
//!
//! ```rust
//! use krypton::core::{Event, State};
//! use krypton::machine::{FireError, Machine};
//!
//! let [armed, disarmed, alarm] = krypton::states!["Armed", "Disarmed", "Alarm"].unwrap();
//!
//! let arm = Event::new("Arm", [disarmed.clone()], armed.clone()).unwrap();
//! let breach = Event::new("Breach", [armed.clone()], alarm.clone()).unwrap();
//! let reset = Event::new("Reset", [alarm.clone()], disarmed.clone()).unwrap();
//!
//! let mut machine = Machine::new(disarmed.clone());
//! machine.add_states([armed.clone(), disarmed.clone(), alarm.clone()]);
//! machine.add_events([arm.clone(), breach.clone(), reset.clone()]);
//! machine.activate();
//!
//! assert!(matches!(machine.fire(&breach), Err(FireError::CannotFire { .. })));
//!
//! machine.fire(&arm).unwrap();
//! machine.fire(&breach).unwrap();
//! assert!(machine.is_in(&alarm));
//!
//! machine.fire(&reset).unwrap();
//! assert!(machine.is_in(&disarmed));
//! assert_eq!(machine.history().get_path(), vec!["Disarmed", "Armed", "Alarm", "Disarmed"]);
//! ```

pub mod builder;
pub mod core;
pub mod machine;

// Re-export commonly used types
pub use crate::builder::{BuildError, EventBuilder, MachineBuilder, StateBuilder};
pub use crate::core::{
    DefinitionError, Event, EventHooks, Guard, History, Payload, State, StateHooks,
    TransitionRecord,
};
pub use crate::machine::{FireError, LookupError, Machine, Transition};

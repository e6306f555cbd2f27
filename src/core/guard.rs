//! Validation gates for events.
//!
//! A guard is the last check before a transition commits. It sees the event
//! and the in-flight transition (including the caller's context and the
//! machine itself) and answers whether the firing may go ahead.

use super::event::Event;
use crate::machine::Transition;
use std::fmt;
use std::sync::Arc;

type Predicate = dyn Fn(&Event, &Transition<'_>) -> bool + Send + Sync;

/// Predicate that decides whether an event may fire.
///
/// Guards should be deterministic and free of side effects: a declined
/// firing leaves the machine untouched and runs no further hooks.
///
/// # Example
///
/// ```rust
/// use krypton::core::{Event, EventHooks, Guard, State};
/// use krypton::machine::{FireError, Machine};
/// use serde_json::json;
///
/// let locked = State::new("Locked").unwrap();
/// let open = State::new("Open").unwrap();
///
/// let needs_code = Guard::new(|_event, transition| {
///     transition.context().get("code") == Some(&json!("1234"))
/// });
/// let unlock = Event::with_hooks(
///     "Unlock",
///     [locked.clone()],
///     open.clone(),
///     EventHooks::new().should_fire(needs_code),
/// )
/// .unwrap();
///
/// let mut machine = Machine::new(locked.clone());
/// machine.add_states([locked.clone(), open.clone()]);
/// machine.add_event(unlock.clone());
/// machine.activate();
///
/// assert!(matches!(machine.fire(&unlock), Err(FireError::Declined { .. })));
/// assert!(machine.is_in(&locked));
/// ```
#[derive(Clone)]
pub struct Guard {
    predicate: Arc<Predicate>,
}

impl Guard {
    /// Create a guard from a predicate over the event and the transition.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&Event, &Transition<'_>) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    /// Guard with a fixed answer.
    pub fn always(allow: bool) -> Self {
        Self::new(move |_, _| allow)
    }

    /// Evaluate the guard for one firing.
    pub fn check(&self, event: &Event, transition: &Transition<'_>) -> bool {
        (self.predicate)(event, transition)
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").finish_non_exhaustive()
    }
}

//! Event definitions.
//!
//! An event is a named edge set: the states it may be fired from and the one
//! state it leads to. An event with no sources is a wildcard and can be fired
//! from any state.

use super::error::DefinitionError;
use super::guard::Guard;
use super::state::State;
use crate::machine::Transition;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Lifecycle hook on an event.
pub type EventHook = Arc<dyn Fn(&Event, &Transition<'_>) + Send + Sync>;

/// Validation gate and lifecycle hooks of an event.
#[derive(Clone, Default)]
pub struct EventHooks {
    pub should_fire: Option<Guard>,
    pub before_fire: Option<EventHook>,
    pub after_fire: Option<EventHook>,
}

impl EventHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gate the event; a `false` answer declines the firing.
    pub fn should_fire(mut self, guard: Guard) -> Self {
        self.should_fire = Some(guard);
        self
    }

    /// Gate the event with a closure.
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Event, &Transition<'_>) -> bool + Send + Sync + 'static,
    {
        self.should_fire = Some(Guard::new(predicate));
        self
    }

    /// Runs first once the gate approves.
    pub fn before_fire<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Event, &Transition<'_>) + Send + Sync + 'static,
    {
        self.before_fire = Some(Arc::new(hook));
        self
    }

    /// Runs after the old state's `before_exit`.
    pub fn after_fire<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Event, &Transition<'_>) + Send + Sync + 'static,
    {
        self.after_fire = Some(Arc::new(hook));
        self
    }
}

impl fmt::Debug for EventHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHooks")
            .field("should_fire", &self.should_fire.is_some())
            .field("before_fire", &self.before_fire.is_some())
            .field("after_fire", &self.after_fire.is_some())
            .finish()
    }
}

struct EventDefinition {
    name: String,
    sources: BTreeSet<State>,
    destination: State,
    hooks: EventHooks,
}

/// A named transition from a set of source states to one destination.
///
/// Equality and hashing use the name only, so callers must keep event names
/// unique within a machine.
///
/// # Example
///
/// ```rust
/// use krypton::core::{Event, State};
///
/// let armed = State::new("Armed").unwrap();
/// let disarmed = State::new("Disarmed").unwrap();
/// let arm = Event::new("Arm", [disarmed.clone()], armed.clone()).unwrap();
///
/// assert!(arm.permits(&disarmed));
/// assert!(!arm.permits(&armed));
/// assert_eq!(arm.to_string(), "Event `Arm` transitions from Disarmed to `Armed`");
/// ```
#[derive(Clone)]
pub struct Event {
    inner: Arc<EventDefinition>,
}

impl Event {
    /// Create an event without hooks.
    pub fn new<I>(
        name: impl Into<String>,
        sources: I,
        destination: State,
    ) -> Result<Self, DefinitionError>
    where
        I: IntoIterator<Item = State>,
    {
        Self::with_hooks(name, sources, destination, EventHooks::default())
    }

    /// Create an event with a validation gate and lifecycle hooks.
    pub fn with_hooks<I>(
        name: impl Into<String>,
        sources: I,
        destination: State,
        hooks: EventHooks,
    ) -> Result<Self, DefinitionError>
    where
        I: IntoIterator<Item = State>,
    {
        let name = name.into();
        if name.is_empty() {
            return Err(DefinitionError::blank_event());
        }

        Ok(Event {
            inner: Arc::new(EventDefinition {
                name,
                sources: sources.into_iter().collect(),
                destination,
                hooks,
            }),
        })
    }

    /// The event's unique name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Permitted source states, ordered by name. Empty means any state.
    pub fn sources(&self) -> &BTreeSet<State> {
        &self.inner.sources
    }

    /// The state entered when the event fires.
    pub fn destination(&self) -> &State {
        &self.inner.destination
    }

    /// Validation gate and lifecycle hooks.
    pub fn hooks(&self) -> &EventHooks {
        &self.inner.hooks
    }

    /// True when the event declares no sources.
    pub fn is_wildcard(&self) -> bool {
        self.inner.sources.is_empty()
    }

    /// Whether the event may be fired while the machine is in `state`.
    pub fn permits(&self, state: &State) -> bool {
        self.is_wildcard() || self.inner.sources.contains(state)
    }

    pub(crate) fn approves(&self, transition: &Transition<'_>) -> bool {
        self.inner
            .hooks
            .should_fire
            .as_ref()
            .is_none_or(|guard| guard.check(self, transition))
    }

    pub(crate) fn notify_before_fire(&self, transition: &Transition<'_>) {
        if let Some(hook) = &self.inner.hooks.before_fire {
            hook(self, transition);
        }
    }

    pub(crate) fn notify_after_fire(&self, transition: &Transition<'_>) {
        if let Some(hook) = &self.inner.hooks.after_fire {
            hook(self, transition);
        }
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for Event {}

impl Hash for Event {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Event `{}` transitions from ", self.name())?;

        let count = self.inner.sources.len();
        if count == 0 {
            f.write_str("any state ")?;
        }
        for (index, state) in self.inner.sources.iter().enumerate() {
            if count == 1 {
                write!(f, "{} ", state.name())?;
            } else if index == count - 2 {
                write!(f, "{}, and ", state.name())?;
            } else {
                write!(f, "{}, ", state.name())?;
            }
        }

        write!(f, "to `{}`", self.destination().name())
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sources: Vec<&str> = self.inner.sources.iter().map(State::name).collect();
        f.debug_struct("Event")
            .field("name", &self.inner.name)
            .field("sources", &sources)
            .field("destination", &self.inner.destination.name())
            .field("hooks", &self.inner.hooks)
            .finish()
    }
}

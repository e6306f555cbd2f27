//! The state machine engine.

use super::error::{FireError, LookupError};
use super::transition::Transition;
use crate::core::{
    Event, History, Payload, State, TransitionRecord, DEFAULT_HISTORY_LIMIT,
};
use chrono::Utc;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Registry of states and events plus the current position.
///
/// A machine starts out configurable: states and events can be registered
/// with the `add_*` methods. [`Machine::activate`] freezes the registry and
/// moves the machine into its initial state; from then on it only moves by
/// firing events.
///
/// Mutation requires `&mut self`. Share a machine between threads behind a
/// lock such as `Arc<Mutex<Machine>>`. Hooks run while that lock is held, so a
/// hook that captures the same lock and locks it again deadlocks instead of
/// returning an error.
///
/// # Example
///
/// ```rust
/// use krypton::core::{Event, State};
/// use krypton::machine::{FireError, Machine};
///
/// let disarmed = State::new("Disarmed").unwrap();
/// let armed = State::new("Armed").unwrap();
/// let arm = Event::new("Arm", [disarmed.clone()], armed.clone()).unwrap();
/// let disarm = Event::new("Disarm", [armed.clone()], disarmed.clone()).unwrap();
///
/// let mut machine = Machine::new(disarmed.clone());
/// machine.add_states([disarmed.clone(), armed.clone()]);
/// machine.add_events([arm.clone(), disarm.clone()]);
///
/// assert_eq!(machine.fire(&arm), Err(FireError::NotActivated));
///
/// machine.activate();
/// assert!(machine.is_in(&disarmed));
/// assert!(matches!(machine.fire(&disarm), Err(FireError::CannotFire { .. })));
///
/// machine.fire(&arm).unwrap();
/// assert!(machine.is_in(&armed));
/// ```
#[derive(Debug)]
pub struct Machine {
    states: HashMap<String, State>,
    events: HashMap<String, Event>,
    initial_state: State,
    current_state: State,
    active: bool,
    history: History,
}

impl Machine {
    /// Create an inactive machine. The initial state does not need to be
    /// registered.
    pub fn new(initial_state: State) -> Self {
        Self::with_history_limit(initial_state, DEFAULT_HISTORY_LIMIT)
    }

    /// Create an inactive machine that keeps at most `limit` history records.
    pub fn with_history_limit(initial_state: State, limit: usize) -> Self {
        Self {
            states: HashMap::new(),
            events: HashMap::new(),
            initial_state,
            current_state: State::placeholder(),
            active: false,
            history: History::with_limit(limit),
        }
    }

    /// Register a state. Ignored once the machine is active or when a state
    /// with the same name is already registered.
    pub fn add_state(&mut self, state: State) {
        if self.active {
            tracing::trace!(state = state.name(), "machine is active, state ignored");
            return;
        }

        match self.states.entry(state.name().to_string()) {
            Entry::Occupied(_) => {
                tracing::trace!(state = state.name(), "state already registered");
            }
            Entry::Vacant(slot) => {
                slot.insert(state);
            }
        }
    }

    /// Register several states. Same rules as [`Machine::add_state`].
    pub fn add_states<I>(&mut self, states: I)
    where
        I: IntoIterator<Item = State>,
    {
        for state in states {
            self.add_state(state);
        }
    }

    /// Register an event. Ignored once the machine is active or when an event
    /// with the same name is already registered.
    pub fn add_event(&mut self, event: Event) {
        if self.active {
            tracing::trace!(event = event.name(), "machine is active, event ignored");
            return;
        }

        match self.events.entry(event.name().to_string()) {
            Entry::Occupied(_) => {
                tracing::trace!(event = event.name(), "event already registered");
            }
            Entry::Vacant(slot) => {
                slot.insert(event);
            }
        }
    }

    /// Register several events. Same rules as [`Machine::add_event`].
    pub fn add_events<I>(&mut self, events: I)
    where
        I: IntoIterator<Item = Event>,
    {
        for event in events {
            self.add_event(event);
        }
    }

    /// Registered state called `name`.
    pub fn lookup_state(&self, name: &str) -> Result<&State, LookupError> {
        self.states.get(name).ok_or_else(|| LookupError::state(name))
    }

    /// Registered event called `name`.
    pub fn lookup_event(&self, name: &str) -> Result<&Event, LookupError> {
        self.events.get(name).ok_or_else(|| LookupError::event(name))
    }

    /// Registered states, in no particular order.
    pub fn states(&self) -> impl Iterator<Item = &State> + '_ {
        self.states.values()
    }

    /// Registered events, in no particular order.
    pub fn events(&self) -> impl Iterator<Item = &Event> + '_ {
        self.events.values()
    }

    /// Number of registered states.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Number of registered events.
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Whether [`Machine::activate`] has been called.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The state entered on activation, replaced by its registered definition once active.
    pub fn initial_state(&self) -> &State {
        &self.initial_state
    }

    /// The state the machine is in. Before activation this is a placeholder
    /// that is never part of the registry.
    pub fn current_state(&self) -> &State {
        &self.current_state
    }

    /// Committed transitions, oldest first.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Whether the current state has the same name as `state`.
    pub fn is_in(&self, state: &State) -> bool {
        self.current_state == *state
    }

    /// Switch the machine on. Runs the initial state's enter hooks without a
    /// transition. Calling it again does nothing.
    pub fn activate(&mut self) {
        if self.active {
            return;
        }

        self.active = true;
        let initial = self.resolve(&self.initial_state);
        self.initial_state = initial.clone();

        initial.notify_before_enter(None);
        self.current_state = initial.clone();
        initial.notify_after_enter(None);

        tracing::info!(
            initial = initial.name(),
            states = self.states.len(),
            events = self.events.len(),
            "state machine activated"
        );
    }

    /// Whether `event` may be fired from the current state.
    pub fn can_fire(&self, event: &Event) -> bool {
        event.permits(&self.current_state)
    }

    /// Fire an event without context.
    pub fn fire(&mut self, event: &Event) -> Result<(), FireError> {
        self.fire_with(event, Payload::new())
    }

    /// Fire the registered event called `name`.
    pub fn fire_named(&mut self, name: &str, context: Payload) -> Result<(), FireError> {
        let event = self
            .events
            .get(name)
            .cloned()
            .ok_or_else(|| FireError::UnknownEvent {
                name: name.to_string(),
            })?;

        self.fire_with(&event, context)
    }

    /// Fire an event, passing `context` to every hook through the transition.
    ///
    /// Once the validation gate approves, hooks run in this order:
    ///
    /// 1. event `before_fire`
    /// 2. old state `before_exit`
    /// 3. event `after_fire`
    /// 4. old state `after_exit`
    /// 5. new state `before_enter`
    /// 6. the current state becomes the destination
    /// 7. new state `after_enter`
    ///
    /// A refused firing runs no hooks after the gate and leaves the machine
    /// unchanged.
    pub fn fire_with(&mut self, event: &Event, context: Payload) -> Result<(), FireError> {
        if !self.active {
            tracing::debug!(event = event.name(), "refused to fire, machine not activated");
            return Err(FireError::NotActivated);
        }

        if !self.can_fire(event) {
            tracing::debug!(
                event = event.name(),
                current = self.current_state.name(),
                "refused to fire, source state not permitted"
            );
            return Err(FireError::CannotFire {
                event: event.name().to_string(),
                current: self.current_state.name().to_string(),
                sources: event
                    .sources()
                    .iter()
                    .map(|state| state.name().to_string())
                    .collect(),
            });
        }

        let id = Uuid::new_v4();
        let old_state = self.current_state.clone();
        let new_state = self.resolve(event.destination());

        let transition = Transition::new(
            id,
            event,
            old_state.clone(),
            new_state.clone(),
            context,
            self,
        );
        if !event.approves(&transition) {
            tracing::debug!(
                transition = %id,
                event = event.name(),
                "refused to fire, declined by validation gate"
            );
            return Err(FireError::Declined {
                event: event.name().to_string(),
            });
        }

        event.notify_before_fire(&transition);
        old_state.notify_before_exit(Some(&transition));
        event.notify_after_fire(&transition);
        old_state.notify_after_exit(Some(&transition));
        new_state.notify_before_enter(Some(&transition));

        let context = transition.into_context();
        self.current_state = new_state.clone();
        self.history.record(TransitionRecord {
            id,
            event: event.name().to_string(),
            from: old_state.name().to_string(),
            to: new_state.name().to_string(),
            timestamp: Utc::now(),
        });

        tracing::debug!(
            transition = %id,
            event = event.name(),
            from = old_state.name(),
            to = new_state.name(),
            "transition committed"
        );

        let transition = Transition::new(id, event, old_state, new_state.clone(), context, self);
        new_state.notify_after_enter(Some(&transition));

        Ok(())
    }

    // The registered definition wins over copies embedded in events or
    // handed to `new`.
    fn resolve(&self, state: &State) -> State {
        self.states
            .get(state.name())
            .cloned()
            .unwrap_or_else(|| state.clone())
    }
}

impl fmt::Display for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "State Machine: {} States | {} Events | Current State: {}",
            self.states.len(),
            self.events.len(),
            self.current_state
        )
    }
}

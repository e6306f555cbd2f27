//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::builder::event::EventBuilder;
use crate::builder::state::StateBuilder;
use crate::core::{Event, State, DEFAULT_HISTORY_LIMIT};
use crate::machine::Machine;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Builder for constructing state machines with a fluent API.
///
/// The machine is returned inactive so callers can inspect it or register
/// more definitions before calling [`Machine::activate`].
///
/// # Example
///
/// ```rust
/// use krypton::builder::MachineBuilder;
/// use krypton::core::{Event, State};
///
/// let on = State::new("On").unwrap();
/// let off = State::new("Off").unwrap();
///
/// let mut machine = MachineBuilder::new()
///     .states([on.clone(), off.clone()])
///     .event(Event::new("Toggle-On", [off.clone()], on.clone()).unwrap())
///     .event(Event::new("Toggle-Off", [on.clone()], off.clone()).unwrap())
///     .initial(off.clone())
///     .build()
///     .unwrap();
///
/// machine.activate();
/// machine.fire_named("Toggle-On", Default::default()).unwrap();
/// assert!(machine.is_in(&on));
/// ```
pub struct MachineBuilder {
    states: Vec<State>,
    events: Vec<Event>,
    initial: Option<State>,
    history_limit: usize,
}

impl MachineBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            events: Vec::new(),
            initial: None,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Add a state.
    pub fn state(mut self, state: State) -> Self {
        self.states.push(state);
        self
    }

    /// Add several states at once.
    pub fn states<I>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = State>,
    {
        self.states.extend(states);
        self
    }

    /// Add a state using a builder.
    /// Returns an error if the builder fails validation.
    pub fn state_with(mut self, builder: StateBuilder) -> Result<Self, BuildError> {
        self.states.push(builder.build()?);
        Ok(self)
    }

    /// Add an event.
    pub fn event(mut self, event: Event) -> Self {
        self.events.push(event);
        self
    }

    /// Add several events at once.
    pub fn events<I>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = Event>,
    {
        self.events.extend(events);
        self
    }

    /// Add an event using a builder.
    /// Returns an error if the builder fails validation.
    pub fn event_with(mut self, builder: EventBuilder) -> Result<Self, BuildError> {
        self.events.push(builder.build()?);
        Ok(self)
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: State) -> Self {
        self.initial = Some(state);
        self
    }

    /// Maximum number of transitions the machine remembers. Zero disables
    /// the history.
    pub fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Build the machine, reporting every missing part together.
    pub fn build(self) -> Result<Machine, BuildError> {
        let checks: Vec<Validation<(), NonEmptyVec<String>>> = vec![
            require(!self.states.is_empty(), "No states defined. Add at least one state"),
            require(!self.events.is_empty(), "No events defined. Add at least one event"),
            require(
                self.initial.is_some(),
                "Initial state not specified. Call .initial(state) before .build()",
            ),
        ];

        if let Validation::Failure(reasons) = Validation::all_vec(checks) {
            return Err(BuildError::Declined {
                reasons: reasons.iter().cloned().collect(),
            });
        }

        let initial = self.initial.ok_or_else(|| BuildError::Declined {
            reasons: vec!["Initial state not specified".to_string()],
        })?;

        let mut machine = Machine::with_history_limit(initial, self.history_limit);
        machine.add_states(self.states);
        machine.add_events(self.events);

        Ok(machine)
    }
}

impl Default for MachineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn require(condition: bool, message: &str) -> Validation<(), NonEmptyVec<String>> {
    if condition {
        Validation::success(())
    } else {
        Validation::fail(message.to_string())
    }
}

//! Builder for constructing events.

use crate::builder::error::BuildError;
use crate::core::{DefinitionError, Event, EventHooks, Guard, State};
use crate::machine::Transition;
use std::collections::BTreeSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Caller-supplied constraint on an event's source set.
pub type SourceCheck =
    Box<dyn Fn(&BTreeSet<State>) -> Validation<(), NonEmptyVec<String>> + Send + Sync>;

/// Builder for events with a fluent API.
///
/// Every problem found by [`EventBuilder::build`] is reported at once: a
/// blank name, a missing destination and each failed source constraint end
/// up in the same `InvalidEvent` error.
///
/// # Example
///
/// ```rust
/// use krypton::builder::EventBuilder;
/// use krypton::core::State;
///
/// let armed = State::new("Armed").unwrap();
/// let alarm = State::new("Alarm").unwrap();
///
/// let breach = EventBuilder::new()
///     .name("Breach")
///     .source(armed)
///     .destination(alarm)
///     .require_sources(|sources| !sources.is_empty(), "Breach needs a source")
///     .build()
///     .unwrap();
///
/// assert_eq!(breach.to_string(), "Event `Breach` transitions from Armed to `Alarm`");
/// ```
#[derive(Default)]
pub struct EventBuilder {
    name: String,
    sources: BTreeSet<State>,
    destination: Option<State>,
    hooks: EventHooks,
    source_checks: Vec<SourceCheck>,
}

impl EventBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the event name (required, non-empty).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Add a permitted source state. With no sources the event is a wildcard.
    pub fn source(mut self, state: State) -> Self {
        self.sources.insert(state);
        self
    }

    pub fn sources<I>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = State>,
    {
        self.sources.extend(states);
        self
    }

    /// Set the destination state (required).
    pub fn destination(mut self, state: State) -> Self {
        self.destination = Some(state);
        self
    }

    /// Set the validation gate.
    pub fn guard(mut self, guard: Guard) -> Self {
        self.hooks = self.hooks.should_fire(guard);
        self
    }

    /// Set the validation gate from a closure.
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Event, &Transition<'_>) -> bool + Send + Sync + 'static,
    {
        self.hooks = self.hooks.when(predicate);
        self
    }

    pub fn before_fire<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Event, &Transition<'_>) + Send + Sync + 'static,
    {
        self.hooks = self.hooks.before_fire(hook);
        self
    }

    pub fn after_fire<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Event, &Transition<'_>) + Send + Sync + 'static,
    {
        self.hooks = self.hooks.after_fire(hook);
        self
    }

    /// Add a custom constraint on the source set.
    pub fn require<F>(mut self, check: F) -> Self
    where
        F: Fn(&BTreeSet<State>) -> Validation<(), NonEmptyVec<String>> + Send + Sync + 'static,
    {
        self.source_checks.push(Box::new(check));
        self
    }

    /// Add a predicate on the source set with the message reported when it fails.
    pub fn require_sources<F>(mut self, predicate: F, message: impl Into<String>) -> Self
    where
        F: Fn(&BTreeSet<State>) -> bool + Send + Sync + 'static,
    {
        let message = message.into();
        let check = move |sources: &BTreeSet<State>| {
            if predicate(sources) {
                Validation::success(())
            } else {
                Validation::fail(message.clone())
            }
        };
        self.source_checks.push(Box::new(check));
        self
    }

    /// Build the event, accumulating every validation failure.
    pub fn build(self) -> Result<Event, BuildError> {
        let mut checks: Vec<Validation<(), NonEmptyVec<String>>> = Vec::new();

        checks.push(if self.name.is_empty() {
            Validation::fail("The event name cannot be blank".to_string())
        } else {
            Validation::success(())
        });

        checks.push(if self.destination.is_none() {
            Validation::fail("Destination state not specified".to_string())
        } else {
            Validation::success(())
        });

        for check in &self.source_checks {
            checks.push(check(&self.sources));
        }

        if let Validation::Failure(reasons) = Validation::all_vec(checks) {
            let reason = reasons
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(DefinitionError::InvalidEvent {
                name: self.name,
                reason,
            }
            .into());
        }

        let destination = self
            .destination
            .ok_or_else(|| DefinitionError::InvalidEvent {
                name: self.name.clone(),
                reason: "Destination state not specified".to_string(),
            })?;

        Ok(Event::with_hooks(
            self.name,
            self.sources,
            destination,
            self.hooks,
        )?)
    }
}

//! The in-flight record handed to every hook during a firing.

use super::engine::Machine;
use crate::core::{Event, Payload, State};
use std::fmt;
use uuid::Uuid;

/// One firing of an event, alive only for the duration of `Machine::fire`.
///
/// Hooks get a shared reference to the machine through
/// [`Transition::machine`], so they can inspect it but cannot fire on it
/// through the transition.
pub struct Transition<'m> {
    id: Uuid,
    event: &'m Event,
    source: State,
    destination: State,
    context: Payload,
    machine: &'m Machine,
}

impl<'m> Transition<'m> {
    pub(crate) fn new(
        id: Uuid,
        event: &'m Event,
        source: State,
        destination: State,
        context: Payload,
        machine: &'m Machine,
    ) -> Self {
        Self {
            id,
            event,
            source,
            destination,
            context,
            machine,
        }
    }

    /// Identifier of this firing, also stored in the history record.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The event being fired.
    pub fn event(&self) -> &'m Event {
        self.event
    }

    /// The state the machine was in when the firing began.
    pub fn source(&self) -> &State {
        &self.source
    }

    /// The state being entered. A registered definition with the
    /// destination's name takes the place of the event's embedded copy.
    pub fn destination(&self) -> &State {
        &self.destination
    }

    /// Caller data supplied for this firing.
    pub fn context(&self) -> &Payload {
        &self.context
    }

    /// Read-only view of the machine running this firing.
    pub fn machine(&self) -> &'m Machine {
        self.machine
    }

    pub(crate) fn into_context(self) -> Payload {
        self.context
    }
}

impl fmt::Debug for Transition<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("id", &self.id)
            .field("event", &self.event.name())
            .field("source", &self.source.name())
            .field("destination", &self.destination().name())
            .field("context", &self.context)
            .finish()
    }
}

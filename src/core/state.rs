//! State definitions.
//!
//! A state is an immutable named node the machine can occupy. Identity is the
//! name alone: two states with the same name are the same state, whatever
//! payload or hooks they carry. Cloning a state is cheap and every clone
//! shares one definition.

use super::error::DefinitionError;
use crate::machine::Transition;
use serde_json::{Map, Value};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

/// Arbitrary caller data attached to a state or to a single firing.
pub type Payload = Map<String, Value>;

/// Lifecycle hook on a state.
///
/// The transition is `None` only when the hook runs during activation.
pub type StateHook = Arc<dyn Fn(&State, Option<&Transition<'_>>) + Send + Sync>;

/// Name given to the placeholder a machine sits in before activation.
pub(crate) const PLACEHOLDER_NAME: &str = "Starting-State";

/// The four optional lifecycle hooks of a state.
///
/// # Example
///
/// ```rust
/// use krypton::core::{State, StateHooks};
///
/// let hooks = StateHooks::new()
///     .after_enter(|state, _transition| println!("entered {state}"))
///     .before_exit(|state, _transition| println!("leaving {state}"));
///
/// let idle = State::with("Idle", Default::default(), hooks).unwrap();
/// assert!(idle.hooks().after_enter.is_some());
/// assert!(idle.hooks().before_enter.is_none());
/// ```
#[derive(Clone, Default)]
pub struct StateHooks {
    pub before_enter: Option<StateHook>,
    pub after_enter: Option<StateHook>,
    pub before_exit: Option<StateHook>,
    pub after_exit: Option<StateHook>,
}

impl StateHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs before the machine moves into the state.
    pub fn before_enter<F>(mut self, hook: F) -> Self
    where
        F: Fn(&State, Option<&Transition<'_>>) + Send + Sync + 'static,
    {
        self.before_enter = Some(Arc::new(hook));
        self
    }

    /// Runs once the machine is in the state.
    pub fn after_enter<F>(mut self, hook: F) -> Self
    where
        F: Fn(&State, Option<&Transition<'_>>) + Send + Sync + 'static,
    {
        self.after_enter = Some(Arc::new(hook));
        self
    }

    /// Runs when a transition out of the state has been committed.
    pub fn before_exit<F>(mut self, hook: F) -> Self
    where
        F: Fn(&State, Option<&Transition<'_>>) + Send + Sync + 'static,
    {
        self.before_exit = Some(Arc::new(hook));
        self
    }

    /// Runs after the event's `after_fire`, before the new state is entered.
    pub fn after_exit<F>(mut self, hook: F) -> Self
    where
        F: Fn(&State, Option<&Transition<'_>>) + Send + Sync + 'static,
    {
        self.after_exit = Some(Arc::new(hook));
        self
    }
}

impl fmt::Debug for StateHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateHooks")
            .field("before_enter", &self.before_enter.is_some())
            .field("after_enter", &self.after_enter.is_some())
            .field("before_exit", &self.before_exit.is_some())
            .field("after_exit", &self.after_exit.is_some())
            .finish()
    }
}

struct StateDefinition {
    name: String,
    payload: Payload,
    hooks: StateHooks,
}

/// A named node of a state machine.
///
/// # Example
///
/// ```rust
/// use krypton::core::State;
///
/// let armed = State::new("Armed").unwrap();
/// assert_eq!(armed.name(), "Armed");
/// assert_eq!(armed, State::from_name("Armed").unwrap());
///
/// // Blank names are refused.
/// assert!(State::new("").is_err());
/// assert!(State::from_name("").is_none());
/// ```
#[derive(Clone)]
pub struct State {
    inner: Arc<StateDefinition>,
}

impl State {
    /// Create a state with no payload and no hooks.
    pub fn new(name: impl Into<String>) -> Result<Self, DefinitionError> {
        Self::with(name, Payload::new(), StateHooks::default())
    }

    /// Create a state carrying a payload and lifecycle hooks.
    pub fn with(
        name: impl Into<String>,
        payload: Payload,
        hooks: StateHooks,
    ) -> Result<Self, DefinitionError> {
        let name = name.into();
        if name.is_empty() {
            return Err(DefinitionError::InvalidState);
        }

        Ok(Self::from_parts(name, payload, hooks))
    }

    /// Convenience constructor from a bare name. Returns `None` for a blank
    /// name instead of an error.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::new(name).ok()
    }

    pub(crate) fn placeholder() -> Self {
        Self::from_parts(
            PLACEHOLDER_NAME.to_string(),
            Payload::new(),
            StateHooks::default(),
        )
    }

    fn from_parts(name: String, payload: Payload, hooks: StateHooks) -> Self {
        State {
            inner: Arc::new(StateDefinition {
                name,
                payload,
                hooks,
            }),
        }
    }

    /// The state's unique name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Data attached to the state.
    pub fn payload(&self) -> &Payload {
        &self.inner.payload
    }

    /// Lifecycle hooks.
    pub fn hooks(&self) -> &StateHooks {
        &self.inner.hooks
    }

    pub(crate) fn notify_before_enter(&self, transition: Option<&Transition<'_>>) {
        if let Some(hook) = &self.inner.hooks.before_enter {
            hook(self, transition);
        }
    }

    pub(crate) fn notify_after_enter(&self, transition: Option<&Transition<'_>>) {
        if let Some(hook) = &self.inner.hooks.after_enter {
            hook(self, transition);
        }
    }

    pub(crate) fn notify_before_exit(&self, transition: Option<&Transition<'_>>) {
        if let Some(hook) = &self.inner.hooks.before_exit {
            hook(self, transition);
        }
    }

    pub(crate) fn notify_after_exit(&self, transition: Option<&Transition<'_>>) {
        if let Some(hook) = &self.inner.hooks.after_exit {
            hook(self, transition);
        }
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for State {}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name().cmp(other.name())
    }
}

// Eq, Ord and Hash all follow the name, so sets of states can be probed by name.
impl Borrow<str> for State {
    fn borrow(&self) -> &str {
        self.name()
    }
}

impl AsRef<str> for State {
    fn as_ref(&self) -> &str {
        self.name()
    }
}

impl FromStr for State {
    type Err = DefinitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("name", &self.inner.name)
            .field("payload", &self.inner.payload)
            .field("hooks", &self.inner.hooks)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::{BTreeSet, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    fn payload(key: &str, value: Value) -> Payload {
        let mut map = Payload::new();
        map.insert(key.to_string(), value);
        map
    }

    #[test]
    fn state_name_returns_correct_value() {
        let state = State::new("State A").unwrap();
        assert_eq!(state.name(), "State A");
        assert!(state.payload().is_empty());
    }

    #[test]
    fn blank_name_is_rejected() {
        assert_eq!(State::new("").unwrap_err(), DefinitionError::InvalidState);
        assert!(State::with("", Payload::new(), StateHooks::new()).is_err());
        assert!("".parse::<State>().is_err());
    }

    #[test]
    fn equality_ignores_payload_and_hooks() {
        let plain = State::new("Armed").unwrap();
        let decorated = State::with(
            "Armed",
            payload("zone", json!(3)),
            StateHooks::new().after_enter(|_, _| {}),
        )
        .unwrap();

        assert_eq!(plain, decorated);
        assert_ne!(plain, State::new("Disarmed").unwrap());
    }

    #[test]
    fn hash_follows_name() {
        let set: HashSet<State> = [
            State::new("A").unwrap(),
            State::with("A", payload("k", json!("v")), StateHooks::new()).unwrap(),
        ]
        .into_iter()
        .collect();

        assert_eq!(set.len(), 1);
    }

    #[test]
    fn ordering_is_lexicographic_by_name() {
        let set: BTreeSet<State> = ["Gamma", "Alpha", "Beta"]
            .iter()
            .map(|name| State::new(*name).unwrap())
            .collect();

        let names: Vec<&str> = set.iter().map(State::name).collect();
        assert_eq!(names, vec!["Alpha", "Beta", "Gamma"]);
        assert!(set.contains("Beta"));
    }

    #[test]
    fn string_round_trip() {
        let state: State = "Disarmed".parse().unwrap();
        assert_eq!(state.to_string(), "Disarmed");
        assert_eq!(state.as_ref(), "Disarmed");
        assert_eq!(State::from_name(state.name()), Some(state));
    }

    #[test]
    fn clones_share_the_definition() {
        let state = State::with("Loaded", payload("size", json!(42)), StateHooks::new()).unwrap();
        let cloned = state.clone();

        assert!(Arc::ptr_eq(&state.inner, &cloned.inner));
        assert_eq!(cloned.payload().get("size"), Some(&json!(42)));
    }

    #[test]
    fn notify_runs_only_configured_hooks() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let state = State::with(
            "Counted",
            Payload::new(),
            StateHooks::new().before_enter(move |state, transition| {
                assert_eq!(state.name(), "Counted");
                assert!(transition.is_none());
                counter.fetch_add(1, AtomicOrdering::SeqCst);
            }),
        )
        .unwrap();

        state.notify_before_enter(None);
        state.notify_after_enter(None);
        state.notify_before_exit(None);
        state.notify_after_exit(None);

        assert_eq!(calls.load(AtomicOrdering::SeqCst), 1);
    }

    #[test]
    fn debug_lists_configured_hooks() {
        let state = State::with(
            "Debugged",
            Payload::new(),
            StateHooks::new().after_exit(|_, _| {}),
        )
        .unwrap();

        let rendered = format!("{state:?}");
        assert!(rendered.contains("\"Debugged\""));
        assert!(rendered.contains("after_exit: true"));
        assert!(rendered.contains("before_enter: false"));
    }
}

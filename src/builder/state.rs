//! Builder for constructing states.

use crate::builder::error::BuildError;
use crate::core::{Payload, State, StateHooks};
use crate::machine::Transition;
use serde_json::Value;

/// Builder for states with a fluent API.
///
/// # Example
///
/// ```rust
/// use krypton::builder::StateBuilder;
/// use serde_json::json;
///
/// let armed = StateBuilder::new()
///     .name("Armed")
///     .payload_entry("zone", json!("perimeter"))
///     .after_enter(|state, _| println!("{state} is live"))
///     .build()
///     .unwrap();
///
/// assert_eq!(armed.payload()["zone"], json!("perimeter"));
/// ```
#[derive(Default)]
pub struct StateBuilder {
    name: String,
    payload: Payload,
    hooks: StateHooks,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the state name (required, non-empty).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Replace the whole payload.
    pub fn payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    /// Add one payload entry.
    pub fn payload_entry(mut self, key: impl Into<String>, value: Value) -> Self {
        self.payload.insert(key.into(), value);
        self
    }

    pub fn before_enter<F>(mut self, hook: F) -> Self
    where
        F: Fn(&State, Option<&Transition<'_>>) + Send + Sync + 'static,
    {
        self.hooks = self.hooks.before_enter(hook);
        self
    }

    pub fn after_enter<F>(mut self, hook: F) -> Self
    where
        F: Fn(&State, Option<&Transition<'_>>) + Send + Sync + 'static,
    {
        self.hooks = self.hooks.after_enter(hook);
        self
    }

    pub fn before_exit<F>(mut self, hook: F) -> Self
    where
        F: Fn(&State, Option<&Transition<'_>>) + Send + Sync + 'static,
    {
        self.hooks = self.hooks.before_exit(hook);
        self
    }

    pub fn after_exit<F>(mut self, hook: F) -> Self
    where
        F: Fn(&State, Option<&Transition<'_>>) + Send + Sync + 'static,
    {
        self.hooks = self.hooks.after_exit(hook);
        self
    }

    /// Build the state.
    pub fn build(self) -> Result<State, BuildError> {
        Ok(State::with(self.name, self.payload, self.hooks)?)
    }
}

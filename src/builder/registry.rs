//! Builder for constructing registries.

use crate::builder::error::BuildError;
use crate::core::{Command, CommandDef, Outcome, State};
use crate::machine::{HandlerError, Machine};
use crate::registry::Registry;
use stillwater::validation::Validation;

/// Builder for constructing registries with a fluent API.
pub struct RegistryBuilder<T, Env = ()> {
    registry: Registry<T, Env>,
}

impl<T, Env> RegistryBuilder<T, Env> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
        }
    }

    /// Register a state and its ancestors.
    pub fn state(mut self, state: &State) -> Self {
        self.registry.register_state(state);
        self
    }

    /// Register several states at once.
    pub fn states<'a>(mut self, states: impl IntoIterator<Item = &'a State>) -> Self {
        for state in states {
            self.registry.register_state(state);
        }
        self
    }

    /// Bind a command handler to a state.
    pub fn command<F>(mut self, state: &State, def: CommandDef, handler: F) -> Self
    where
        F: Fn(&Env, &mut Machine<'_, T, Env>, &Command) -> Result<Outcome, HandlerError>
            + Send
            + Sync
            + 'static,
    {
        self.registry.register_command(state, def, handler);
        self
    }

    /// Build the registry, keeping last-write-wins semantics for duplicates.
    pub fn build(self) -> Registry<T, Env> {
        self.registry
    }

    /// Build the registry, failing if validation reports any problem.
    pub fn build_checked(self) -> Result<Registry<T, Env>, BuildError> {
        match self.registry.validate() {
            Validation::Success(_) => Ok(self.registry),
            Validation::Failure(errors) => Err(BuildError::Invalid(errors.iter().cloned().collect())),
        }
    }
}

impl<T, Env> Default for RegistryBuilder<T, Env> {
    fn default() -> Self {
        Self::new()
    }
}

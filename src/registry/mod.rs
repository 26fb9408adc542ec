//! State and command registry.
//!
//! The registry is the blueprint of a machine's behavior: it knows every
//! state by name and every `(state, command)` binding. Command lookup walks
//! from a state up through its ancestors, so a command bound on a parent is
//! available to all of its descendants unless a closer state shadows it.
//!
//! # Example
//!
//! ```rust
//! use hsmkit::core::{CommandDef, Outcome, State};
//! use hsmkit::registry::Registry;
//!
//! let root = State::root("Root");
//! let ready = root.child("Ready");
//!
//! let mut registry: Registry<u32> = Registry::new();
//! registry.register_state(&ready);
//! registry.register_command(&root, CommandDef::new("hello"), |_, _, _| {
//!     Ok(Outcome::text("hello from Root"))
//! });
//!
//! assert!(registry.get_state_by_name("Root").is_some());
//! assert!(registry.find_command(&ready, "hello").is_some());
//! assert_eq!(registry.find_available_commands(&ready).len(), 1);
//! ```

pub mod validation;

pub use validation::RegistryViolation;

use crate::core::{Command, CommandDef, Outcome, State};
use crate::machine::{HandlerError, Machine};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::{debug, warn};

/// Signature of a command handler.
///
/// Handlers receive the environment passed to
/// [`Machine::execute`](crate::machine::Machine::execute), the machine itself
/// (for reading and mutating its data) and the command being run.
pub type Handler<T, Env = ()> = Arc<
    dyn Fn(&Env, &mut Machine<'_, T, Env>, &Command) -> Result<Outcome, HandlerError>
        + Send
        + Sync,
>;

/// A command's metadata paired with its handler.
pub struct RegisteredCommand<T, Env = ()> {
    pub def: CommandDef,
    pub handler: Handler<T, Env>,
}

impl<T, Env> Clone for RegisteredCommand<T, Env> {
    fn clone(&self) -> Self {
        Self {
            def: self.def.clone(),
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<T, Env> fmt::Debug for RegisteredCommand<T, Env> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredCommand")
            .field("def", &self.def)
            .finish_non_exhaustive()
    }
}

/// Table of known states and their command bindings.
pub struct Registry<T, Env = ()> {
    states: HashMap<String, State>,
    commands: HashMap<String, HashMap<String, RegisteredCommand<T, Env>>>,
    diagnostics: Vec<RegistryViolation>,
}

impl<T, Env> Registry<T, Env> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
            commands: HashMap::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Register a state together with every ancestor not yet known.
    ///
    /// Registering a state whose name is already present is a no-op and
    /// stops the walk, since its ancestors were registered with it.
    pub fn register_state(&mut self, state: &State) {
        for node in state.ancestors() {
            if let Some(known) = self.states.get(node.name()) {
                if !known.same_node(node) {
                    warn!(state = node.name(), "state name already taken by another node");
                    self.diagnostics.push(RegistryViolation::ConflictingState {
                        name: node.name().to_string(),
                    });
                }
                break;
            }
            debug!(
                state = node.name(),
                parent = ?node.parent().map(State::name),
                "registering state"
            );
            self.states.insert(node.name().to_string(), node.clone());
        }
    }

    /// Bind a command to a state.
    ///
    /// A second binding for the same `(state, command)` pair replaces the
    /// first. The overwrite is recorded and surfaces in [`Registry::validate`].
    pub fn register_command<F>(&mut self, state: &State, def: CommandDef, handler: F)
    where
        F: Fn(&Env, &mut Machine<'_, T, Env>, &Command) -> Result<Outcome, HandlerError>
            + Send
            + Sync
            + 'static,
    {
        self.register_handler(state, def, Arc::new(handler));
    }

    /// Bind an already shared handler to a state.
    pub fn register_handler(&mut self, state: &State, def: CommandDef, handler: Handler<T, Env>) {
        let bindings = self.commands.entry(state.name().to_string()).or_default();
        let command = def.name.clone();
        if bindings.contains_key(&command) {
            warn!(
                state = state.name(),
                command = %command,
                "command registered twice; last registration wins"
            );
            self.diagnostics.push(RegistryViolation::DuplicateCommand {
                state: state.name().to_string(),
                command: command.clone(),
            });
        } else {
            debug!(state = state.name(), command = %command, "registering command");
        }
        bindings.insert(command, RegisteredCommand { def, handler });
    }

    /// Look up a registered state by name.
    pub fn get_state_by_name(&self, name: &str) -> Option<&State> {
        self.states.get(name)
    }

    pub fn contains_state(&self, name: &str) -> bool {
        self.states.contains_key(name)
    }

    /// Names of all registered states, sorted.
    pub fn state_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.states.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Resolve a command by walking from `state` up to its root.
    ///
    /// The first state in the chain (starting with `state` itself) that binds
    /// `command` wins, so closer bindings shadow ancestor ones.
    pub fn find_command(&self, state: &State, command: &str) -> Option<&RegisteredCommand<T, Env>> {
        state
            .ancestors()
            .find_map(|s| self.commands.get(s.name())?.get(command))
    }

    pub(crate) fn find_command_handler(
        &self,
        state: &State,
        command: &str,
    ) -> Option<&Handler<T, Env>> {
        self.find_command(state, command).map(|bound| &bound.handler)
    }

    /// Every command visible from `state`, sorted by name.
    ///
    /// Each name appears once, described by its closest binding.
    pub fn find_available_commands(&self, state: &State) -> Vec<CommandDef> {
        let mut visible: BTreeMap<&str, &CommandDef> = BTreeMap::new();
        for s in state.ancestors() {
            let Some(bindings) = self.commands.get(s.name()) else {
                continue;
            };
            for (name, bound) in bindings {
                visible.entry(name.as_str()).or_insert(&bound.def);
            }
        }
        visible.into_values().cloned().collect()
    }

    /// Report every setup problem at once.
    ///
    /// Succeeds when no command was overwritten, every state carrying
    /// commands is registered, and no two nodes share a name.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<RegistryViolation>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<RegistryViolation>>> = self
            .diagnostics
            .iter()
            .cloned()
            .map(|violation| Validation::fail(violation))
            .collect();

        let mut unregistered: Vec<&String> = self
            .commands
            .keys()
            .filter(|name| !self.states.contains_key(*name))
            .collect();
        unregistered.sort();
        for state in unregistered {
            checks.push(Validation::fail(RegistryViolation::UnregisteredState {
                state: state.clone(),
            }));
        }

        Validation::all_vec(checks).map(|_| ())
    }
}

impl<T, Env> Default for Registry<T, Env> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, Env> fmt::Debug for Registry<T, Env> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let commands: BTreeMap<&str, Vec<&str>> = self
            .commands
            .iter()
            .map(|(state, bindings)| {
                let mut names: Vec<&str> = bindings.keys().map(String::as_str).collect();
                names.sort_unstable();
                (state.as_str(), names)
            })
            .collect();
        f.debug_struct("Registry")
            .field("states", &self.state_names())
            .field("commands", &commands)
            .finish()
    }
}

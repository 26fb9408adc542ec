//! Machine runtime.
//!
//! A [`Machine`] holds the current state, the cached path from the root to
//! that state, the typed data payload and a borrowed [`Registry`]. Each call
//! to [`Machine::execute`] resolves one command through the registry, runs
//! its handler and applies at most one transition.
//!
//! # Example
//!
//! ```rust
//! use hsmkit::core::{Command, CommandDef, Outcome, State};
//! use hsmkit::machine::Machine;
//! use hsmkit::registry::Registry;
//!
//! let root = State::root("Root");
//! let ready = root.child("Ready");
//!
//! let mut registry: Registry<u32> = Registry::new();
//! registry.register_state(&ready);
//! registry.register_command(&ready, CommandDef::new("inc"), |_, machine, _| {
//!     *machine.data_mut() += 1;
//!     Ok(Outcome::text(format!("Count is now: {}", machine.data())))
//! });
//!
//! let mut machine = Machine::new(&registry, &ready, 0);
//! let output = machine.execute(&(), &Command::bare("inc")).unwrap();
//!
//! assert_eq!(output, "Count is now: 1");
//! assert_eq!(*machine.data(), 1);
//! assert_eq!(machine.snapshot().current_state_name, "Ready");
//! ```

pub mod error;

pub use error::{BoxError, HandlerError, MachineError};

use crate::checkpoint::{CheckpointError, Snapshot, SnapshotStore};
use crate::core::{Command, CommandDef, State};
use crate::registry::Registry;
use tracing::{debug, info, warn};

/// Runtime aggregate of a hierarchical state machine.
pub struct Machine<'r, T, Env = ()> {
    registry: &'r Registry<T, Env>,
    current: State,
    path: Vec<State>,
    data: T,
}

impl<'r, T, Env> Machine<'r, T, Env> {
    /// Create a machine in `initial_state`.
    ///
    /// The state does not have to be registered; its path comes from parent
    /// links alone.
    pub fn new(registry: &'r Registry<T, Env>, initial_state: &State, initial_data: T) -> Self {
        Self {
            registry,
            current: initial_state.clone(),
            path: initial_state.path(),
            data: initial_data,
        }
    }

    /// Restore a machine from a snapshot.
    ///
    /// Fails with [`MachineError::StateNotFound`] when the snapshot's state
    /// name is not registered.
    pub fn from_snapshot(
        registry: &'r Registry<T, Env>,
        snapshot: Snapshot<T>,
    ) -> Result<Self, MachineError> {
        let Snapshot {
            current_state_name,
            data,
        } = snapshot;
        let state = registry
            .get_state_by_name(&current_state_name)
            .ok_or(MachineError::StateNotFound {
                name: current_state_name,
            })?;
        debug!(state = state.name(), "restored machine from snapshot");
        Ok(Self::new(registry, state, data))
    }

    /// Restore from `store`, or start fresh if nothing has been stored yet.
    ///
    /// Only a missing snapshot falls back to `initial_state`; unreadable or
    /// malformed snapshots and unknown state names are errors.
    pub fn restore_or_new<S>(
        registry: &'r Registry<T, Env>,
        store: &S,
        initial_state: &State,
        initial_data: impl FnOnce() -> T,
    ) -> Result<Self, MachineError>
    where
        S: SnapshotStore<T> + ?Sized,
    {
        match store.load() {
            Ok(snapshot) => Self::from_snapshot(registry, snapshot),
            Err(CheckpointError::NotFound { location }) => {
                debug!(%location, state = initial_state.name(), "no snapshot stored; starting fresh");
                Ok(Self::new(registry, initial_state, initial_data()))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Run one command against the current state.
    ///
    /// The handler is found by walking up from the current state. When none
    /// exists, nothing changes and [`MachineError::CommandNotAvailable`] is
    /// returned. Handler failures are returned with their partial output and
    /// without a transition; data changes the handler already made are kept.
    /// On success the machine moves to the returned next state if its name
    /// differs from the current one.
    pub fn execute(&mut self, env: &Env, command: &Command) -> Result<String, MachineError> {
        let registry = self.registry;
        let Some(handler) = registry.find_command_handler(&self.current, command.name()) else {
            warn!(
                command = command.name(),
                state = self.current.name(),
                "command not available"
            );
            return Err(MachineError::CommandNotAvailable {
                command: command.name().to_string(),
                state: self.current.name().to_string(),
            });
        };

        debug!(
            command = command.name(),
            args = ?command.args(),
            state = self.current.name(),
            "executing command"
        );
        let outcome = handler(env, self, command).map_err(|err| {
            let (output, source) = err.into_parts();
            warn!(command = command.name(), error = %source, "command failed");
            MachineError::Handler {
                command: command.name().to_string(),
                output,
                source,
            }
        })?;

        if let Some(next) = outcome.next_state {
            if next.name() != self.current.name() {
                self.transition_to(&next);
            }
        }
        Ok(outcome.output)
    }

    /// Move to `state` unconditionally, recomputing the cached path.
    pub fn transition_to(&mut self, state: &State) {
        info!(from = self.current.name(), to = state.name(), "state transition");
        self.path = state.path();
        self.current = state.clone();
    }

    pub fn current_state(&self) -> &State {
        &self.current
    }

    /// States from the root down to the current state.
    pub fn state_path(&self) -> &[State] {
        &self.path
    }

    /// True if `state` is the current state or one of its ancestors.
    pub fn is_in(&self, state: &State) -> bool {
        self.path.iter().any(|s| s.name() == state.name())
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut T {
        &mut self.data
    }

    /// Replace the data payload, returning the old one.
    pub fn replace_data(&mut self, data: T) -> T {
        std::mem::replace(&mut self.data, data)
    }

    pub fn registry(&self) -> &'r Registry<T, Env> {
        self.registry
    }

    /// Commands available in the current state, sorted by name.
    pub fn available_commands(&self) -> Vec<CommandDef> {
        self.registry.find_available_commands(&self.current)
    }

    /// Persistable form of the machine: current state name plus a copy of
    /// the data.
    pub fn snapshot(&self) -> Snapshot<T>
    where
        T: Clone,
    {
        Snapshot {
            current_state_name: self.current.name().to_string(),
            data: self.data.clone(),
        }
    }

    /// Consume the machine into its persistable form.
    pub fn into_snapshot(self) -> Snapshot<T> {
        Snapshot {
            current_state_name: self.current.name().to_string(),
            data: self.data,
        }
    }
}

//! Registry diagnostics.
//!
//! Registration never fails. Problems are recorded as they happen and
//! reported together by [`Registry::validate`](super::Registry::validate).

use thiserror::Error;

/// A problem detected in a registry's setup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryViolation {
    /// The same command name was bound twice on one state; the later binding won.
    #[error("command '{command}' registered more than once on state '{state}'")]
    DuplicateCommand { state: String, command: String },

    /// Commands are bound to a state that was never registered.
    #[error("commands bound to unregistered state '{state}'")]
    UnregisteredState { state: String },

    /// Two distinct nodes share one name; the first registration was kept.
    #[error("state name '{name}' used by two different nodes")]
    ConflictingState { name: String },
}

//! Core value types of the hierarchical state machine.
//!
//! - [`State`]: immutable named node with an optional parent
//! - [`Command`]: a named instruction with positional arguments
//! - [`CommandDef`]: help metadata for a registered command
//! - [`Outcome`]: output text plus optional next state returned by a handler
//!
//! Nothing in this module holds behavior; handlers live in the
//! [`Registry`](crate::registry::Registry).

mod command;
mod state;

pub use command::{Command, CommandDef, Outcome};
pub use state::{Ancestors, State};

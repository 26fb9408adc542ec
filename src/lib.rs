//! hsmkit: a small hierarchical state machine for stateful CLI tools
//!
//! Each invocation of a non-interactive program restores a machine from a
//! stored snapshot, runs exactly one command and saves the new snapshot.
//! hsmkit keeps behavior and information apart:
//!
//! - **State**: an immutable node in a hierarchy. Which state the machine is
//!   in decides which commands are available.
//! - **Data**: a user-defined, serializable payload that handlers mutate.
//!
//! Commands bound on a state are inherited by all of its descendants unless
//! a closer state binds the same name.
//!
//! # Core Concepts
//!
//! - [`core`]: states, commands, command metadata and handler outcomes
//! - [`registry`]: state table, command bindings and hierarchical lookup
//! - [`machine`]: runtime that dispatches commands and applies transitions
//! - [`checkpoint`]: snapshots and the stores that persist them
//!
//! # Example
//!
//! ```rust
//! use hsmkit::checkpoint::{MemoryStore, SnapshotFormat, SnapshotStore};
//! use hsmkit::core::{Command, CommandDef, Outcome, State};
//! use hsmkit::machine::Machine;
//! use hsmkit::registry::Registry;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
//! struct CounterData {
//!     count: u32,
//! }
//!
//! let root = State::root("Root");
//! let ready = root.child("Ready");
//!
//! let mut registry: Registry<CounterData> = Registry::new();
//! registry.register_state(&ready);
//! registry.register_command(&ready, CommandDef::new("inc"), |_, m, _| {
//!     m.data_mut().count += 1;
//!     Ok(Outcome::text(format!("Count is now: {}", m.data().count)))
//! });
//!
//! let store = MemoryStore::new(SnapshotFormat::Json);
//! for _ in 0..2 {
//!     let mut machine =
//!         Machine::restore_or_new(&registry, &store, &ready, CounterData::default).unwrap();
//!     machine.execute(&(), &Command::bare("inc")).unwrap();
//!     store.save(&machine.snapshot()).unwrap();
//! }
//!
//! let snapshot = SnapshotStore::<CounterData>::load(&store).unwrap();
//! assert_eq!(snapshot.data.count, 2);
//! ```

pub mod builder;
pub mod checkpoint;
pub mod cli;
pub mod core;
pub mod logging;
pub mod machine;
pub mod registry;

// Re-export commonly used types
pub use builder::RegistryBuilder;
pub use checkpoint::{Snapshot, SnapshotFormat, SnapshotStore};
pub use crate::core::{Command, CommandDef, Outcome, State};
pub use machine::{HandlerError, Machine, MachineError};
pub use registry::Registry;

//! Builder API for ergonomic registry construction.
//!
//! [`RegistryBuilder`] chains state and command registration and offers a
//! checked build that refuses registries with setup problems (overwritten
//! commands, commands on unregistered states, clashing state names).
//!
//! # Example
//!
//! ```
//! use hsmkit::builder::RegistryBuilder;
//! use hsmkit::core::{CommandDef, Outcome, State};
//!
//! let root = State::root("Root");
//! let ready = root.child("Ready");
//!
//! let registry = RegistryBuilder::<u32>::new()
//!     .state(&ready)
//!     .command(&ready, CommandDef::new("inc"), |_, m, _| {
//!         *m.data_mut() += 1;
//!         Ok(Outcome::text(format!("Count is now: {}", m.data())))
//!     })
//!     .build_checked()
//!     .unwrap();
//!
//! assert!(registry.contains_state("Root"));
//! ```

pub mod error;
pub mod registry;

pub use error::BuildError;
pub use registry::RegistryBuilder;

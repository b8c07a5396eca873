//! Stated: a declarative finite state machine
//!
//! A machine is described by a static [`StateTable`]: named states, each with
//! a value, the actions leading out of it, and optional guards and hooks.
//! The [`Machine`] interprets that table, validating and committing
//! transitions, keeping an undo/redo history and notifying listeners.
//!
//! # Core Concepts
//!
//! - **State**: a named node bundling a value, actions, guards and hooks
//! - **Action**: a named edge from the current state to a destination
//! - **Guards**: `can_leave`/`can_enter` predicates that veto forward transitions
//! - **Hooks**: `on_leave`/`on_enter` callbacks fired around each commit
//! - **History**: the linear log of committed `(state, value)` snapshots
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use stated::{Machine, StateDef, StateTable};
//!
//! let table = StateTable::new()
//!     .initial("water")
//!     .state(
//!         "water",
//!         StateDef::new(json!("60F"))
//!             .action("FROZEN", "ice")
//!             .action("BOILED", "steam"),
//!     )
//!     .state(
//!         "ice",
//!         StateDef::new(json!("32F"))
//!             .action("BOILED", "steam")
//!             .action("WARMED", "initial"),
//!     )
//!     .state(
//!         "steam",
//!         StateDef::new(json!({ "temp": "212F" }))
//!             .action("COOLED", "initial")
//!             .action("FROZEN", "ice"),
//!     );
//!
//! let mut machine = Machine::new(table, true).unwrap();
//! assert_eq!(machine.value(), Some(&json!("60F")));
//!
//! machine.to("FROZEN").unwrap();
//! machine.to("BOILED").unwrap();
//! machine.undo();
//! assert_eq!(machine.state(), Some("ice"));
//!
//! machine.redo();
//! assert_eq!(machine.state(), Some("steam"));
//! ```

pub mod builder;
pub mod core;
pub mod engine;

// Re-export commonly used types
pub use crate::builder::{MachineBuilder, MachineConfig};
pub use crate::core::{Guard, History, Hook, Snapshot, StateDef, StateTable, TableError};
pub use crate::engine::{ListenerId, Machine, MachineError, TransitionOutcome};

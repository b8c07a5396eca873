//! Core state table types.
//!
//! This module contains the data the engine interprets:
//! - State definitions with their actions, guards and hooks
//! - The state table and its up-front validation
//! - The undo/redo history buffer
//!
//! Nothing here drives transitions; that lives in [`crate::engine`].

mod guard;
mod history;
mod state;
mod table;

pub use guard::{Guard, Hook};
pub use history::{History, Snapshot};
pub use state::StateDef;
pub use table::{StateTable, TableError, INITIAL};

pub(crate) use state::merge_value;

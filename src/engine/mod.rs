//! The transition engine that interprets a [`StateTable`](crate::core::StateTable).
//!
//! # Key Concepts
//!
//! - **Machine**: owns the table, the current state and the history cursor
//! - **Outcomes**: every transition attempt reports whether it committed or
//!   was vetoed by a guard
//! - **Listeners**: synchronous, in-order notification of committed transitions
//!
//! Everything runs to completion on the calling thread. A machine is `Send`
//! and `Sync`, but callers sharing one across threads must serialise access
//! themselves (for example behind a `Mutex`).

mod error;
mod events;
mod machine;

pub use error::MachineError;
pub use events::ListenerId;
pub use machine::{Machine, TransitionOutcome};

//! Errors surfaced by the engine.

use crate::core::TableError;
use thiserror::Error;

/// Errors that can occur when creating or driving a machine.
///
/// Every check runs before the machine mutates, so a returned error leaves
/// state, value and history untouched.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MachineError {
    #[error("Invalid machine configuration: {reason}")]
    Config { reason: String },

    #[error("'{action}' does not exist as an action of '{state}'")]
    UnknownAction { action: String, state: String },

    #[error("'{state}' does not exist")]
    UnknownState { state: String },

    #[error("No current state. Enter a state before updating its value")]
    NoCurrentState,

    #[error("State table failed validation with {} problem(s)", .0.len())]
    InvalidTable(Vec<TableError>),
}

impl MachineError {
    pub(crate) fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}

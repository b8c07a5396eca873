//! Builder for constructing machines.

use super::config::MachineConfig;
use crate::core::StateTable;
use crate::engine::{Machine, MachineError};

/// Builder for constructing a [`Machine`] with a fluent API.
pub struct MachineBuilder {
    table: StateTable,
    config: MachineConfig,
}

impl MachineBuilder {
    /// Create a builder for `table` with default configuration.
    pub fn new(table: StateTable) -> Self {
        Self {
            table,
            config: MachineConfig::default(),
        }
    }

    /// Record history for undo/redo.
    pub fn persistent(mut self, persistent: bool) -> Self {
        self.config.persistent = persistent;
        self
    }

    /// Cap the number of history entries.
    pub fn history_limit(mut self, limit: usize) -> Self {
        self.config.history_limit = Some(limit);
        self
    }

    /// Reject tables with dangling destinations at build time.
    pub fn strict(mut self, strict: bool) -> Self {
        self.config.strict = strict;
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the machine.
    /// Returns an error if the table is empty or the configuration invalid.
    pub fn build(self) -> Result<Machine, MachineError> {
        Machine::from_config(self.table, &self.config)
    }
}

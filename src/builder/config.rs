//! Machine configuration.

use crate::engine::MachineError;
use serde::{Deserialize, Serialize};

/// Options controlling how a machine records history and checks its table.
///
/// Every field has a default, so embedders can deserialize a partial
/// configuration from their own settings.
///
/// # Example
///
/// ```rust
/// use stated::builder::MachineConfig;
///
/// let config: MachineConfig =
///     serde_json::from_str(r#"{ "persistent": true, "history_limit": 100 }"#).unwrap();
///
/// assert!(config.persistent);
/// assert_eq!(config.history_limit, Some(100));
/// assert!(!config.strict);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Record every committed transition for undo/redo
    pub persistent: bool,

    /// Maximum number of history entries kept; oldest are evicted first
    pub history_limit: Option<usize>,

    /// Validate every action destination when the machine is built
    pub strict: bool,
}

impl MachineConfig {
    pub fn validate(&self) -> Result<(), MachineError> {
        if self.history_limit == Some(0) {
            return Err(MachineError::Config {
                reason: "history_limit must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

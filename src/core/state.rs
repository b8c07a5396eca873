//! State definitions: a value payload, outgoing actions, guards and hooks.

use super::guard::{Guard, Hook};
use crate::engine::Machine;
use serde_json::Value;

/// A single named node of the state table.
///
/// Actions are an explicit ordered list of `(action, destination)` pairs, so
/// nothing besides an action can ever be offered as one.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use stated::StateDef;
///
/// let water = StateDef::new(json!("60F"))
///     .action("FROZEN", "ice")
///     .action("BOILED", "steam");
///
/// assert_eq!(water.target("FROZEN"), Some("ice"));
/// assert_eq!(water.action_names().collect::<Vec<_>>(), vec!["FROZEN", "BOILED"]);
/// ```
#[derive(Debug, Default)]
pub struct StateDef {
    pub(crate) value: Value,
    actions: Vec<(String, String)>,
    pub(crate) on_enter: Option<Hook>,
    pub(crate) on_leave: Option<Hook>,
    pub(crate) can_enter: Option<Guard>,
    pub(crate) can_leave: Option<Guard>,
}

impl StateDef {
    /// Create a state holding `value` with no actions.
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    /// Add an action leading to `destination`.
    ///
    /// Redeclaring an action replaces its destination but keeps its position.
    pub fn action(mut self, name: impl Into<String>, destination: impl Into<String>) -> Self {
        let name = name.into();
        let destination = destination.into();
        match self.actions.iter_mut().find(|(action, _)| *action == name) {
            Some(entry) => entry.1 = destination,
            None => self.actions.push((name, destination)),
        }
        self
    }

    /// Hook run after this state is entered, once listeners have been
    /// notified. It observes the machine already in this state.
    pub fn on_enter<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Machine) + Send + Sync + 'static,
    {
        self.on_enter = Some(Hook::new(hook));
        self
    }

    /// Hook run before this state is left. It observes the machine still in
    /// this state.
    pub fn on_leave<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Machine) + Send + Sync + 'static,
    {
        self.on_leave = Some(Hook::new(hook));
        self
    }

    /// Guard evaluated against the machine before this state is entered.
    pub fn can_enter<F>(mut self, guard: F) -> Self
    where
        F: Fn(&Machine) -> bool + Send + Sync + 'static,
    {
        self.can_enter = Some(Guard::new(guard));
        self
    }

    /// Guard evaluated against the machine before this state is left.
    pub fn can_leave<F>(mut self, guard: F) -> Self
    where
        F: Fn(&Machine) -> bool + Send + Sync + 'static,
    {
        self.can_leave = Some(Guard::new(guard));
        self
    }

    /// The value currently held by this state.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Destination of `action`, if this state declares it.
    pub fn target(&self, action: &str) -> Option<&str> {
        self.actions
            .iter()
            .find(|(name, _)| name == action)
            .map(|(_, destination)| destination.as_str())
    }

    /// Declared `(action, destination)` pairs in declaration order.
    pub fn actions(&self) -> &[(String, String)] {
        &self.actions
    }

    /// Declared action names in declaration order.
    pub fn action_names(&self) -> impl Iterator<Item = &str> {
        self.actions.iter().map(|(name, _)| name.as_str())
    }

    /// A leaf declares no actions of its own.
    pub fn is_leaf(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Apply a value update to a slot.
///
/// An object update is shallow-merged field by field into an object slot;
/// anything else replaces the slot.
pub(crate) fn merge_value(slot: &mut Value, update: Value) {
    match update {
        Value::Object(patch) if slot.is_object() => {
            if let Value::Object(existing) = slot {
                existing.extend(patch);
            }
        }
        other => *slot = other,
    }
}

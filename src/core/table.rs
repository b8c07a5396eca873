//! The state table: every state the machine may occupy, plus the pointer to
//! the state it starts in.

use super::state::StateDef;
use serde_json::Value;
use std::collections::BTreeMap;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// Name of the conventional starting state.
pub const INITIAL: &str = "initial";

/// Problems found when validating a table up front.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TableError {
    #[error("Action '{action}' of '{state}' leads to unknown state '{target}'")]
    DanglingAction {
        state: String,
        action: String,
        target: String,
    },

    #[error("Initial state '{target}' does not exist")]
    DanglingInitial { target: String },
}

/// Mapping from state name to definition.
///
/// Two starting shapes are supported: a state literally named `"initial"`,
/// or an `initial` pointer naming another state. The pointer wins when both
/// are present.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use stated::{StateDef, StateTable};
///
/// let table = StateTable::new()
///     .initial("water")
///     .state("water", StateDef::new(json!("60F")).action("FROZEN", "ice"))
///     .state("ice", StateDef::new(json!("32F")).action("WARMED", "initial"));
///
/// assert_eq!(table.initial_state(), Some("water"));
/// assert_eq!(table.resolve("initial"), Some("water"));
/// assert!(table.validate().is_success());
/// ```
#[derive(Debug, Default)]
pub struct StateTable {
    states: BTreeMap<String, StateDef>,
    initial: Option<String>,
}

impl StateTable {
    /// Create an empty table with no initial pointer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a state.
    pub fn state(mut self, name: impl Into<String>, definition: StateDef) -> Self {
        self.insert(name, definition);
        self
    }

    /// Point the table's starting state at another state.
    pub fn initial(mut self, name: impl Into<String>) -> Self {
        self.initial = Some(name.into());
        self
    }

    /// Add or replace a state in place, returning any previous definition.
    pub fn insert(&mut self, name: impl Into<String>, definition: StateDef) -> Option<StateDef> {
        self.states.insert(name.into(), definition)
    }

    pub(crate) fn set_initial(&mut self, name: &str) {
        self.initial = Some(name.to_string());
    }

    /// Number of states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Whether `name` is a state of this table.
    pub fn contains(&self, name: &str) -> bool {
        self.states.contains_key(name)
    }

    /// The definition of `name`, if it exists.
    pub fn get(&self, name: &str) -> Option<&StateDef> {
        self.states.get(name)
    }

    /// State names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(String::as_str)
    }

    /// The raw initial pointer, if one was set.
    pub fn initial_pointer(&self) -> Option<&str> {
        self.initial.as_deref()
    }

    /// The state the machine starts in, if the table names one that exists.
    pub fn initial_state(&self) -> Option<&str> {
        match self.initial.as_deref() {
            Some(target) => self.states.get_key_value(target).map(|(k, _)| k.as_str()),
            None => self
                .states
                .get_key_value(INITIAL)
                .map(|(k, _)| k.as_str()),
        }
    }

    /// Resolve a destination name to a state key.
    ///
    /// `"initial"` follows the initial pointer when no state carries that name.
    pub fn resolve<'a>(&'a self, name: &str) -> Option<&'a str> {
        if let Some((key, _)) = self.states.get_key_value(name) {
            return Some(key.as_str());
        }
        if name == INITIAL {
            return self.initial_state();
        }
        None
    }

    pub(crate) fn value_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.states.get_mut(name).map(|definition| &mut definition.value)
    }

    /// Check every action destination and the initial pointer, collecting
    /// all problems rather than stopping at the first.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<TableError>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<TableError>>> = Vec::new();

        if let Some(target) = &self.initial {
            let check = if self.states.contains_key(target) {
                Validation::success(())
            } else {
                Validation::fail(TableError::DanglingInitial {
                    target: target.clone(),
                })
            };
            checks.push(check);
        }

        for (state, definition) in &self.states {
            for (action, target) in definition.actions() {
                let check = if self.resolve(target).is_some() {
                    Validation::success(())
                } else {
                    Validation::fail(TableError::DanglingAction {
                        state: state.clone(),
                        action: action.clone(),
                        target: target.clone(),
                    })
                };
                checks.push(check);
            }
        }

        Validation::all_vec(checks).map(|_| ())
    }
}

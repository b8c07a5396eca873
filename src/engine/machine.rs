//! The transition engine.

use super::error::MachineError;
use super::events::{ListenerId, Listeners};
use crate::builder::{MachineBuilder, MachineConfig};
use crate::core::{merge_value, History, Snapshot, StateDef, StateTable, INITIAL};
use serde_json::Value;
use std::collections::BTreeMap;
use stillwater::validation::Validation;
use tracing::{debug, trace};

/// Whether a transition attempt changed the machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// State, value and history were updated and listeners notified
    Committed,
    /// A `can_leave` or `can_enter` guard refused; nothing changed
    Vetoed,
}

impl TransitionOutcome {
    /// `true` when the machine moved to the destination.
    pub fn is_committed(self) -> bool {
        matches!(self, Self::Committed)
    }

    /// `true` when a guard refused and nothing changed.
    pub fn is_vetoed(self) -> bool {
        matches!(self, Self::Vetoed)
    }
}

/// How a target state is being entered.
enum Commit {
    /// Caller-initiated: guarded, recorded, optional value update
    Forward(Option<Value>),
    /// Return to the initial state: unguarded, recorded
    Reset,
    /// Undo/redo: unguarded, not recorded, value restored from the snapshot
    Replay(Value),
}

impl Commit {
    fn is_guarded(&self) -> bool {
        matches!(self, Self::Forward(_))
    }

    fn records(&self) -> bool {
        !matches!(self, Self::Replay(_))
    }
}

/// A finite state machine driven by a [`StateTable`].
///
/// The machine owns its table. Each state's value lives in the table and is
/// updated in place when a transition carries an update or when
/// [`Machine::set_value`] is called.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use stated::{Machine, StateDef, StateTable};
///
/// let table = StateTable::new()
///     .initial("water")
///     .state(
///         "water",
///         StateDef::new(json!("60F"))
///             .action("FROZEN", "ice")
///             .action("BOILED", "steam"),
///     )
///     .state(
///         "ice",
///         StateDef::new(json!("32F"))
///             .action("BOILED", "steam")
///             .action("WARMED", "initial"),
///     )
///     .state(
///         "steam",
///         StateDef::new(json!({ "temp": "212F" })).action("COOLED", "initial"),
///     );
///
/// let mut machine = Machine::new(table, true).unwrap();
/// machine.to("FROZEN").unwrap();
/// assert_eq!(machine.state(), Some("ice"));
/// assert_eq!(machine.actions(), vec!["BOILED", "WARMED"]);
///
/// machine.to_with("BOILED", json!({ "state": "gas" })).unwrap();
/// assert_eq!(machine.value(), Some(&json!({ "temp": "212F", "state": "gas" })));
///
/// machine.undo();
/// assert_eq!(machine.state(), Some("ice"));
/// ```
#[derive(Debug)]
pub struct Machine {
    table: StateTable,
    state: Option<String>,
    history: History,
    persistent: bool,
    listeners: Listeners,
}

impl Machine {
    /// Create a machine in its initial state.
    ///
    /// With `persistent` set, the initial `(state, value)` pair is the first
    /// history entry.
    pub fn new(table: StateTable, persistent: bool) -> Result<Self, MachineError> {
        Self::builder(table).persistent(persistent).build()
    }

    /// Start configuring a machine for `table`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use serde_json::json;
    /// use stated::{Machine, StateDef, StateTable};
    ///
    /// let table = StateTable::new()
    ///     .initial("idle")
    ///     .state("idle", StateDef::new(json!(0)).action("START", "busy"))
    ///     .state("busy", StateDef::new(json!(1)).action("STOP", "idle"));
    ///
    /// let machine = Machine::builder(table)
    ///     .persistent(true)
    ///     .history_limit(16)
    ///     .strict(true)
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(machine.history().limit(), Some(16));
    /// ```
    pub fn builder(table: StateTable) -> MachineBuilder {
        MachineBuilder::new(table)
    }

    pub(crate) fn from_config(
        table: StateTable,
        config: &MachineConfig,
    ) -> Result<Self, MachineError> {
        config.validate()?;

        if table.is_empty() {
            return Err(MachineError::config(
                "state table must contain at least one state",
            ));
        }

        if config.strict {
            if let Validation::Failure(errors) = table.validate() {
                return Err(MachineError::InvalidTable(errors.iter().cloned().collect()));
            }
        }

        let history = match config.history_limit {
            Some(limit) => History::with_limit(limit),
            None => History::new(),
        };
        let state = table.initial_state().map(str::to_string);

        let mut machine = Self {
            table,
            state,
            history,
            persistent: config.persistent,
            listeners: Listeners::default(),
        };

        if machine.persistent {
            machine.record();
        }

        debug!(
            state = machine.state.as_deref().unwrap_or("none"),
            states = machine.table.len(),
            persistent = machine.persistent,
            "machine created"
        );

        Ok(machine)
    }

    /// Name of the current state. `None` until a state has been entered
    /// when the table has no initial state.
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    /// Value of the current state.
    pub fn value(&self) -> Option<&Value> {
        self.current_definition().map(StateDef::value)
    }

    /// Update the current state's value.
    ///
    /// Objects are shallow-merged into an object value; anything else
    /// replaces it. History is not touched.
    pub fn set_value(&mut self, update: impl Into<Value>) -> Result<(), MachineError> {
        let state = self.state.as_deref().ok_or(MachineError::NoCurrentState)?;
        let slot = self
            .table
            .value_mut(state)
            .ok_or(MachineError::NoCurrentState)?;
        merge_value(slot, update.into());
        Ok(())
    }

    /// Actions available from the current state.
    ///
    /// A state without actions, or no state at all, offers every state name
    /// so the machine can be navigated directly.
    pub fn actions(&self) -> Vec<&str> {
        match self.current_definition() {
            Some(definition) if !definition.is_leaf() => definition.action_names().collect(),
            _ => self.table.names().collect(),
        }
    }

    /// Destination of each available action.
    pub fn via(&self) -> BTreeMap<&str, &str> {
        match self.current_definition() {
            Some(definition) if !definition.is_leaf() => definition
                .actions()
                .iter()
                .map(|(action, target)| (action.as_str(), target.as_str()))
                .collect(),
            _ => self.table.names().map(|name| (name, name)).collect(),
        }
    }

    /// The table this machine interprets, including current values.
    pub fn states(&self) -> &StateTable {
        &self.table
    }

    /// Recorded snapshots and the undo/redo cursor.
    ///
    /// Empty unless the machine is persistent.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Whether committed transitions are recorded.
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// Turn history recording on or off. Recording starts with the next
    /// committed transition.
    pub fn set_persistent(&mut self, persistent: bool) {
        self.persistent = persistent;
    }

    /// Take `action` from the current state.
    ///
    /// An action the current state does not declare is tried as a literal
    /// state name. Returns [`TransitionOutcome::Vetoed`] when a guard
    /// refuses; the machine is then unchanged.
    pub fn to(&mut self, action: &str) -> Result<TransitionOutcome, MachineError> {
        self.dispatch(action, None)
    }

    /// Take `action` and apply `update` to the destination's value.
    pub fn to_with(
        &mut self,
        action: &str,
        update: impl Into<Value>,
    ) -> Result<TransitionOutcome, MachineError> {
        self.dispatch(action, Some(update.into()))
    }

    /// Return to the initial state. Guards are not consulted.
    pub fn reset(&mut self) -> Result<(), MachineError> {
        let target = match self.table.initial_state() {
            Some(target) => target.to_string(),
            None => {
                let state = self.table.initial_pointer().unwrap_or(INITIAL).to_string();
                debug!(state = %state, "reset without a resolvable initial state");
                return Err(MachineError::UnknownState { state });
            }
        };

        debug!(to = %target, "resetting machine");
        self.transition(target, Commit::Reset);
        Ok(())
    }

    /// Make `state` the initial state and enter it without consulting guards.
    pub fn set_initial(&mut self, state: &str) -> Result<(), MachineError> {
        let target = match self.table.resolve(state) {
            Some(target) => target.to_string(),
            None => {
                debug!(state, "initial state does not exist");
                return Err(MachineError::UnknownState {
                    state: state.to_string(),
                });
            }
        };

        self.table.set_initial(&target);
        self.transition(target, Commit::Reset);
        Ok(())
    }

    /// Step back one history entry. Returns `false` when there is nothing
    /// to undo or the machine is not persistent.
    pub fn undo(&mut self) -> bool {
        if !self.persistent {
            return false;
        }
        let Some(snapshot) = self.history.step_back().cloned() else {
            return false;
        };

        debug!(to = %snapshot.state, position = self.history.position(), "undo");
        self.transition(snapshot.state, Commit::Replay(snapshot.value));
        true
    }

    /// Step forward one history entry. Returns `false` when already at the
    /// newest entry or the machine is not persistent.
    pub fn redo(&mut self) -> bool {
        if !self.persistent {
            return false;
        }
        let Some(snapshot) = self.history.step_forward().cloned() else {
            return false;
        };

        debug!(to = %snapshot.state, position = self.history.position(), "redo");
        self.transition(snapshot.state, Commit::Replay(snapshot.value));
        true
    }

    /// Subscribe to committed transitions. Listeners run synchronously in
    /// subscription order and observe the post-commit machine.
    pub fn on_transition<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&Machine) + Send + Sync + 'static,
    {
        self.listeners.register(listener)
    }

    /// Remove a listener. Returns `false` if `id` was already removed.
    ///
    /// # Example
    ///
    /// ```rust
    /// use serde_json::json;
    /// use stated::{Machine, StateDef, StateTable};
    ///
    /// let table = StateTable::new()
    ///     .initial("a")
    ///     .state("a", StateDef::new(json!(1)).action("NEXT", "b"))
    ///     .state("b", StateDef::new(json!(2)).action("NEXT", "a"));
    /// let mut machine = Machine::new(table, false).unwrap();
    ///
    /// let id = machine.on_transition(|m| println!("now in {:?}", m.state()));
    /// assert!(machine.off_transition(id));
    /// assert!(!machine.off_transition(id));
    /// ```
    pub fn off_transition(&mut self, id: ListenerId) -> bool {
        self.listeners.unregister(id)
    }

    /// Number of subscribed listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn current_definition(&self) -> Option<&StateDef> {
        self.state.as_deref().and_then(|state| self.table.get(state))
    }

    fn dispatch(
        &mut self,
        action: &str,
        update: Option<Value>,
    ) -> Result<TransitionOutcome, MachineError> {
        let target = self.resolve_action(action)?.to_string();
        Ok(self.transition(target, Commit::Forward(update)))
    }

    fn resolve_action(&self, action: &str) -> Result<&str, MachineError> {
        match self.current_definition().and_then(|d| d.target(action)) {
            Some(destination) => self.table.resolve(destination).ok_or_else(|| {
                debug!(action, destination, "action leads to an unknown state");
                MachineError::UnknownState {
                    state: destination.to_string(),
                }
            }),
            None => self.table.resolve(action).ok_or_else(|| {
                let state = self.state.as_deref().unwrap_or("none").to_string();
                debug!(action, state = %state, "unknown action");
                MachineError::UnknownAction {
                    action: action.to_string(),
                    state,
                }
            }),
        }
    }

    fn guards_allow(&self, target: &str) -> bool {
        if let Some(guard) = self.current_definition().and_then(|d| d.can_leave.as_ref()) {
            if !guard.check(self) {
                trace!(from = ?self.state, to = target, "transition vetoed by can_leave");
                return false;
            }
        }
        if let Some(guard) = self.table.get(target).and_then(|d| d.can_enter.as_ref()) {
            if !guard.check(self) {
                trace!(from = ?self.state, to = target, "transition vetoed by can_enter");
                return false;
            }
        }
        true
    }

    fn transition(&mut self, target: String, commit: Commit) -> TransitionOutcome {
        if commit.is_guarded() && !self.guards_allow(&target) {
            return TransitionOutcome::Vetoed;
        }

        if let Some(hook) = self.current_definition().and_then(|d| d.on_leave.as_ref()) {
            hook.call(self);
        }

        let records = commit.records();
        let from = self.state.replace(target.clone());
        match commit {
            Commit::Forward(Some(update)) => {
                if let Some(slot) = self.table.value_mut(&target) {
                    merge_value(slot, update);
                }
            }
            Commit::Replay(value) => {
                if let Some(slot) = self.table.value_mut(&target) {
                    *slot = value;
                }
            }
            Commit::Forward(None) | Commit::Reset => {}
        }

        if records && self.persistent {
            self.record();
        }

        debug!(
            from = from.as_deref().unwrap_or("none"),
            to = %target,
            "transition committed"
        );

        self.listeners.emit(self);

        if let Some(hook) = self.table.get(&target).and_then(|d| d.on_enter.as_ref()) {
            hook.call(self);
        }

        TransitionOutcome::Committed
    }

    fn record(&mut self) {
        let Some(state) = self.state.clone() else {
            return;
        };
        let value = self.value().cloned().unwrap_or(Value::Null);
        self.history.record(Snapshot::new(state, value));
    }
}

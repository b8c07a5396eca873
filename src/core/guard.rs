//! Guard predicates and lifecycle hooks attached to states.
//!
//! Both receive the live [`Machine`] by shared reference. Guards and
//! `on_leave` hooks run before the transition commits and therefore see the
//! state being left; `on_enter` hooks run after the commit and see the
//! state being entered.

use crate::engine::Machine;
use std::fmt;

/// Predicate that may veto a transition before it commits.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use stated::{Machine, StateDef, StateTable};
///
/// let table = StateTable::new()
///     .initial("water")
///     .state("water", StateDef::new(json!("60F")).action("FROZEN", "ice"))
///     .state(
///         "ice",
///         StateDef::new(json!("32F")).can_enter(|m: &Machine| m.state() != Some("water")),
///     );
///
/// let mut machine = Machine::new(table, false).unwrap();
/// assert!(machine.to("FROZEN").unwrap().is_vetoed());
/// assert_eq!(machine.state(), Some("water"));
/// ```
pub struct Guard {
    predicate: Box<dyn Fn(&Machine) -> bool + Send + Sync>,
}

impl Guard {
    /// Create a guard from a predicate over the machine.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&Machine) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
        }
    }

    /// Evaluate the guard. `false` vetoes the transition.
    pub fn check(&self, machine: &Machine) -> bool {
        (self.predicate)(machine)
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}

/// Side-effecting callback fired when a state is entered or left.
pub struct Hook {
    callback: Box<dyn Fn(&Machine) + Send + Sync>,
}

impl Hook {
    /// Wrap a callback over the machine.
    ///
    /// # Example
    ///
    /// ```rust
    /// use serde_json::json;
    /// use stated::{Hook, Machine, StateDef, StateTable};
    ///
    /// let table = StateTable::new()
    ///     .initial("idle")
    ///     .state("idle", StateDef::new(json!(0)));
    /// let machine = Machine::new(table, false).unwrap();
    ///
    /// let log = Hook::new(|m: &Machine| println!("in {:?}", m.state()));
    /// log.call(&machine);
    /// ```
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&Machine) + Send + Sync + 'static,
    {
        Hook {
            callback: Box::new(callback),
        }
    }

    /// Run the callback against `machine`.
    pub fn call(&self, machine: &Machine) {
        (self.callback)(machine)
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Hook(..)")
    }
}

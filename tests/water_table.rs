//! End-to-end scenarios over the water/ice/steam table.

use serde_json::json;
use stated::{Machine, MachineError, StateDef, StateTable, TransitionOutcome};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn states() -> StateTable {
    StateTable::new()
        .initial("water")
        .state(
            "water",
            StateDef::new(json!("60F"))
                .action("FROZEN", "ice")
                .action("BOILED", "steam"),
        )
        .state(
            "ice",
            StateDef::new(json!("32F"))
                .action("BOILED", "steam")
                .action("WARMED", "initial"),
        )
        .state(
            "steam",
            StateDef::new(json!({ "temp": "212F" }))
                .action("COOLED", "initial")
                .action("FROZEN", "ice"),
        )
}

#[test]
fn newly_created_machine() {
    let machine = Machine::new(states(), false).unwrap();

    assert_eq!(machine.state(), machine.states().initial_state());
    assert_eq!(machine.value(), Some(&json!("60F")));
    assert_eq!(machine.actions(), vec!["FROZEN", "BOILED"]);
}

#[test]
fn transition_to_new_state() {
    let mut machine = Machine::new(states(), false).unwrap();

    let outcome = machine.to("FROZEN").unwrap();

    assert_eq!(outcome, TransitionOutcome::Committed);
    assert_eq!(machine.state(), Some("ice"));
    assert_eq!(machine.value(), Some(&json!("32F")));
    assert_eq!(machine.actions(), vec!["BOILED", "WARMED"]);
}

#[test]
fn reset_returns_to_initial_value() {
    let mut machine = Machine::new(states(), false).unwrap();
    machine.to("FROZEN").unwrap();
    machine.reset().unwrap();

    assert_eq!(machine.state(), Some("water"));
    assert_eq!(machine.value(), Some(&json!("60F")));
}

#[test]
fn reset_twice_matches_reset_once() {
    let mut machine = Machine::new(states(), false).unwrap();
    machine.to("BOILED").unwrap();

    machine.reset().unwrap();
    let once = (machine.state().map(str::to_string), machine.value().cloned());
    machine.reset().unwrap();
    let twice = (machine.state().map(str::to_string), machine.value().cloned());

    assert_eq!(once, twice);
}

#[test]
fn update_with_primitive_replaces_value() {
    let mut machine = Machine::new(states(), false).unwrap();
    machine.to_with("FROZEN", "75F").unwrap();

    assert_eq!(machine.value(), Some(&json!("75F")));
}

#[test]
fn update_with_object_merges_value() {
    let mut machine = Machine::new(states(), false).unwrap();
    machine.to("FROZEN").unwrap();
    machine.to_with("BOILED", json!({ "state": "gas" })).unwrap();

    assert_eq!(
        machine.value(),
        Some(&json!({ "temp": "212F", "state": "gas" }))
    );
}

#[test]
fn transition_listener_sees_committed_machine() {
    let seen = Arc::new(Mutex::new(None));
    let mut machine = Machine::new(states(), false).unwrap();
    let sink = Arc::clone(&seen);
    machine.on_transition(move |m| {
        *sink.lock().unwrap() = Some((
            m.state().unwrap().to_string(),
            m.value().cloned().unwrap(),
            m.actions().contains(&"BOILED"),
        ));
    });

    machine.to_with("FROZEN", "75F").unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        Some(("ice".to_string(), json!("75F"), true))
    );
}

#[test]
fn persistent_machine_records_initial_state() {
    let machine = Machine::new(states(), true).unwrap();

    assert_eq!(machine.history().len(), 1);
    assert_eq!(machine.history().position(), 0);
    assert_eq!(machine.history().current().unwrap().state, "water");
}

#[test]
fn undo_moves_cursor_without_shrinking_history() {
    let mut machine = Machine::new(states(), true).unwrap();
    machine.to("FROZEN").unwrap();
    machine.to("BOILED").unwrap();
    assert_eq!(machine.history().len(), 3);

    assert!(machine.undo());

    assert_eq!(machine.state(), Some("ice"));
    assert_eq!(machine.history().position(), 1);
    assert_eq!(machine.history().len(), 3);
}

#[test]
fn redo_reapplies_undone_state() {
    let mut machine = Machine::new(states(), true).unwrap();
    machine.to("FROZEN").unwrap();
    machine.to_with("BOILED", json!({ "state": "gas" })).unwrap();
    machine.undo();

    assert!(machine.redo());

    assert_eq!(machine.state(), Some("steam"));
    assert_eq!(
        machine.value(),
        Some(&json!({ "temp": "212F", "state": "gas" }))
    );
    assert!(!machine.redo());
}

#[test]
fn undo_and_redo_stop_at_history_bounds() {
    let mut machine = Machine::new(states(), true).unwrap();

    assert!(!machine.undo());
    assert_eq!(machine.state(), Some("water"));
    assert!(!machine.redo());
    assert_eq!(machine.state(), Some("water"));
}

#[test]
fn new_transition_after_undo_discards_redo_branch() {
    let mut machine = Machine::new(states(), true).unwrap();
    machine.to("FROZEN").unwrap();
    machine.to("BOILED").unwrap();
    machine.undo();
    machine.to("WARMED").unwrap();

    assert!(!machine.redo());
    assert_eq!(machine.state(), Some("water"));
    assert_eq!(machine.history().path(), vec!["water", "ice", "water"]);
}

#[test]
fn hooks_receive_the_machine() {
    let left_from = Arc::new(Mutex::new(None));
    let entered_into = Arc::new(Mutex::new(None));
    let (leave_sink, enter_sink) = (Arc::clone(&left_from), Arc::clone(&entered_into));
    let table = StateTable::new()
        .initial("water")
        .state(
            "water",
            StateDef::new(json!("60F"))
                .action("FROZEN", "ice")
                .on_leave(move |m| {
                    *leave_sink.lock().unwrap() = m.state().map(str::to_string);
                }),
        )
        .state(
            "ice",
            StateDef::new(json!("32F")).on_enter(move |m| {
                *enter_sink.lock().unwrap() = m.value().cloned();
            }),
        );
    let mut machine = Machine::new(table, false).unwrap();

    machine.to("FROZEN").unwrap();

    assert_eq!(machine.state(), Some("ice"));
    assert_eq!(*left_from.lock().unwrap(), Some("water".to_string()));
    assert_eq!(*entered_into.lock().unwrap(), Some(json!("32F")));
}

#[test]
fn guards_receive_the_machine() {
    let checked = Arc::new(AtomicUsize::new(0));
    let (leave_count, enter_count) = (Arc::clone(&checked), Arc::clone(&checked));
    let table = StateTable::new()
        .initial("water")
        .state(
            "water",
            StateDef::new(json!("60F"))
                .action("FROZEN", "ice")
                .can_leave(move |m| {
                    leave_count.fetch_add(1, Ordering::SeqCst);
                    m.state() == Some("water")
                }),
        )
        .state(
            "ice",
            StateDef::new(json!("32F")).can_enter(move |m| {
                enter_count.fetch_add(1, Ordering::SeqCst);
                m.value() == Some(&json!("60F"))
            }),
        );
    let mut machine = Machine::new(table, false).unwrap();

    machine.to("FROZEN").unwrap();

    assert_eq!(machine.state(), Some("ice"));
    assert_eq!(checked.load(Ordering::SeqCst), 2);
}

#[test]
fn can_enter_is_ignored_at_creation_and_reset() {
    let table = StateTable::new()
        .initial("water")
        .state(
            "water",
            StateDef::new(json!("60F"))
                .action("FROZEN", "ice")
                .can_enter(|_| false),
        )
        .state("ice", StateDef::new(json!("32F")));
    let mut machine = Machine::new(table, false).unwrap();
    assert_eq!(machine.state(), Some("water"));

    machine.to("FROZEN").unwrap();
    machine.reset().unwrap();

    assert_eq!(machine.state(), Some("water"));
}

#[test]
fn can_leave_false_stops_transition() {
    let table = StateTable::new()
        .initial("water")
        .state(
            "water",
            StateDef::new(json!("60F"))
                .action("FROZEN", "ice")
                .can_leave(|_| false),
        )
        .state("ice", StateDef::new(json!("32F")));
    let mut machine = Machine::new(table, false).unwrap();

    let outcome = machine.to("FROZEN").unwrap();

    assert!(outcome.is_vetoed());
    assert_eq!(machine.state(), Some("water"));
}

#[test]
fn can_enter_false_stops_transition() {
    let entered = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&entered);
    let table = StateTable::new()
        .initial("water")
        .state("water", StateDef::new(json!("60F")).action("FROZEN", "ice"))
        .state(
            "ice",
            StateDef::new(json!("32F"))
                .can_enter(|_| false)
                .on_enter(move |_| flag.store(true, Ordering::SeqCst)),
        );
    let mut machine = Machine::new(table, false).unwrap();

    assert!(machine.to("FROZEN").unwrap().is_vetoed());
    assert_eq!(machine.state(), Some("water"));
    assert!(!entered.load(Ordering::SeqCst));
}

#[test]
fn leaf_state_navigates_to_any_state() {
    let table = StateTable::new()
        .initial("water")
        .state("water", StateDef::new(json!("60F")))
        .state("ice", StateDef::new(json!("32F")).can_leave(|_| false));
    let mut machine = Machine::new(table, false).unwrap();

    assert_eq!(machine.actions(), vec!["ice", "water"]);
    let via = machine.via();
    assert_eq!(via["ice"], "ice");
    assert_eq!(via["water"], "water");

    machine.to("ice").unwrap();
    assert_eq!(machine.state(), Some("ice"));
}

#[test]
fn table_without_initial_starts_without_state() {
    let table = StateTable::new()
        .state("water", StateDef::new(json!("60F")))
        .state("ice", StateDef::new(json!("32F")).can_leave(|_| false));
    let mut machine = Machine::new(table, true).unwrap();

    assert_eq!(machine.state(), None);
    assert_eq!(machine.value(), None);
    assert_eq!(machine.actions(), vec!["ice", "water"]);
    assert!(machine.history().is_empty());

    machine.set_initial("water").unwrap();
    assert_eq!(machine.state(), Some("water"));
    assert_eq!(machine.history().len(), 1);
}

#[test]
fn unknown_action_leaves_machine_untouched() {
    let mut machine = Machine::new(states(), true).unwrap();
    machine.to("FROZEN").unwrap();

    let err = machine.to("FROZEN").unwrap_err();

    assert!(matches!(err, MachineError::UnknownAction { .. }));
    assert_eq!(machine.state(), Some("ice"));
    assert_eq!(machine.history().len(), 2);
}

//! Water State Machine
//!
//! This example walks water through freezing, boiling and back, then
//! rewinds with undo/redo.
//!
//! Key concepts:
//! - Actions declared per state
//! - Object values merged by transition updates
//! - A guard that vetoes a transition
//! - Undo/redo over recorded history
//!
//! Run with: RUST_LOG=stated=debug cargo run --example water

use serde_json::json;
use stated::{Machine, StateDef, StateTable};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Water State Machine ===\n");

    let table = StateTable::new()
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
                .action("WARMED", "initial")
                .on_enter(|m| println!("  (ice formed at {})", m.value().unwrap_or(&json!(null)))),
        )
        .state(
            "steam",
            StateDef::new(json!({ "temp": "212F" }))
                .action("COOLED", "initial")
                .action("FROZEN", "ice")
                .can_leave(|m| m.value().and_then(|v| v.get("vented")).is_some()),
        );

    let mut machine = match Machine::builder(table).persistent(true).strict(true).build() {
        Ok(machine) => machine,
        Err(e) => {
            eprintln!("Failed to build machine: {e}");
            return;
        }
    };

    machine.on_transition(|m| {
        println!(
            "-> {} = {}",
            m.state().unwrap_or("none"),
            m.value().unwrap_or(&json!(null))
        );
    });

    println!("Initial state: {:?}", machine.state());
    println!("Actions: {:?}\n", machine.actions());

    let steps: [(&str, Option<serde_json::Value>); 3] = [
        ("FROZEN", None),
        ("BOILED", Some(json!({ "state": "gas" }))),
        ("COOLED", None),
    ];
    run(&mut machine, &steps);

    println!("\nVenting steam");
    if let Err(e) = machine.set_value(json!({ "vented": true })) {
        eprintln!("Failed to vent: {e}");
    }
    run(&mut machine, &[("COOLED", None)]);

    println!("\nHistory: {:?}", machine.history().path());

    println!("\nUndo:");
    machine.undo();
    println!("\nRedo:");
    machine.redo();

    println!("\n=== Example Complete ===");
}

fn run(machine: &mut Machine, steps: &[(&str, Option<serde_json::Value>)]) {
    for (action, update) in steps.iter().cloned() {
        let result = match update {
            Some(update) => machine.to_with(action, update),
            None => machine.to(action),
        };
        match result {
            Ok(outcome) if outcome.is_vetoed() => println!("{action}: vetoed"),
            Ok(_) => {}
            Err(e) => println!("{action}: {e}"),
        }
    }
}

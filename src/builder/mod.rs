//! Builder API for configuring machines.

pub mod config;
pub mod machine;

pub use config::MachineConfig;
pub use machine::MachineBuilder;

//! Mutable machine state owned by the execution engine.

/// Accumulator, variable store and program counter.
pub mod machine;

pub use machine::{MachineState, VariableStore};

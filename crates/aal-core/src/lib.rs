//! Interpreter core for a small accumulator assembly language.
//!
//! Source lines are parsed into [`Instruction`]s, validated into a
//! [`Program`] and executed by a [`Machine`]:
//!
//! ```text
//! raw lines -> parse_line -> Program::build -> Machine::run -> output
//! ```

/// Closed opcode set and mnemonic lookup.
pub mod opcode;
pub use opcode::{Opcode, OPCODE_TABLE};

/// Error taxonomy shared by the parser, builder and engine.
pub mod fault;
pub use fault::{AalError, ErrorKind, LineContext};

/// Source line parser.
pub mod parser;
pub use parser::{parse_line, tokenize, Instruction, Loc, IMMEDIATE_MARKER};

/// Program table construction and listing.
pub mod program;
pub use program::{Program, Symbol, SymbolKind, SymbolTable, LABEL_MARGIN};

/// Host-facing configuration and outcome types.
pub mod api;
pub use api::{EngineConfig, RunOutcome, StepOutcome, Termination, Word, MODULUS};

/// Mutable machine state.
pub mod state;
pub use state::{MachineState, VariableStore};

/// Input seam for `READ`.
pub mod io;
pub use io::{parse_token, InputError, InputSource, ReaderInput, ScriptedInput};

/// Fetch-execute loop.
pub mod execute;
pub use execute::Machine;

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;

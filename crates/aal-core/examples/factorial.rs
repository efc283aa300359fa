//! Runs a factorial program with scripted input and prints the trace.

use std::io::{self, Write};

use aal_core::{AalError, EngineConfig, Machine, Program, ScriptedInput};
use log as _;
use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

const SOURCE: &str = "\
READ N
LOAD =1
STORE F
TOP LOAD N
BE DONE
LOAD F
MULT N
STORE F
LOAD N
SUB =1
STORE N
BU TOP
DONE PRINT F
FIN END
";

fn main() -> Result<(), AalError> {
    let program = Program::from_source(SOURCE)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out, "{}", program.render())?;

    let mut machine = Machine::new(EngineConfig::with_verbose(true));
    let outcome = machine.run(&program, &mut ScriptedInput::from_values(&[6]), &mut out)?;
    writeln!(
        out,
        "{} steps, F = {:?}",
        outcome.steps,
        machine.state().variable("F")
    )?;
    Ok(())
}

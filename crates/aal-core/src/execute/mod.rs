//! Fetch-execute loop.
//!
//! Each step fetches the instruction at the program counter, dispatches on
//! its opcode and then advances the counter by one unless a branch was
//! taken. A failing step leaves the accumulator and variables untouched.

mod arith;

pub use arith::{add, div, mult, reduce, sub};

use std::io::Write;

use log::{debug, trace};

use crate::fault::LineContext;
use crate::io::{InputError, InputSource};
use crate::parser::{Instruction, Loc};
use crate::{
    AalError, EngineConfig, MachineState, Opcode, Program, RunOutcome, StepOutcome, Termination,
    Word,
};

/// Interpreter instance: configuration plus the state of the current run.
///
/// A `Machine` can run any number of programs in sequence; state is reset
/// at the start of every [`Machine::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Machine {
    config: EngineConfig,
    state: MachineState,
}

impl Machine {
    /// Creates a machine with zeroed state.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            state: MachineState::default(),
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// State left behind by the last run or step.
    #[must_use]
    pub const fn state(&self) -> &MachineState {
        &self.state
    }

    /// Resets state and runs `program` until `END`, the end of the program,
    /// or an error.
    ///
    /// # Errors
    ///
    /// Returns the first runtime or I/O error. Output written before the
    /// failure is flushed and kept.
    pub fn run(
        &mut self,
        program: &Program,
        input: &mut dyn InputSource,
        output: &mut dyn Write,
    ) -> Result<RunOutcome, AalError> {
        self.state.reset();
        debug!(
            "run start: {} instructions, verbose={}, step limit {:?}",
            program.len(),
            self.config.verbose,
            self.config.step_limit
        );

        let result = loop {
            match self.step_one(program, input, output) {
                Ok(StepOutcome::Continue) => {}
                Ok(StepOutcome::Finished(termination)) => {
                    break Ok(RunOutcome {
                        steps: self.state.steps(),
                        termination,
                    });
                }
                Err(err) => break Err(err),
            }
        };
        let flushed = output.flush().map_err(AalError::from);

        match result.and_then(|outcome| flushed.map(|()| outcome)) {
            Ok(outcome) => {
                debug!(
                    "run finished after {} steps ({:?})",
                    outcome.steps, outcome.termination
                );
                Ok(outcome)
            }
            Err(err) => {
                debug!("run failed ({:?}): {err}", err.kind());
                Err(err)
            }
        }
    }

    /// Executes the instruction at the program counter.
    ///
    /// Returns [`StepOutcome::Finished`] without executing anything when the
    /// counter is already past the last instruction.
    ///
    /// # Errors
    ///
    /// Undefined variables, malformed literals, division by zero, a taken
    /// branch with no code label to land on, input failures, an exhausted
    /// step budget and output write failures.
    pub fn step_one(
        &mut self,
        program: &Program,
        input: &mut dyn InputSource,
        output: &mut dyn Write,
    ) -> Result<StepOutcome, AalError> {
        let index = self.state.counter();
        let Some(instruction) = program.get(index) else {
            return Ok(StepOutcome::Finished(Termination::RanOffEnd));
        };

        let steps = self.state.steps();
        if let Some(limit) = self.config.step_limit.filter(|&limit| steps >= limit) {
            return Err(AalError::StepLimitExceeded {
                limit,
                at: context(index, instruction),
            });
        }
        trace!(
            "step {} @{index}: {instruction} (acc={})",
            self.state.steps(),
            self.state.accumulator()
        );

        let verbose = self.config.verbose;
        if verbose || instruction.opcode == Opcode::Read {
            let prefix = program.render_line(index).unwrap_or_default();
            write!(output, "{prefix} ")?;
        }

        let next = self.dispatch(program, instruction, index, input, output)?;
        self.state.retire_step();
        match next {
            Some(next) => {
                self.state.set_counter(next);
                Ok(StepOutcome::Continue)
            }
            None => Ok(StepOutcome::Finished(Termination::End)),
        }
    }

    /// Applies one instruction and returns the next counter, `None` after
    /// `END`.
    fn dispatch(
        &mut self,
        program: &Program,
        instruction: &Instruction,
        index: usize,
        input: &mut dyn InputSource,
        output: &mut dyn Write,
    ) -> Result<Option<usize>, AalError> {
        let verbose = self.config.verbose;
        let next = match instruction.opcode {
            Opcode::Load => {
                let value = self.operand_value(instruction, index)?;
                self.set_accumulator(value, output)?;
                Some(index + 1)
            }
            Opcode::Store => {
                let name = operand(instruction);
                let value = self.state.accumulator();
                self.store(name, value, output)?;
                Some(index + 1)
            }
            Opcode::Add => {
                let value = self.operand_value(instruction, index)?;
                self.set_accumulator(add(self.state.accumulator(), value), output)?;
                Some(index + 1)
            }
            Opcode::Sub => {
                let value = self.operand_value(instruction, index)?;
                self.set_accumulator(sub(self.state.accumulator(), value), output)?;
                Some(index + 1)
            }
            Opcode::Mult => {
                let value = self.operand_value(instruction, index)?;
                self.set_accumulator(mult(self.state.accumulator(), value), output)?;
                Some(index + 1)
            }
            Opcode::Div => {
                let value = self.operand_value(instruction, index)?;
                let quotient = div(self.state.accumulator(), value).ok_or_else(|| {
                    AalError::DivisionByZero {
                        operand: operand(instruction).to_string(),
                        at: context(index, instruction),
                    }
                })?;
                self.set_accumulator(quotient, output)?;
                Some(index + 1)
            }
            Opcode::Be => {
                let taken = self.state.accumulator() == 0;
                Some(self.branch(program, instruction, index, taken, output)?)
            }
            Opcode::Bg => {
                let taken = self.state.accumulator() > 0;
                Some(self.branch(program, instruction, index, taken, output)?)
            }
            Opcode::Bl => {
                let taken = self.state.accumulator() < 0;
                Some(self.branch(program, instruction, index, taken, output)?)
            }
            Opcode::Bu => Some(self.branch(program, instruction, index, true, output)?),
            Opcode::Read => {
                // The prompt has no newline, so push it out before blocking.
                output.flush()?;
                let value = input
                    .read_integer()
                    .map_err(|e| input_error(e, index, instruction))?;
                self.store(operand(instruction), reduce(value), output)?;
                Some(index + 1)
            }
            Opcode::Print => {
                let value = self.operand_value(instruction, index)?;
                if verbose {
                    writeln!(output, "({} = {value})", operand(instruction))?;
                }
                writeln!(output, "{value}")?;
                Some(index + 1)
            }
            Opcode::Dc => {
                let value = parse_literal(operand(instruction), index, instruction)?;
                let name = instruction.label.as_deref().unwrap_or_default();
                self.store(name, value, output)?;
                Some(index + 1)
            }
            Opcode::End => {
                writeln!(output)?;
                None
            }
        };
        Ok(next)
    }

    /// Index of the next instruction after a branch.
    ///
    /// A taken branch whose label does not resolve is an error, never a
    /// fall-through.
    fn branch(
        &self,
        program: &Program,
        instruction: &Instruction,
        index: usize,
        taken: bool,
        output: &mut dyn Write,
    ) -> Result<usize, AalError> {
        if self.config.verbose {
            writeln!(output, "(Branch? {})", if taken { "YES" } else { "NO" })?;
        }
        if !taken {
            return Ok(index + 1);
        }
        let label = operand(instruction);
        program
            .jump_target(label)
            .ok_or_else(|| AalError::UndefinedBranch {
                label: label.to_string(),
                index,
            })
    }

    fn operand_value(&self, instruction: &Instruction, index: usize) -> Result<Word, AalError> {
        match instruction.loc() {
            Some(Loc::Immediate(literal)) => parse_literal(literal, index, instruction),
            Some(Loc::Variable(name)) => {
                self.state
                    .variable(name)
                    .ok_or_else(|| AalError::UndefinedLoc {
                        name: name.to_string(),
                        at: context(index, instruction),
                    })
            }
            None => Err(AalError::UndefinedLoc {
                name: String::new(),
                at: context(index, instruction),
            }),
        }
    }

    fn set_accumulator(&mut self, value: Word, output: &mut dyn Write) -> Result<(), AalError> {
        self.state.set_accumulator(value);
        if self.config.verbose {
            writeln!(output, "(ACC = {value})")?;
        }
        Ok(())
    }

    fn store(&mut self, name: &str, value: Word, output: &mut dyn Write) -> Result<(), AalError> {
        self.state.set_variable(name, value);
        if self.config.verbose {
            writeln!(output, "({name} = {value})")?;
        }
        Ok(())
    }
}

fn operand(instruction: &Instruction) -> &str {
    instruction.operand.as_deref().unwrap_or_default()
}

fn context(index: usize, instruction: &Instruction) -> LineContext {
    LineContext {
        index,
        text: instruction.source.clone(),
    }
}

/// Parses a signed 32-bit decimal and reduces it.
fn parse_literal(text: &str, index: usize, instruction: &Instruction) -> Result<Word, AalError> {
    text.parse::<i32>()
        .map(|value| reduce(Word::from(value)))
        .map_err(|_| AalError::InvalidNumber {
            literal: text.to_string(),
            at: context(index, instruction),
        })
}

fn input_error(err: InputError, index: usize, instruction: &Instruction) -> AalError {
    match err {
        InputError::Exhausted => AalError::InputExhausted {
            at: context(index, instruction),
        },
        InputError::Invalid(token) => AalError::InvalidNumber {
            literal: token,
            at: context(index, instruction),
        },
        InputError::Io(message) => AalError::Io(message),
    }
}

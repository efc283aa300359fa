//! Program table construction and listing.
//!
//! Building a [`Program`] walks the parsed lines twice: the first pass
//! registers every label (rejecting duplicates) and the second checks that
//! each branch names a code label. `DC` labels name variables and are never
//! jump targets.

use std::collections::HashMap;

use log::debug;

use crate::parser::{parse_line, Instruction};
use crate::{AalError, Opcode};

/// Columns added after the longest label in listings and traces.
pub const LABEL_MARGIN: usize = 3;

/// What a label names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum SymbolKind {
    /// A line that branches may jump to.
    Code,
    /// A variable declared with `DC`.
    Data,
}

/// A label definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Symbol {
    /// 0-based index of the defining line.
    pub index: usize,
    /// Whether the label is a jump target or a variable declaration.
    pub kind: SymbolKind,
}

/// Label name to definition.
pub type SymbolTable = HashMap<String, Symbol>;

/// A validated, immutable instruction sequence.
///
/// Every branch in a `Program` is known to resolve, so execution can only
/// fail on data-dependent errors. With the `serde` feature a program is
/// stored as its instruction list and rebuilt through [`Program::build`] on
/// load.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(try_from = "Vec<Instruction>", into = "Vec<Instruction>")
)]
pub struct Program {
    instructions: Vec<Instruction>,
    symbols: SymbolTable,
    label_width: usize,
}

impl Program {
    /// Validates parsed instructions into a program.
    ///
    /// # Errors
    ///
    /// - [`AalError::DuplicateLabel`] if two lines share a label.
    /// - [`AalError::UndefinedBranch`] if a branch operand is not a code
    ///   label (including labels that only name a `DC` variable).
    pub fn build(instructions: Vec<Instruction>) -> Result<Self, AalError> {
        let mut symbols = SymbolTable::new();
        let mut longest_label = 0;

        for (index, instruction) in instructions.iter().enumerate() {
            let Some(label) = &instruction.label else {
                continue;
            };
            if symbols.contains_key(label) {
                return Err(AalError::DuplicateLabel {
                    label: label.clone(),
                    index,
                });
            }
            longest_label = longest_label.max(label.len());
            let kind = if instruction.opcode == Opcode::Dc {
                SymbolKind::Data
            } else {
                SymbolKind::Code
            };
            symbols.insert(label.clone(), Symbol { index, kind });
        }

        for (index, instruction) in instructions.iter().enumerate() {
            if !instruction.opcode.is_branch() {
                continue;
            }
            let target = instruction.operand.as_deref().unwrap_or_default();
            let is_code = symbols
                .get(target)
                .is_some_and(|symbol| symbol.kind == SymbolKind::Code);
            if !is_code {
                return Err(AalError::UndefinedBranch {
                    label: target.to_string(),
                    index,
                });
            }
        }

        debug!(
            "built program: {} instructions, {} labels, label width {}",
            instructions.len(),
            symbols.len(),
            longest_label + LABEL_MARGIN
        );

        Ok(Self {
            instructions,
            symbols,
            label_width: longest_label + LABEL_MARGIN,
        })
    }

    /// Wraps instructions without any label checks.
    #[cfg(test)]
    pub(crate) fn unchecked(instructions: Vec<Instruction>) -> Self {
        Self {
            instructions,
            symbols: SymbolTable::new(),
            label_width: LABEL_MARGIN,
        }
    }

    /// Parses and validates a sequence of raw lines.
    ///
    /// Every line must hold an instruction; blank lines are rejected by the
    /// parser.
    ///
    /// # Errors
    ///
    /// Returns the first parse error in line order, otherwise any error from
    /// [`Program::build`].
    pub fn from_lines<I, S>(lines: I) -> Result<Self, AalError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let instructions = lines
            .into_iter()
            .map(|line| parse_line(line.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::build(instructions)
    }

    /// Parses and validates newline-separated program text.
    ///
    /// # Errors
    ///
    /// Same as [`Program::from_lines`].
    pub fn from_source(text: &str) -> Result<Self, AalError> {
        Self::from_lines(text.lines())
    }

    /// All instructions in program order.
    #[must_use]
    pub const fn instructions(&self) -> &[Instruction] {
        self.instructions.as_slice()
    }

    /// Instruction at a 0-based index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    /// Number of instructions.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns `true` for a program with no instructions.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Every label, code and data alike.
    #[must_use]
    pub const fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Index a branch to `label` lands on, if `label` is a code label.
    #[must_use]
    pub fn jump_target(&self, label: &str) -> Option<usize> {
        self.symbols
            .get(label)
            .filter(|symbol| symbol.kind == SymbolKind::Code)
            .map(|symbol| symbol.index)
    }

    /// Width of the label column: longest label plus [`LABEL_MARGIN`].
    #[must_use]
    pub const fn label_width(&self) -> usize {
        self.label_width
    }

    /// Renders one line as `<n>: <label> <opcode> <operand>`.
    ///
    /// `n` is 1-based. Extra digits in `n` are taken out of the label column
    /// so opcodes line up across the whole listing.
    #[must_use]
    pub fn render_line(&self, index: usize) -> Option<String> {
        let instruction = self.instructions.get(index)?;
        let number = index + 1;
        let width = self.label_width.saturating_sub(digit_count(number) - 1);
        Some(format!("{number}: {}", instruction.render(width)))
    }

    /// Aligned listing of the whole program, one line per instruction.
    #[must_use]
    pub fn render(&self) -> String {
        (0..self.instructions.len())
            .filter_map(|index| self.render_line(index))
            .fold(String::new(), |mut out, line| {
                out.push_str(&line);
                out.push('\n');
                out
            })
    }
}

impl TryFrom<Vec<Instruction>> for Program {
    type Error = AalError;

    fn try_from(instructions: Vec<Instruction>) -> Result<Self, Self::Error> {
        Self::build(instructions)
    }
}

impl From<Program> for Vec<Instruction> {
    fn from(program: Program) -> Self {
        program.instructions
    }
}

const fn digit_count(mut n: usize) -> usize {
    let mut digits = 1;
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits
}

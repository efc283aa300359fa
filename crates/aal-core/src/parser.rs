//! Source line parser.
//!
//! A line is two or three whitespace-separated tokens in one of three shapes:
//!
//! ```text
//! LABEL OPCODE OPERAND
//!       OPCODE OPERAND
//! LABEL OPCODE            (END only)
//! ```
//!
//! The two-token form is ambiguous; it is resolved by whether the first token
//! is a mnemonic, so mnemonics can never be used as labels there.

use crate::{AalError, Opcode};

/// Prefix that marks an operand as an immediate literal (`=42`).
pub const IMMEDIATE_MARKER: char = '=';

/// One parsed and shape-checked source line.
///
/// With the `serde` feature an instruction is stored as its source text and
/// re-parsed on load.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(try_from = "String", into = "String")
)]
pub struct Instruction {
    /// The line exactly as written.
    pub source: String,
    /// Jump target name, or variable name on a `DC` line.
    pub label: Option<String>,
    /// Resolved operation.
    pub opcode: Opcode,
    /// Variable name, `=`-prefixed literal, or branch target.
    pub operand: Option<String>,
}

/// Borrowed view of an operand, split on the immediate marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loc<'a> {
    /// Literal text following `=`, not yet parsed.
    Immediate(&'a str),
    /// Variable name.
    Variable(&'a str),
}

impl<'a> Loc<'a> {
    /// Classifies an operand token.
    #[must_use]
    pub fn classify(operand: &'a str) -> Self {
        operand
            .strip_prefix(IMMEDIATE_MARKER)
            .map_or(Self::Variable(operand), Self::Immediate)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TwoTokenShape {
    OpcodeOperand(Opcode),
    LabelOpcode,
}

impl Instruction {
    /// Operand split into immediate/variable form.
    #[must_use]
    pub fn loc(&self) -> Option<Loc<'_>> {
        self.operand.as_deref().map(Loc::classify)
    }

    /// Renders the line with the label column padded to `width` characters.
    ///
    /// Unlabelled lines get `width` spaces so opcodes stay in one column. A
    /// label longer than `width` is written as-is followed by one space.
    #[must_use]
    pub fn render(&self, width: usize) -> String {
        let mut out = match &self.label {
            Some(label) if label.len() >= width => format!("{label} "),
            Some(label) => format!("{label:<width$}"),
            None => " ".repeat(width),
        };
        out.push_str(self.opcode.mnemonic());
        if let Some(operand) = &self.operand {
            out.push(' ');
            out.push_str(operand);
        }
        out
    }

    fn check_shape(&self) -> Result<(), AalError> {
        let operand_ok = self.opcode.takes_operand() == self.operand.is_some();
        let label_ok = self.opcode != Opcode::Dc || self.label.is_some();
        if operand_ok && label_ok {
            Ok(())
        } else {
            Err(invalid_line(&self.source))
        }
    }
}

impl TryFrom<String> for Instruction {
    type Error = AalError;

    fn try_from(line: String) -> Result<Self, Self::Error> {
        parse_line(&line)
    }
}

impl From<Instruction> for String {
    fn from(instruction: Instruction) -> Self {
        instruction.source
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

/// Parses one raw source line.
///
/// # Errors
///
/// - [`AalError::InvalidLine`] when the line does not have 2 or 3 tokens, or
///   when `END` has an operand, another opcode lacks one, or `DC` lacks a
///   label.
/// - [`AalError::UnknownOpcode`] when the token in opcode position is not a
///   mnemonic.
pub fn parse_line(line: &str) -> Result<Instruction, AalError> {
    let tokens = tokenize(line);
    let (label, opcode, operand) = match tokens.as_slice() {
        [label, opcode, operand] => (
            Some(label),
            require_opcode(opcode)?,
            Some(operand),
        ),
        [first, second] => match two_token_shape(first) {
            TwoTokenShape::OpcodeOperand(opcode) => (None, opcode, Some(second)),
            TwoTokenShape::LabelOpcode => (Some(first), require_opcode(second)?, None),
        },
        _ => return Err(invalid_line(line)),
    };

    let instruction = Instruction {
        source: line.to_string(),
        label: label.map(|s| (*s).to_string()),
        opcode,
        operand: operand.map(|s| (*s).to_string()),
    };
    instruction.check_shape()?;
    Ok(instruction)
}

/// Splits on runs of spaces and tabs. Other whitespace is token content.
#[must_use]
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split([' ', '\t'])
        .filter(|token| !token.is_empty())
        .collect()
}

fn two_token_shape(first: &str) -> TwoTokenShape {
    Opcode::from_mnemonic(first).map_or(TwoTokenShape::LabelOpcode, TwoTokenShape::OpcodeOperand)
}

fn require_opcode(token: &str) -> Result<Opcode, AalError> {
    Opcode::from_mnemonic(token).ok_or_else(|| AalError::UnknownOpcode {
        token: token.to_string(),
    })
}

fn invalid_line(line: &str) -> AalError {
    AalError::InvalidLine {
        line: line.to_string(),
    }
}

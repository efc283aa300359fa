use thiserror::Error;

/// Error classes used by callers to branch on failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ErrorKind {
    /// Line does not have 2-3 tokens or breaks the instruction shape rules.
    Syntax,
    /// A token in opcode position is not a known mnemonic.
    UnknownOpcode,
    /// Duplicate label or branch to an undefined label.
    Validation,
    /// Data-dependent failure while executing a program.
    Runtime,
    /// Host input/output failure.
    Io,
}

/// Position of the instruction that was executing when a runtime error fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineContext {
    /// 0-based index into the program.
    pub index: usize,
    /// Original source text of the line.
    pub text: String,
}

impl std::fmt::Display for LineContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}: {}", self.index, self.text)
    }
}

/// Every failure the parser, program builder or engine can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AalError {
    /// Wrong token count or an illegal label/opcode/operand combination.
    #[error("invalid line: {line}")]
    InvalidLine {
        /// Offending source text.
        line: String,
    },
    /// Token expected to be an opcode does not name one.
    #[error("{token} is not a valid op code")]
    UnknownOpcode {
        /// The unrecognised token.
        token: String,
    },
    /// The same label appears on two lines.
    #[error("duplicate label {label}")]
    DuplicateLabel {
        /// The repeated label.
        label: String,
        /// 0-based index of the second definition.
        index: usize,
    },
    /// A branch names a label that is not a jump target.
    #[error("undefined branch {label}")]
    UndefinedBranch {
        /// The missing jump target.
        label: String,
        /// 0-based index of the branch instruction.
        index: usize,
    },
    /// A variable was read before anything was stored into it.
    #[error("undefined loc {name} {at}")]
    UndefinedLoc {
        /// Variable name.
        name: String,
        /// Executing line.
        at: LineContext,
    },
    /// An immediate literal or READ token is not a 32-bit integer.
    #[error("{literal} is not a valid number {at}")]
    InvalidNumber {
        /// The text that failed to parse.
        literal: String,
        /// Executing line.
        at: LineContext,
    },
    /// `DIV` with a zero divisor.
    #[error("division by zero in {operand} {at}")]
    DivisionByZero {
        /// Operand that evaluated to zero.
        operand: String,
        /// Executing line.
        at: LineContext,
    },
    /// `READ` found no further input.
    #[error("input exhausted {at}")]
    InputExhausted {
        /// Executing line.
        at: LineContext,
    },
    /// The configured step budget ran out before `END`.
    #[error("step limit of {limit} exceeded {at}")]
    StepLimitExceeded {
        /// Configured budget.
        limit: u64,
        /// Line that would have executed next.
        at: LineContext,
    },
    /// Output sink or input stream failed.
    #[error("i/o error: {0}")]
    Io(String),
}

impl AalError {
    /// Returns the class of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidLine { .. } => ErrorKind::Syntax,
            Self::UnknownOpcode { .. } => ErrorKind::UnknownOpcode,
            Self::DuplicateLabel { .. } | Self::UndefinedBranch { .. } => ErrorKind::Validation,
            Self::UndefinedLoc { .. }
            | Self::InvalidNumber { .. }
            | Self::DivisionByZero { .. }
            | Self::InputExhausted { .. }
            | Self::StepLimitExceeded { .. } => ErrorKind::Runtime,
            Self::Io(_) => ErrorKind::Io,
        }
    }

    /// Line that was executing, for runtime errors.
    #[must_use]
    pub const fn line_context(&self) -> Option<&LineContext> {
        match self {
            Self::UndefinedLoc { at, .. }
            | Self::InvalidNumber { at, .. }
            | Self::DivisionByZero { at, .. }
            | Self::InputExhausted { at }
            | Self::StepLimitExceeded { at, .. } => Some(at),
            Self::InvalidLine { .. }
            | Self::UnknownOpcode { .. }
            | Self::DuplicateLabel { .. }
            | Self::UndefinedBranch { .. }
            | Self::Io(_) => None,
        }
    }

    /// Program index a validation error refers to.
    #[must_use]
    pub fn program_index(&self) -> Option<usize> {
        match self {
            Self::DuplicateLabel { index, .. } | Self::UndefinedBranch { index, .. } => {
                Some(*index)
            }
            _ => self.line_context().map(|at| at.index),
        }
    }

    /// Errors raised while building a program rather than running it.
    #[must_use]
    pub const fn is_static(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Syntax | ErrorKind::UnknownOpcode | ErrorKind::Validation
        )
    }
}

impl From<std::io::Error> for AalError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

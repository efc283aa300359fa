//! Error reporting with source locations.
//!
//! Errors print to stderr as:
//!
//! ```text
//! program.aal:7: error: undefined loc Y @4: ADD Y
//! ```

use std::fmt;
use std::path::PathBuf;

use aal_core::{AalError, ErrorKind};

/// Position of a line in the input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLoc {
    /// File path as given on the command line.
    pub file: PathBuf,
    /// 1-indexed line number, blank lines included.
    pub line: usize,
}

impl SourceLoc {
    /// Creates a source location.
    #[must_use]
    pub const fn new(file: PathBuf, line: usize) -> Self {
        Self { file, line }
    }
}

impl fmt::Display for SourceLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.line)
    }
}

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorKind {
    /// Parse, validation or runtime failure from the interpreter.
    Program(AalError),
    /// The source file could not be read.
    Io(String),
}

impl CliErrorKind {
    /// Interpreter error class, `Io` for file failures.
    #[must_use]
    pub const fn error_kind(&self) -> ErrorKind {
        match self {
            Self::Program(e) => e.kind(),
            Self::Io(_) => ErrorKind::Io,
        }
    }
}

impl fmt::Display for CliErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Program(e) => write!(f, "{e}"),
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

/// A CLI-level error with optional source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliError {
    /// The kind of error.
    pub kind: CliErrorKind,
    /// Offending line, when one is known.
    pub location: Option<SourceLoc>,
}

impl CliError {
    /// Creates an error without location.
    #[must_use]
    pub const fn new(kind: CliErrorKind) -> Self {
        Self {
            kind,
            location: None,
        }
    }

    /// Adds a source location to the error.
    #[must_use]
    pub fn with_location(mut self, loc: SourceLoc) -> Self {
        self.location = Some(loc);
        self
    }

    /// Formats the error for stderr output.
    #[must_use]
    pub fn format_for_stderr(&self) -> String {
        self.location.as_ref().map_or_else(
            || format!("error: {}", self.kind),
            |loc| format!("{loc}: error: {}", self.kind),
        )
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(loc) => write!(f, "{loc}: {}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for CliError {}

impl From<AalError> for CliError {
    fn from(e: AalError) -> Self {
        Self::new(CliErrorKind::Program(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_loc_format() {
        let loc = SourceLoc::new(PathBuf::from("main.aal"), 10);
        assert_eq!(loc.to_string(), "main.aal:10");
    }

    #[test]
    fn format_without_location() {
        let error = CliError::new(CliErrorKind::Io("file not found".into()));
        assert_eq!(error.format_for_stderr(), "error: I/O error: file not found");
        assert_eq!(error.kind.error_kind(), ErrorKind::Io);
    }

    #[test]
    fn format_with_location() {
        let error = CliError::from(AalError::UnknownOpcode {
            token: "JMP".into(),
        })
        .with_location(SourceLoc::new(PathBuf::from("loop.aal"), 3));
        assert_eq!(
            error.format_for_stderr(),
            "loop.aal:3: error: JMP is not a valid op code"
        );
        assert_eq!(error.to_string(), "loop.aal:3: JMP is not a valid op code");
        assert_eq!(error.kind.error_kind(), ErrorKind::UnknownOpcode);
    }
}

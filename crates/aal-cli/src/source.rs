//! Source loading and program construction.
//!
//! Blank lines are dropped before parsing, so instruction indices no longer
//! match file lines. Every kept line remembers where it came from, and
//! errors are reported against the original file.

use std::fs;
use std::path::{Path, PathBuf};

use aal_core::{parse_line, AalError, Program};
use log::debug;

use crate::errors::{CliError, CliErrorKind, SourceLoc};

/// A line of source with its original location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// The source text (without trailing newline).
    pub text: String,
    /// 1-indexed line number in the original file.
    pub original_line: usize,
}

/// Non-blank lines of an input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceContent {
    /// Instruction lines in file order.
    pub lines: Vec<SourceLine>,
    /// The file path (for error reporting).
    pub file_path: PathBuf,
}

impl SourceContent {
    /// Location of the instruction at a 0-based program index.
    #[must_use]
    pub fn location_of(&self, index: usize) -> Option<SourceLoc> {
        self.lines
            .get(index)
            .map(|line| SourceLoc::new(self.file_path.clone(), line.original_line))
    }

    /// Wraps an interpreter error, attaching the line it refers to.
    #[must_use]
    pub fn locate(&self, error: AalError) -> CliError {
        let location = error.program_index().and_then(|index| self.location_of(index));
        let located = CliError::from(error);
        match location {
            Some(loc) => located.with_location(loc),
            None => located,
        }
    }
}

/// Reads and splits a source file.
///
/// # Errors
///
/// Returns an `Io` error when the file cannot be read or is not UTF-8.
pub fn load_file(path: &Path) -> Result<SourceContent, CliError> {
    let content = fs::read_to_string(path).map_err(|e| {
        CliError::new(CliErrorKind::Io(format!(
            "cannot read {}: {e}",
            path.display()
        )))
    })?;
    Ok(extract_source(path, &content))
}

/// Splits text into instruction lines, skipping lines that hold only spaces
/// and tabs.
#[must_use]
pub fn extract_source(file_path: &Path, content: &str) -> SourceContent {
    let lines = content
        .lines()
        .enumerate()
        .filter(|(_, line)| !is_blank(line))
        .map(|(idx, line)| SourceLine {
            text: line.to_string(),
            original_line: idx + 1,
        })
        .collect();

    SourceContent {
        lines,
        file_path: file_path.to_path_buf(),
    }
}

/// Parses every line and validates the result.
///
/// # Errors
///
/// The first parse error in file order, or a validation error, located at
/// the offending line.
pub fn build_program(source: &SourceContent) -> Result<Program, CliError> {
    let mut instructions = Vec::with_capacity(source.lines.len());
    for line in &source.lines {
        let instruction = parse_line(&line.text).map_err(|e| {
            CliError::from(e).with_location(SourceLoc::new(
                source.file_path.clone(),
                line.original_line,
            ))
        })?;
        instructions.push(instruction);
    }

    let program = Program::build(instructions).map_err(|e| source.locate(e))?;
    debug!(
        "loaded {} ({} instructions)",
        source.file_path.display(),
        program.len()
    );
    Ok(program)
}

fn is_blank(line: &str) -> bool {
    line.chars().all(|c| c == ' ' || c == '\t')
}

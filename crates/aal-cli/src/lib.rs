//! Loader and command-line front end for accumulator assembly programs.

use env_logger as _;

/// Error reporting with source locations.
pub mod errors;
/// Source loading and program construction.
pub mod source;

pub use errors::{CliError, CliErrorKind, SourceLoc};
pub use source::{build_program, extract_source, load_file, SourceContent, SourceLine};

//! Input seam for `READ`.
//!
//! Output needs no seam of its own; the engine writes to any
//! [`std::io::Write`].

use std::collections::VecDeque;
use std::io::BufRead;

use thiserror::Error;

use crate::Word;

/// Why an input source could not produce an integer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// No tokens are left.
    #[error("input exhausted")]
    Exhausted,
    /// The next token is not a 32-bit integer. The token is consumed.
    #[error("{0} is not a valid number")]
    Invalid(String),
    /// The underlying stream failed.
    #[error("input stream failed: {0}")]
    Io(String),
}

/// Supplier of integers for `READ`.
pub trait InputSource {
    /// Returns the next whitespace-delimited integer, blocking if needed.
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] when input is exhausted, malformed or
    /// unreadable.
    fn read_integer(&mut self) -> Result<Word, InputError>;
}

/// Parses one token the way `READ` accepts it: an optionally signed 32-bit
/// decimal.
///
/// # Errors
///
/// Returns [`InputError::Invalid`] carrying the token.
pub fn parse_token(token: &str) -> Result<Word, InputError> {
    token
        .parse::<i32>()
        .map(Word::from)
        .map_err(|_| InputError::Invalid(token.to_string()))
}

/// Fixed list of tokens, for tests and embedding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptedInput {
    tokens: VecDeque<String>,
}

impl ScriptedInput {
    /// Queues tokens in order.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Queues every whitespace-separated token of `text`.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self::new(text.split_whitespace())
    }

    /// Queues integers.
    #[must_use]
    pub fn from_values(values: &[Word]) -> Self {
        Self::new(values.iter().map(ToString::to_string))
    }

    /// Tokens not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.tokens.len()
    }
}

impl InputSource for ScriptedInput {
    fn read_integer(&mut self) -> Result<Word, InputError> {
        let token = self.tokens.pop_front().ok_or(InputError::Exhausted)?;
        parse_token(&token)
    }
}

/// Token-buffered reader over any [`BufRead`], such as locked stdin.
///
/// A line may hold several integers; they are handed out one per call.
#[derive(Debug)]
pub struct ReaderInput<R> {
    reader: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> ReaderInput<R> {
    /// Wraps a buffered reader.
    pub const fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
        }
    }

    fn refill(&mut self) -> Result<(), InputError> {
        let mut line = String::new();
        while self.pending.is_empty() {
            line.clear();
            let read = self
                .reader
                .read_line(&mut line)
                .map_err(|e| InputError::Io(e.to_string()))?;
            if read == 0 {
                return Err(InputError::Exhausted);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_string));
        }
        Ok(())
    }
}

impl<R: BufRead> InputSource for ReaderInput<R> {
    fn read_integer(&mut self) -> Result<Word, InputError> {
        self.refill()?;
        let token = self.pending.pop_front().ok_or(InputError::Exhausted)?;
        parse_token(&token)
    }
}

//! Parse and I/O errors.

use std::panic::Location;
use std::sync::Arc;

use thiserror::Error;

/// A convenience alias for results of parsing operations.
pub type Result<T> = std::result::Result<T, Error>;

/// An error that stopped a parse.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// An I/O error raised by the line source.
    #[error("{0}")]
    Io(Arc<std::io::Error>),

    /// The input held no value at all: nothing but end of input was found.
    #[error("end of input")]
    Eof,

    /// Malformed markup.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Io(Arc::new(error))
    }
}

/// A structured parse error.
///
/// Carries the position in the *input* text and, for debugging the parser
/// itself, the position in the parser's *source code* where the error was
/// raised.
#[derive(Debug, Clone, Error)]
#[error("{description} at line {line}, column {column}")]
pub struct ParseError {
    line: u64,
    column: usize,
    description: String,
    raised_at: &'static Location<'static>,
}

impl ParseError {
    /// Create an error at the given input position.
    ///
    /// The raising site is captured from the caller.
    #[track_caller]
    #[must_use]
    pub fn new(line: u64, column: usize, description: impl Into<String>) -> Self {
        Self {
            line,
            column,
            description: description.into(),
            raised_at: Location::caller(),
        }
    }

    /// 1-based line number in the input text.
    #[must_use]
    pub fn line(&self) -> u64 {
        self.line
    }

    /// 0-based code-point column in the input line.
    #[must_use]
    pub fn column(&self) -> usize {
        self.column
    }

    /// Human-readable description of the problem.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Location in the parser's source code that raised the error.
    #[must_use]
    pub fn raised_at(&self) -> &'static Location<'static> {
        self.raised_at
    }
}

/// Outcome of an operation that may hit the end of the current block.
///
/// `EndOfBlock` is a sentinel, not an error: block-mode loops catch it to
/// stop iterating at natural boundaries. It never crosses the public API;
/// the few places where running out of block is genuinely wrong turn it
/// into a [`ParseError`] on the spot.
#[derive(Debug)]
pub(crate) enum Flow {
    /// The current block has no more lines.
    EndOfBlock,
    /// A real error, propagated unchanged.
    Fatal(Error),
}

pub(crate) type PResult<T> = std::result::Result<T, Flow>;

impl From<Error> for Flow {
    fn from(error: Error) -> Self {
        Flow::Fatal(error)
    }
}

impl From<ParseError> for Flow {
    fn from(error: ParseError) -> Self {
        Flow::Fatal(Error::Parse(error))
    }
}

impl From<std::io::Error> for Flow {
    fn from(error: std::io::Error) -> Self {
        Flow::Fatal(error.into())
    }
}
